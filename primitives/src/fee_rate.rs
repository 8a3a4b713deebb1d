//! Fee and size accounting.
//!
//! Fee rates are kept as exact fractions (`fee / size`) and compared by cross multiplication,
//! so that two chunks with the same rate but different sizes never compare as different.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Amount in satoshis.
pub type Amount = i64;

pub const COIN: Amount = 100_000_000;
pub const MAX_MONEY: Amount = 21_000_000 * COIN;

/// Number of weight units in one virtual byte.
pub const WITNESS_SCALE_FACTOR: i64 = 4;

pub fn money_range(value: Amount) -> bool {
	value >= 0 && value <= MAX_MONEY
}

/// Fee and size of a transaction, package or chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeFrac {
	pub fee: Amount,
	pub size: i32,
}

impl FeeFrac {
	pub fn new(fee: Amount, size: i32) -> Self {
		FeeFrac { fee, size }
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Compares fee rates. An empty fraction has fee rate zero.
	pub fn rate_cmp(&self, other: &FeeFrac) -> Ordering {
		match (self.size, other.size) {
			(0, 0) => Ordering::Equal,
			(0, _) => 0.cmp(&other.fee),
			(_, 0) => self.fee.cmp(&0),
			(a, b) => (self.fee as i128 * b as i128).cmp(&(other.fee as i128 * a as i128)),
		}
	}
}

impl std::ops::Add for FeeFrac {
	type Output = FeeFrac;

	fn add(self, other: FeeFrac) -> FeeFrac {
		FeeFrac::new(self.fee + other.fee, self.size + other.size)
	}
}

impl std::ops::AddAssign for FeeFrac {
	fn add_assign(&mut self, other: FeeFrac) {
		self.fee += other.fee;
		self.size += other.size;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VSizeUnit;

/// A `FeeFrac` whose size is measured in `U`.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FeePerUnit<U> {
	pub fee: Amount,
	pub size: i32,
	unit: PhantomData<U>,
}

pub type FeePerWeight = FeePerUnit<WeightUnit>;
pub type FeePerVSize = FeePerUnit<VSizeUnit>;

impl<U> FeePerUnit<U> {
	pub fn new(fee: Amount, size: i32) -> Self {
		FeePerUnit {
			fee,
			size,
			unit: PhantomData,
		}
	}

	pub fn as_frac(&self) -> FeeFrac {
		FeeFrac::new(self.fee, self.size)
	}

	pub fn rate_cmp(&self, other: &Self) -> Ordering {
		self.as_frac().rate_cmp(&other.as_frac())
	}
}

impl<U> fmt::Debug for FeePerUnit<U> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("FeePerUnit").field("fee", &self.fee).field("size", &self.size).finish()
	}
}

impl FeePerWeight {
	/// Converts weight units to virtual bytes, rounding up.
	pub fn to_fee_per_vsize(&self) -> FeePerVSize {
		// never larger than the weight, so it stays within i32
		let vsize = (self.size as i64 + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR;
		FeePerVSize::new(self.fee, vsize as i32)
	}
}

impl fmt::Display for FeePerVSize {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.size == 0 {
			return f.write_str("0.000 sat/vB");
		}
		write!(f, "{:.3} sat/vB", self.fee as f64 / self.size as f64)
	}
}

/// Fee rate in satoshis per 1000 virtual bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FeeRate {
	sats_per_kvb: Amount,
}

impl FeeRate {
	pub fn new(sats_per_kvb: Amount) -> Self {
		FeeRate { sats_per_kvb }
	}

	pub fn from_sat_per_vb(sats_per_vb: Amount) -> Self {
		FeeRate::new(sats_per_vb * 1000)
	}

	/// Fee rate paid by `fee` over `vsize` virtual bytes.
	pub fn from_fee(fee: Amount, vsize: u32) -> Self {
		if vsize == 0 {
			return FeeRate::new(0);
		}
		FeeRate::new(fee * 1000 / vsize as i64)
	}

	pub fn sats_per_kvb(&self) -> Amount {
		self.sats_per_kvb
	}

	/// Fee for `vsize` virtual bytes, rounded up.
	pub fn fee(&self, vsize: u32) -> Amount {
		let product = self.sats_per_kvb * vsize as i64;
		if product > 0 {
			(product + 999) / 1000
		} else {
			product / 1000
		}
	}
}

impl fmt::Display for FeeRate {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}.{:03} sat/vB", self.sats_per_kvb / 1000, (self.sats_per_kvb % 1000).abs())
	}
}
