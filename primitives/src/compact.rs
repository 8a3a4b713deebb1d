//! Compact representation of `U256`, as stored in the `bits` field of a block header.

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Compact(u32);

impl From<u32> for Compact {
	fn from(u: u32) -> Self {
		Compact(u)
	}
}

impl From<Compact> for u32 {
	fn from(c: Compact) -> Self {
		c.0
	}
}

impl Compact {
	pub fn new(u: u32) -> Self {
		Compact(u)
	}
}
