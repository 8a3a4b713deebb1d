//! Command line overrides of the block assembler options.

use crate::{Error, Options};
use clap::{Arg, ArgMatches};
use primitives::fee_rate::{money_range, Amount, FeeRate, COIN};

/// Decimal places of a BTC amount.
const COIN_DECIMALS: usize = 8;

/// Arguments understood by `apply_args`.
pub fn args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
	vec![
		Arg::with_name("blockmaxweight")
			.long("blockmaxweight")
			.takes_value(true)
			.value_name("WEIGHT")
			.help("Set maximum BIP141 block weight"),
		Arg::with_name("blockreservedweight")
			.long("blockreservedweight")
			.takes_value(true)
			.value_name("WEIGHT")
			.help("Reserve space for the fixed-size block header plus the largest coinbase transaction the mining software may add"),
		Arg::with_name("blockmintxfee")
			.long("blockmintxfee")
			.takes_value(true)
			.value_name("AMOUNT")
			.help("Set lowest fee rate (in BTC/kvB) for transactions to be included in block creation"),
		Arg::with_name("printpriority")
			.long("printpriority")
			.help("Log transaction fee rate in satoshis per kvB when mining blocks"),
	]
}

/// Overrides `options` with the values given on the command line.
pub fn apply_args(matches: &ArgMatches, options: &mut Options) -> Result<(), Error> {
	if let Some(weight) = matches.value_of("blockmaxweight") {
		options.block_max_weight = parse_weight("blockmaxweight", weight)?;
	}
	if let Some(weight) = matches.value_of("blockreservedweight") {
		options.block_reserved_weight = parse_weight("blockreservedweight", weight)?;
	}
	if let Some(fee) = matches.value_of("blockmintxfee") {
		let sats_per_kvb = parse_money(fee).ok_or_else(|| Error::Config(format!("invalid amount for -blockmintxfee: {}", fee)))?;
		options.block_min_fee_rate = FeeRate::new(sats_per_kvb);
	}
	if matches.is_present("printpriority") {
		options.print_modified_fee = true;
	}
	Ok(())
}

fn parse_weight(name: &str, value: &str) -> Result<usize, Error> {
	value
		.parse()
		.map_err(|_| Error::Config(format!("invalid weight for -{}: {}", name, value)))
}

/// Parses a decimal BTC amount into satoshis.
pub fn parse_money(value: &str) -> Option<Amount> {
	let value = value.trim();
	let (whole, fraction) = match value.find('.') {
		Some(pos) => (&value[..pos], &value[pos + 1..]),
		None => (value, ""),
	};
	if whole.is_empty() && fraction.is_empty() {
		return None;
	}
	if fraction.len() > COIN_DECIMALS || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
		return None;
	}
	// more digits than 21M BTC can have
	if whole.len() > 10 {
		return None;
	}

	let whole: Amount = if whole.is_empty() { 0 } else { whole.parse().ok()? };
	let mut sats: Amount = 0;
	for digit in fraction.bytes().chain(std::iter::repeat(b'0')).take(COIN_DECIMALS) {
		sats = sats * 10 + (digit - b'0') as Amount;
	}
	let amount = whole.checked_mul(COIN)?.checked_add(sats)?;
	if !money_range(amount) {
		return None;
	}
	Some(amount)
}
