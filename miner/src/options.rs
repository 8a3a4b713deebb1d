use primitives::fee_rate::{Amount, FeeRate, MAX_MONEY};
use std::time::Duration;

/// Default for `Options::block_max_weight`.
pub const DEFAULT_BLOCK_MAX_WEIGHT: usize = 4_000_000;
/// Default for `Options::block_reserved_weight`.
pub const DEFAULT_BLOCK_RESERVED_WEIGHT: usize = 8_000;
/// Default for `Options::block_min_fee_rate`, in satoshis per 1000 virtual bytes.
pub const DEFAULT_BLOCK_MIN_TX_FEE: Amount = 1;
/// Default for `Options::coinbase_output_max_additional_sigops`.
pub const DEFAULT_COINBASE_OUTPUT_MAX_ADDITIONAL_SIGOPS: usize = 400;
pub const DEFAULT_PRINT_MODIFIED_FEE: bool = false;

/// Block assembler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
	/// Hard cap on template weight, including the reserved weight.
	pub block_max_weight: usize,
	/// Chunks paying less than this are never included.
	pub block_min_fee_rate: FeeRate,
	/// Validate every template before it is returned.
	pub test_block_validity: bool,
	/// Log fee rate and id of every included transaction.
	pub print_modified_fee: bool,
	/// Weight reserved for the header, transaction count and coinbase.
	pub block_reserved_weight: usize,
	/// Sigop cost reserved for the coinbase outputs.
	pub coinbase_output_max_additional_sigops: usize,
	/// Script the coinbase pays to.
	pub coinbase_output_script: Vec<u8>,
	/// Append `OP_0` to the coinbase script-sig.
	pub include_dummy_extranonce: bool,
}

impl Default for Options {
	fn default() -> Self {
		Options {
			block_max_weight: DEFAULT_BLOCK_MAX_WEIGHT,
			block_min_fee_rate: FeeRate::new(DEFAULT_BLOCK_MIN_TX_FEE),
			test_block_validity: true,
			print_modified_fee: DEFAULT_PRINT_MODIFIED_FEE,
			block_reserved_weight: DEFAULT_BLOCK_RESERVED_WEIGHT,
			coinbase_output_max_additional_sigops: DEFAULT_COINBASE_OUTPUT_MAX_ADDITIONAL_SIGOPS,
			coinbase_output_script: vec![chain::script::OP_TRUE],
			include_dummy_extranonce: false,
		}
	}
}

impl Options {
	/// Keeps weights within what a block can hold.
	pub fn clamp(mut self, max_block_weight: usize) -> Self {
		self.block_reserved_weight = self.block_reserved_weight.min(max_block_weight);
		self.block_max_weight = self.block_max_weight.max(self.block_reserved_weight).min(max_block_weight);
		self
	}
}

/// Limits of `wait_and_create_new_block`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockWaitOptions {
	/// How long to wait before giving up. `None` waits until interrupted.
	pub timeout: Option<Duration>,
	/// Return a template once its fees exceed the previous one's by this amount.
	/// `MAX_MONEY` disables the fee check.
	pub fee_threshold: Amount,
}

impl Default for BlockWaitOptions {
	fn default() -> Self {
		BlockWaitOptions {
			timeout: None,
			fee_threshold: MAX_MONEY,
		}
	}
}
