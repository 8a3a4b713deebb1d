use bitcrypto::SHA256D;
use chain::{Block, TransactionOutput};
use primitives::fee_rate::{Amount, FeePerVSize};

/// Coinbase fields set by the block assembler, for clients building their own coinbase.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinbaseTemplate {
	pub version: i32,
	pub sequence: u32,
	/// Script-sig prefix committing to the block height.
	pub script_sig_prefix: Vec<u8>,
	/// Witness reserved value, present when a witness commitment is required.
	pub witness: Option<SHA256D>,
	/// Subsidy plus the fees of every included transaction.
	pub block_reward_remaining: Amount,
	/// Outputs the coinbase must carry, e.g. the witness commitment.
	pub required_outputs: Vec<TransactionOutput>,
	pub lock_time: u32,
}

/// Candidate block with the accounting of the transactions it carries.
///
/// `tx_fees` and `tx_sigops_cost` are aligned with `block.transactions`, skipping the coinbase.
#[derive(Debug, Clone)]
pub struct BlockTemplate {
	pub block: Block,
	pub tx_fees: Vec<Amount>,
	pub tx_sigops_cost: Vec<usize>,
	/// Fee rate of every included chunk, in selection order.
	pub package_feerates: Vec<FeePerVSize>,
	pub coinbase_tx: CoinbaseTemplate,
	pub coinbase_sigops_cost: usize,
}

impl BlockTemplate {
	pub fn total_fees(&self) -> Amount {
		self.tx_fees.iter().sum()
	}
}
