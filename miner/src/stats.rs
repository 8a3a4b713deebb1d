use parking_lot::RwLock;

/// Size of the most recently completed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastBlock {
	/// Transactions, excluding the coinbase.
	pub num_txs: u64,
	pub weight: u64,
}

/// Statistics of the last built template, shared between builders and observers.
#[derive(Debug, Default)]
pub struct LastBlockStats {
	last: RwLock<Option<LastBlock>>,
}

impl LastBlockStats {
	pub fn new() -> Self {
		LastBlockStats::default()
	}

	pub(crate) fn record(&self, num_txs: u64, weight: u64) {
		*self.last.write() = Some(LastBlock { num_txs, weight });
	}

	pub fn last_block(&self) -> Option<LastBlock> {
		*self.last.read()
	}

	pub fn last_block_num_txs(&self) -> Option<u64> {
		self.last_block().map(|last| last.num_txs)
	}

	pub fn last_block_weight(&self) -> Option<u64> {
		self.last_block().map(|last| last.weight)
	}
}
