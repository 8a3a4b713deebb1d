use bitcrypto::{zero_hash, SHA256D};
use chain::{Block, BlockHeader};
use network::{ConsensusParams, Network};
use parking_lot::RwLock;
use primitives::compact::Compact;
use std::sync::atomic::{AtomicUsize, Ordering};
use storage::{BlockIndex, ChainState, Error, VERSIONBITS_TOP_BITS};

/// Number of blocks the median time past is computed over.
const MEDIAN_TIME_SPAN: usize = 11;

#[derive(Default)]
struct TestChainState {
	blocks: Vec<BlockIndex>,
	best_header_height: Option<u32>,
	block_bits: Option<Compact>,
	invalid_reason: Option<String>,
}

/// In-memory active chain of block indexes.
pub struct TestChain {
	consensus: ConsensusParams,
	state: RwLock<TestChainState>,
	validity_checks: AtomicUsize,
}

impl TestChain {
	/// Chain without any connected block.
	pub fn new(network: Network) -> Self {
		TestChain {
			consensus: ConsensusParams::new(network),
			state: RwLock::new(TestChainState::default()),
			validity_checks: AtomicUsize::new(0),
		}
	}

	/// Chain with a genesis block at `time`.
	pub fn with_genesis(network: Network, time: u32) -> Self {
		let chain = TestChain::new(network);
		chain.push_block(time);
		chain
	}

	/// Connects a new tip with the given timestamp.
	pub fn push_block(&self, time: u32) -> BlockIndex {
		let mut state = self.state.write();
		let bits = state.block_bits.unwrap_or(self.consensus.pow_limit_bits);
		let (height, previous_header_hash) = match state.blocks.last() {
			Some(tip) => (tip.height + 1, tip.hash),
			None => (0, zero_hash()),
		};
		let header = BlockHeader {
			version: VERSIONBITS_TOP_BITS,
			previous_header_hash,
			merkle_root_hash: zero_hash(),
			time,
			bits,
			nonce: height,
		};

		let mut times: Vec<u32> = state
			.blocks
			.iter()
			.rev()
			.take(MEDIAN_TIME_SPAN - 1)
			.map(|block| block.time)
			.chain(Some(time))
			.collect();
		times.sort_unstable();

		let index = BlockIndex {
			hash: header.hash(),
			height,
			version: header.version,
			time,
			bits,
			median_time_past: times[times.len() / 2],
		};
		state.blocks.push(index.clone());
		index
	}

	/// Connects `count` blocks spaced by the target spacing.
	pub fn push_blocks(&self, count: u32) -> Option<BlockIndex> {
		let spacing = self.consensus.pow_target_spacing;
		let mut last = None;
		for _ in 0..count {
			let time = self.tip().map_or(0, |tip| tip.time + spacing);
			last = Some(self.push_block(time));
		}
		last
	}

	/// Announces headers `count` blocks past the tip. `None` means headers and tip agree.
	pub fn set_headers_ahead(&self, count: Option<u32>) {
		let mut state = self.state.write();
		let tip_height = state.blocks.last().map_or(0, |tip| tip.height);
		state.best_header_height = count.map(|count| tip_height + count);
	}

	/// Difficulty bits of blocks connected from now on.
	pub fn set_block_bits(&self, bits: Compact) {
		self.state.write().block_bits = Some(bits);
	}

	/// Makes every following validity check fail with `reason`.
	pub fn fail_validity(&self, reason: Option<String>) {
		self.state.write().invalid_reason = reason;
	}

	/// Number of `test_block_validity` calls so far.
	pub fn validity_checks(&self) -> usize {
		self.validity_checks.load(Ordering::SeqCst)
	}
}

impl ChainState for TestChain {
	fn consensus(&self) -> &ConsensusParams {
		&self.consensus
	}

	fn tip(&self) -> Option<BlockIndex> {
		self.state.read().blocks.last().cloned()
	}

	fn block_index(&self, hash: &SHA256D) -> Option<BlockIndex> {
		self.state.read().blocks.iter().rev().find(|block| &block.hash == hash).cloned()
	}

	fn blocks_ahead_of_tip(&self) -> Option<u32> {
		let state = self.state.read();
		let tip_height = state.blocks.last().map(|tip| tip.height)?;
		match state.best_header_height {
			Some(best) if best > tip_height => Some(best - tip_height),
			_ => None,
		}
	}

	fn next_work_required(&self, parent: &BlockIndex, header: &BlockHeader) -> Compact {
		let spacing = self.consensus.pow_target_spacing;
		if self.consensus.pow_allow_min_difficulty_blocks && header.time > parent.time + spacing * 2 {
			return self.consensus.pow_limit_bits;
		}
		parent.bits
	}

	fn test_block_validity(&self, block: &Block, _check_pow: bool, check_merkle_root: bool) -> Result<(), Error> {
		self.validity_checks.fetch_add(1, Ordering::SeqCst);
		let state = self.state.read();
		let tip = state.blocks.last().ok_or(Error::UnknownParent)?;
		if block.block_header.previous_header_hash != tip.hash {
			return Err(Error::UnknownParent);
		}
		if let Some(ref reason) = state.invalid_reason {
			return Err(Error::InvalidBlock(reason.clone()));
		}
		if block.coinbase().is_none() {
			return Err(Error::InvalidBlock("first transaction is not a coinbase".into()));
		}
		if block.transactions.iter().skip(1).any(|tx| tx.raw.is_coinbase()) {
			return Err(Error::InvalidBlock("more than one coinbase".into()));
		}
		if block.weight() > self.consensus.max_block_weight {
			return Err(Error::InvalidBlock("block weight exceeds limit".into()));
		}
		if check_merkle_root && block.merkle_root() != block.block_header.merkle_root_hash {
			return Err(Error::InvalidBlock("bad merkle root".into()));
		}
		Ok(())
	}
}
