use crate::compact::Compact;
use crate::{BlockIndex, Error};
use bitcrypto::SHA256D;
use chain::{Block, BlockHeader};
use network::ConsensusParams;
use std::sync::Arc;

/// Version bits signalling with no deployment bits set (BIP9).
pub const VERSIONBITS_TOP_BITS: u32 = 0x2000_0000;

/// Chain state as seen by block assembly.
///
/// Every method takes the chain lock for the duration of the call only, so no
/// implementation may be called while holding a lock the chain lock is ordered after.
pub trait ChainState: Send + Sync {
	/// Consensus rules of the chain.
	fn consensus(&self) -> &ConsensusParams;

	/// Active chain tip, `None` until the genesis block is connected.
	fn tip(&self) -> Option<BlockIndex>;

	/// Resolves a block of the active chain by hash.
	fn block_index(&self, hash: &SHA256D) -> Option<BlockIndex>;

	/// How many blocks the best known header is ahead of the tip, if it extends the tip.
	fn blocks_ahead_of_tip(&self) -> Option<u32>;

	/// Version of a block built on top of `parent`.
	fn compute_block_version(&self, _parent: &BlockIndex) -> u32 {
		VERSIONBITS_TOP_BITS
	}

	/// Difficulty a block with `header` built on top of `parent` must meet.
	fn next_work_required(&self, parent: &BlockIndex, header: &BlockHeader) -> Compact;

	/// Checks `block` against the current tip without connecting it.
	fn test_block_validity(&self, block: &Block, check_pow: bool, check_merkle_root: bool) -> Result<(), Error>;
}

pub type SharedChainState = Arc<dyn ChainState>;
