use bitcrypto::SHA256D;
use std::fmt;

/// Chain tip at a point in time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
	/// Hash of the block
	pub hash: SHA256D,
	/// Height/number of the block (genesis block has zero height)
	pub height: u32,
}

impl BlockRef {
	pub fn new(hash: SHA256D, height: u32) -> Self {
		BlockRef { hash, height }
	}
}

impl fmt::Debug for BlockRef {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("BlockRef")
			.field("hash", &self.hash)
			.field("height", &self.height)
			.finish()
	}
}
