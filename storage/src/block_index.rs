use crate::compact::Compact;
use crate::BlockRef;
use bitcrypto::SHA256D;

/// Header information of a block connected to the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockIndex {
	pub hash: SHA256D,
	pub height: u32,
	pub version: u32,
	pub time: u32,
	pub bits: Compact,
	/// Median time of the previous 11 blocks, including this one.
	pub median_time_past: u32,
}

impl BlockIndex {
	pub fn block_ref(&self) -> BlockRef {
		BlockRef::new(self.hash, self.height)
	}
}
