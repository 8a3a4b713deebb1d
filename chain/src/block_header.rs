use crate::compact::Compact;
use bitcrypto::{dhash256, SHA256D};
use ser::{serialize, Serializable, Stream};
use std::fmt;

#[derive(PartialEq, Eq, Clone)]
pub struct BlockHeader {
	pub version: u32,
	pub previous_header_hash: SHA256D,
	pub merkle_root_hash: SHA256D,
	pub time: u32,
	pub bits: Compact,
	pub nonce: u32,
}

impl BlockHeader {
	pub fn hash(&self) -> SHA256D {
		block_header_hash(self)
	}
}

impl fmt::Debug for BlockHeader {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("BlockHeader")
			.field("version", &self.version)
			.field("previous_header_hash", &self.previous_header_hash)
			.field("merkle_root_hash", &self.merkle_root_hash)
			.field("time", &self.time)
			.field("bits", &self.bits)
			.field("nonce", &self.nonce)
			.finish()
	}
}

impl Serializable for BlockHeader {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.version)
			.append_slice(&self.previous_header_hash[..])
			.append_slice(&self.merkle_root_hash[..])
			.append(&self.time)
			.append(&u32::from(self.bits))
			.append(&self.nonce);
	}

	fn serialized_size(&self) -> usize {
		crate::constants::BLOCK_HEADER_SIZE
	}
}

/// Compute hash of the block header.
pub(crate) fn block_header_hash(block_header: &BlockHeader) -> SHA256D {
	dhash256(&serialize(block_header))
}
