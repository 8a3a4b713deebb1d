use crate::block_header::BlockHeader;
use crate::constants::{BLOCK_HEADER_SIZE, WITNESS_SCALE_FACTOR};
use crate::indexed_transaction::IndexedTransaction;
use crate::merkle_root::merkle_root;
use bitcrypto::{zero_hash, SHA256D};
use ser::{CompactInteger, Serializable};

/// Block with indexed transactions. The first transaction is the coinbase.
#[derive(Debug, Clone)]
pub struct Block {
	pub block_header: BlockHeader,
	pub transactions: Vec<IndexedTransaction>,
}

impl Block {
	pub fn new(block_header: BlockHeader, transactions: Vec<IndexedTransaction>) -> Self {
		Block {
			block_header,
			transactions,
		}
	}

	pub fn hash(&self) -> SHA256D {
		self.block_header.hash()
	}

	pub fn header(&self) -> &BlockHeader {
		&self.block_header
	}

	pub fn coinbase(&self) -> Option<&IndexedTransaction> {
		self.transactions.first().filter(|tx| tx.raw.is_coinbase())
	}

	/// Merkle root of transaction ids.
	pub fn merkle_root(&self) -> SHA256D {
		let hashes: Vec<SHA256D> = self.transactions.iter().map(|tx| tx.hash).collect();
		merkle_root(&hashes)
	}

	/// Merkle root of witness transaction ids. The coinbase contributes the zero hash.
	pub fn witness_merkle_root(&self) -> SHA256D {
		let hashes: Vec<SHA256D> = self
			.transactions
			.iter()
			.enumerate()
			.map(|(index, tx)| if index == 0 { zero_hash() } else { tx.raw.witness_hash() })
			.collect();
		merkle_root(&hashes)
	}

	/// Block weight including header and transaction count.
	pub fn weight(&self) -> usize {
		let overhead = BLOCK_HEADER_SIZE + CompactInteger::from(self.transactions.len()).serialized_size();
		let transactions: usize = self.transactions.iter().map(|tx| tx.raw.weight()).sum();
		overhead * WITNESS_SCALE_FACTOR + transactions
	}
}
