//! Mempool seam of the block assembler.
//!
//! The assembler reads chunks through a `BlockBuilder`, which can only be obtained from a
//! locked pool, so a chunk pass always sees one consistent ordering.

use bitcrypto::SHA256D;
use chain::IndexedTransaction;
use parking_lot::{RwLock, RwLockReadGuard};
use primitives::fee_rate::{Amount, FeePerWeight};
use std::collections::HashSet;
use std::convert::TryFrom;

/// Transaction as stored in the memory pool.
#[derive(Debug, Clone)]
pub struct MemoryPoolEntry {
	pub transaction: IndexedTransaction,
	/// Fee including prioritisation.
	pub fee: Amount,
	pub weight: usize,
	pub sigops_cost: usize,
}

impl MemoryPoolEntry {
	pub fn new(transaction: IndexedTransaction, fee: Amount, sigops_cost: usize) -> Self {
		let weight = transaction.raw.weight();
		MemoryPoolEntry {
			transaction,
			fee,
			weight,
			sigops_cost,
		}
	}
}

/// Transactions that must be mined together, parents first.
#[derive(Debug, Clone)]
pub struct Chunk {
	entries: Vec<MemoryPoolEntry>,
	weight: usize,
	feerate: FeePerWeight,
}

impl Chunk {
	pub fn new(entries: Vec<MemoryPoolEntry>) -> Self {
		let fee = entries.iter().map(|entry| entry.fee).sum();
		let weight: usize = entries.iter().map(|entry| entry.weight).sum();
		// the rate saturates, such a chunk never fits a block anyway
		let size = i32::try_from(weight).unwrap_or(i32::max_value());
		Chunk {
			entries,
			weight,
			feerate: FeePerWeight::new(fee, size),
		}
	}

	pub fn entries(&self) -> &[MemoryPoolEntry] {
		&self.entries
	}

	/// Aggregate fee over aggregate weight.
	pub fn feerate(&self) -> FeePerWeight {
		self.feerate
	}

	pub fn weight(&self) -> usize {
		self.weight
	}

	pub fn sigops_cost(&self) -> usize {
		self.entries.iter().map(|entry| entry.sigops_cost).sum()
	}

	fn contains(&self, hash: &SHA256D) -> bool {
		self.entries.iter().any(|entry| &entry.transaction.hash == hash)
	}

	fn spends_any(&self, hashes: &HashSet<SHA256D>) -> bool {
		self.entries.iter().any(|entry| {
			entry
				.transaction
				.raw
				.inputs
				.iter()
				.any(|input| hashes.contains(&input.previous_output.hash))
		})
	}
}

/// Walks the chunks of a locked pool in non-increasing fee rate order.
pub trait BlockBuilder {
	/// Chunk under consideration, `None` once all chunks are exhausted.
	fn current_chunk(&self) -> Option<&Chunk>;
	/// Marks the current chunk as included and moves to the next one.
	fn include_chunk(&mut self);
	/// Skips the current chunk, together with every later chunk depending on it.
	fn skip_chunk(&mut self);
}

/// Pool whose lock is held for as long as this value lives.
pub trait LockedPool {
	fn block_builder(&self) -> Box<dyn BlockBuilder + '_>;
	/// Number of transactions in the pool.
	fn size(&self) -> usize;
}

pub trait TransactionPool: Send + Sync {
	fn lock(&self) -> Box<dyn LockedPool + '_>;
}

/// Chunks linearized elsewhere, kept in fee rate order.
#[derive(Default)]
pub struct MemoryPool {
	chunks: RwLock<Vec<Chunk>>,
}

impl MemoryPool {
	pub fn new() -> Self {
		MemoryPool::default()
	}

	/// Inserts `chunk` after every chunk with a higher or equal fee rate.
	pub fn insert_chunk(&self, chunk: Chunk) {
		let mut chunks = self.chunks.write();
		let position = chunks
			.iter()
			.position(|other| other.feerate.rate_cmp(&chunk.feerate) == std::cmp::Ordering::Less)
			.unwrap_or_else(|| chunks.len());
		chunks.insert(position, chunk);
	}

	/// Drops every chunk holding one of `hashes`, e.g. after they were mined.
	pub fn remove_transactions(&self, hashes: &[SHA256D]) {
		self.chunks
			.write()
			.retain(|chunk| !hashes.iter().any(|hash| chunk.contains(hash)));
	}

	pub fn clear(&self) {
		self.chunks.write().clear();
	}
}

impl TransactionPool for MemoryPool {
	fn lock(&self) -> Box<dyn LockedPool + '_> {
		Box::new(MemoryPoolGuard {
			chunks: self.chunks.read(),
		})
	}
}

struct MemoryPoolGuard<'a> {
	chunks: RwLockReadGuard<'a, Vec<Chunk>>,
}

impl<'a> LockedPool for MemoryPoolGuard<'a> {
	fn block_builder(&self) -> Box<dyn BlockBuilder + '_> {
		Box::new(ChunkIterator {
			chunks: self.chunks.as_slice(),
			position: 0,
			skipped: HashSet::new(),
		})
	}

	fn size(&self) -> usize {
		self.chunks.iter().map(|chunk| chunk.entries.len()).sum()
	}
}

struct ChunkIterator<'a> {
	chunks: &'a [Chunk],
	position: usize,
	/// Transactions of skipped chunks and of everything depending on them.
	skipped: HashSet<SHA256D>,
}

impl<'a> ChunkIterator<'a> {
	fn advance(&mut self) {
		self.position += 1;
		while let Some(chunk) = self.chunks.get(self.position) {
			if !chunk.spends_any(&self.skipped) {
				break;
			}
			self.skipped.extend(chunk.entries.iter().map(|entry| entry.transaction.hash));
			self.position += 1;
		}
	}
}

impl<'a> BlockBuilder for ChunkIterator<'a> {
	fn current_chunk(&self) -> Option<&Chunk> {
		self.chunks.get(self.position)
	}

	fn include_chunk(&mut self) {
		self.advance();
	}

	fn skip_chunk(&mut self) {
		if let Some(chunk) = self.chunks.get(self.position) {
			self.skipped.extend(chunk.entries.iter().map(|entry| entry.transaction.hash));
		}
		self.advance();
	}
}

#[cfg(test)]
mod tests {
	use super::{BlockBuilder, Chunk, MemoryPool, MemoryPoolEntry, TransactionPool};
	use primitives::fee_rate::FeePerWeight;
	use test_data::TransactionBuilder;

	fn chunk(version: i32, fee: i64) -> Chunk {
		let tx = TransactionBuilder::with_version(version).add_output(1).into_indexed();
		Chunk::new(vec![MemoryPoolEntry::new(tx, fee, 4)])
	}

	fn visit(builder: &mut dyn BlockBuilder, skip: &[usize]) -> Vec<i64> {
		let mut fees = vec![];
		let mut index = 0;
		while let Some(chunk) = builder.current_chunk() {
			fees.push(chunk.feerate().fee);
			if skip.contains(&index) {
				builder.skip_chunk();
			} else {
				builder.include_chunk();
			}
			index += 1;
		}
		fees
	}

	#[test]
	fn test_chunk_aggregates() {
		let parent = TransactionBuilder::with_output(10).into_indexed();
		let child = TransactionBuilder::spending(&parent.hash, 0).add_output(5).into_indexed();
		let parent_weight = parent.raw.weight();
		let child_weight = child.raw.weight();
		let chunk = Chunk::new(vec![MemoryPoolEntry::new(parent, 100, 4), MemoryPoolEntry::new(child, 300, 8)]);
		assert_eq!(chunk.feerate(), FeePerWeight::new(400, (parent_weight + child_weight) as i32));
		assert_eq!(chunk.weight(), parent_weight + child_weight);
		assert_eq!(chunk.sigops_cost(), 12);
	}

	#[test]
	fn test_chunk_weight_beyond_fee_rate_range() {
		let weight = i32::max_value() as usize + 400;
		let entry = MemoryPoolEntry {
			transaction: TransactionBuilder::with_output(1).into_indexed(),
			fee: 1_000,
			weight,
			sigops_cost: 0,
		};
		let chunk = Chunk::new(vec![entry]);
		assert_eq!(chunk.weight(), weight);
		assert_eq!(chunk.feerate(), FeePerWeight::new(1_000, i32::max_value()));
	}

	#[test]
	fn test_memory_pool_keeps_fee_rate_order() {
		let pool = MemoryPool::new();
		pool.insert_chunk(chunk(1, 100));
		pool.insert_chunk(chunk(2, 300));
		pool.insert_chunk(chunk(3, 200));
		pool.insert_chunk(chunk(4, 300));

		let locked = pool.lock();
		assert_eq!(locked.size(), 4);
		assert_eq!(visit(&mut *locked.block_builder(), &[]), vec![300, 300, 200, 100]);
	}

	#[test]
	fn test_skipped_chunk_skips_descendants() {
		let parent = TransactionBuilder::with_output(10).into_indexed();
		let child = TransactionBuilder::spending(&parent.hash, 0).add_output(5).into_indexed();
		let pool = MemoryPool::new();
		pool.insert_chunk(Chunk::new(vec![MemoryPoolEntry::new(parent, 1000, 0)]));
		pool.insert_chunk(chunk(1, 500));
		pool.insert_chunk(Chunk::new(vec![MemoryPoolEntry::new(child, 10, 0)]));

		let locked = pool.lock();
		assert_eq!(visit(&mut *locked.block_builder(), &[0]), vec![1000, 500]);
		assert_eq!(visit(&mut *locked.block_builder(), &[]), vec![1000, 500, 10]);
	}

	#[test]
	fn test_remove_transactions() {
		let pool = MemoryPool::new();
		let mined = chunk(1, 100);
		let mined_hash = mined.entries()[0].transaction.hash;
		pool.insert_chunk(mined);
		pool.insert_chunk(chunk(2, 50));
		pool.remove_transactions(&[mined_hash]);
		assert_eq!(pool.lock().size(), 1);
		pool.clear();
		assert_eq!(pool.lock().size(), 0);
	}
}
