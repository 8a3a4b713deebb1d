//! Block template assembly.
//!
//! Chunks are taken greedily in the fee rate order the memory pool linearized them in.
//! A chunk is never split: either every transaction of it is included or none.

use crate::commitments::generate_coinbase_commitment;
use crate::time::{header_time, update_time};
use crate::{BlockBuilder, BlockTemplate, CoinbaseTemplate, Error, MemoryPoolEntry, MiningContext, Options, TransactionPool};
use bitcrypto::{zero_hash, SHA256D};
use chain::constants::MAX_SEQUENCE_NONFINAL;
use chain::script::{height_script, transaction_legacy_sigops, OP_0};
use chain::{Block, BlockHeader, IndexedTransaction, Transaction, TransactionInput, TransactionOutput};
use primitives::fee_rate::{Amount, FeePerVSize, FeeRate, WITNESS_SCALE_FACTOR};
use std::time::Instant;

/// Failed chunks tolerated once the block is nearly full.
const MAX_CONSECUTIVE_FAILURES: usize = 1000;
/// Block weight margin below the maximum at which the block counts as nearly full.
const BLOCK_FULL_ENOUGH_WEIGHT_DELTA: usize = 4000;

/// Builds block templates on top of the active tip.
pub struct BlockAssembler<'a> {
	context: &'a MiningContext,
	mempool: Option<&'a dyn TransactionPool>,
	options: Options,

	// state of the template being built
	block_weight: usize,
	block_tx: usize,
	block_sigops_cost: usize,
	fees: Amount,
	height: u32,
	lock_time_cutoff: i64,
	transactions: Vec<IndexedTransaction>,
	tx_fees: Vec<Amount>,
	tx_sigops_cost: Vec<usize>,
	package_feerates: Vec<FeePerVSize>,
}

impl<'a> BlockAssembler<'a> {
	/// Assembler using `options`, clamped to the consensus block weight.
	/// Without a memory pool templates only hold the coinbase.
	pub fn new(context: &'a MiningContext, mempool: Option<&'a dyn TransactionPool>, options: Options) -> Self {
		let options = options.clamp(context.chain.consensus().max_block_weight);
		BlockAssembler {
			context,
			mempool,
			options,
			block_weight: 0,
			block_tx: 0,
			block_sigops_cost: 0,
			fees: 0,
			height: 0,
			lock_time_cutoff: 0,
			transactions: Vec::new(),
			tx_fees: Vec::new(),
			tx_sigops_cost: Vec::new(),
			package_feerates: Vec::new(),
		}
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	fn reset_block(&mut self) {
		// space for the header and coinbase transaction
		self.block_weight = self.options.block_reserved_weight;
		self.block_sigops_cost = self.options.coinbase_output_max_additional_sigops;
		self.block_tx = 0;
		self.fees = 0;
		self.transactions.clear();
		self.tx_fees.clear();
		self.tx_sigops_cost.clear();
		self.package_feerates.clear();
	}

	/// Builds a new template on top of the current tip.
	pub fn create_new_block(&mut self) -> Result<BlockTemplate, Error> {
		let time_start = Instant::now();
		self.reset_block();

		let chain = self.context.chain.clone();
		let consensus = chain.consensus();
		let parent = chain.tip().ok_or(Error::NoTip)?;
		self.height = parent.height + 1;

		let mut header = BlockHeader {
			version: chain.compute_block_version(&parent),
			previous_header_hash: parent.hash,
			merkle_root_hash: zero_hash(),
			time: header_time(self.context.time.now_secs()),
			bits: parent.bits,
			nonce: 0,
		};

		self.lock_time_cutoff = match consensus.is_csv_active(self.height) {
			true => parent.median_time_past as i64,
			false => header.time as i64,
		};

		let (mut chunks_selected, mut chunks_skipped) = (0, 0);
		if let Some(mempool) = self.mempool {
			let locked = mempool.lock();
			let mut builder = locked.block_builder();
			let (selected, skipped) = self.add_chunks(&mut *builder);
			chunks_selected = selected;
			chunks_skipped = skipped;
		}
		let time_chunks = Instant::now();

		let block_reward = self.fees + consensus.block_subsidy(self.height);
		let mut script_sig = height_script(self.height);
		if self.options.include_dummy_extranonce {
			script_sig.push(OP_0);
		}
		let coinbase = Transaction {
			version: 2,
			inputs: vec![TransactionInput {
				sequence: MAX_SEQUENCE_NONFINAL,
				..TransactionInput::coinbase(script_sig.clone())
			}],
			outputs: vec![TransactionOutput {
				value: block_reward as u64,
				script_pubkey: self.options.coinbase_output_script.clone(),
			}],
			// anti fee sniping, the coinbase is only final in this block
			lock_time: self.height - 1,
		};
		let mut coinbase_tx = CoinbaseTemplate {
			version: coinbase.version,
			sequence: MAX_SEQUENCE_NONFINAL,
			script_sig_prefix: script_sig,
			witness: None,
			block_reward_remaining: block_reward,
			required_outputs: Vec::new(),
			lock_time: coinbase.lock_time,
		};

		let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
		transactions.push(IndexedTransaction::from_raw(coinbase));
		transactions.append(&mut self.transactions);
		let mut block = Block::new(header.clone(), transactions);

		if let Some(commitment) = generate_coinbase_commitment(&mut block, consensus, self.height) {
			coinbase_tx.witness = Some(zero_hash());
			coinbase_tx.required_outputs.push(TransactionOutput {
				value: 0,
				script_pubkey: commitment,
			});
		}

		info!(
			target: "miner",
			"CreateNewBlock(): block weight: {} txs: {} fees: {} sigops {}",
			block.weight(),
			self.block_tx,
			self.fees,
			self.block_sigops_cost
		);

		update_time(&mut header, consensus, &parent, &*chain, self.context.time.now_secs());
		header.bits = chain.next_work_required(&parent, &header);
		header.merkle_root_hash = block.merkle_root();
		block.block_header = header;

		let coinbase_sigops_cost = WITNESS_SCALE_FACTOR as usize * transaction_legacy_sigops(&block.transactions[0].raw);

		if self.options.test_block_validity {
			if let Err(err) = chain.test_block_validity(&block, false, false) {
				error!(target: "miner", "CreateNewBlock(): TestBlockValidity failed: {}", err);
				return Err(Error::TestBlockValidity(err));
			}
		}
		let time_validity = Instant::now();

		debug!(
			target: "miner",
			"CreateNewBlock() chunks: {:.2}ms ({} chunks selected, {} skipped), validity: {:.2}ms (total {:.2}ms)",
			millis(time_start, time_chunks),
			chunks_selected,
			chunks_skipped,
			millis(time_chunks, time_validity),
			millis(time_start, time_validity)
		);

		self.context.stats.record(self.block_tx as u64, self.block_weight as u64);

		Ok(BlockTemplate {
			block,
			tx_fees: std::mem::take(&mut self.tx_fees),
			tx_sigops_cost: std::mem::take(&mut self.tx_sigops_cost),
			package_feerates: std::mem::take(&mut self.package_feerates),
			coinbase_tx,
			coinbase_sigops_cost,
		})
	}

	/// Whether a chunk of the given size still fits the block.
	fn test_chunk_block_limits(&self, weight: usize, sigops_cost: usize) -> bool {
		if self.block_weight + weight > self.options.block_max_weight {
			return false;
		}
		if self.block_sigops_cost + sigops_cost > self.context.chain.consensus().max_block_sigops_cost {
			return false;
		}
		true
	}

	/// Whether every transaction of a chunk is final in this block.
	fn test_chunk_transactions(&self, entries: &[MemoryPoolEntry]) -> bool {
		entries
			.iter()
			.all(|entry| entry.transaction.raw.is_final_in_block(self.height, self.lock_time_cutoff))
	}

	fn add_to_block(&mut self, entry: &MemoryPoolEntry) {
		self.transactions.push(entry.transaction.clone());
		self.tx_fees.push(entry.fee);
		self.tx_sigops_cost.push(entry.sigops_cost);
		self.block_weight += entry.weight;
		self.block_tx += 1;
		self.block_sigops_cost += entry.sigops_cost;
		self.fees += entry.fee;

		if self.options.print_modified_fee {
			let vsize = (entry.weight + WITNESS_SCALE_FACTOR as usize - 1) / WITNESS_SCALE_FACTOR as usize;
			info!(
				target: "miner",
				"fee rate {} txid {}",
				FeeRate::from_fee(entry.fee, vsize as u32),
				entry.transaction.hash
			);
		}
	}

	/// Adds chunks from `builder` until the fee rate floor or the block limits are reached.
	///
	/// Returns the number of chunks included and of chunks skipped.
	fn add_chunks(&mut self, builder: &mut dyn BlockBuilder) -> (usize, usize) {
		let mut consecutive_failed = 0;
		let (mut selected, mut skipped) = (0, 0);

		while let Some(chunk) = builder.current_chunk() {
			let feerate = chunk.feerate();
			let feerate_vsize = feerate.to_fee_per_vsize();

			// chunks are sorted, no later one pays enough either
			if feerate.fee < self.options.block_min_fee_rate.fee(feerate_vsize.size as u32) {
				break;
			}

			let accepted = if !self.test_chunk_block_limits(chunk.weight(), chunk.sigops_cost()) {
				trace!(target: "miner", "Chunk of {} transactions exceeds block limits", chunk.entries().len());
				false
			} else if !self.test_chunk_transactions(chunk.entries()) {
				error!(
					target: "miner",
					"Chunk with non-final transaction {} at height {}",
					first_hash(chunk.entries()),
					self.height
				);
				false
			} else {
				for entry in chunk.entries() {
					self.add_to_block(entry);
				}
				self.package_feerates.push(feerate_vsize);
				true
			};

			if accepted {
				builder.include_chunk();
				consecutive_failed = 0;
				selected += 1;
				continue;
			}

			builder.skip_chunk();
			skipped += 1;
			consecutive_failed += 1;
			if consecutive_failed > MAX_CONSECUTIVE_FAILURES
				&& self.block_weight + BLOCK_FULL_ENOUGH_WEIGHT_DELTA > self.options.block_max_weight
			{
				debug!(target: "miner", "Giving up after {} failed chunks, block is nearly full", consecutive_failed);
				break;
			}
		}

		(selected, skipped)
	}
}

fn first_hash(entries: &[MemoryPoolEntry]) -> SHA256D {
	entries.first().map_or_else(zero_hash, |entry| entry.transaction.hash)
}

fn millis(from: Instant, to: Instant) -> f64 {
	to.duration_since(from).as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
	use super::{BlockAssembler, MAX_CONSECUTIVE_FAILURES};
	use crate::{Chunk, KernelNotifications, MemoryPool, MemoryPoolEntry, MiningContext, Options};
	use network::Network;
	use primitives::fee_rate::FeeRate;
	use std::sync::Arc;
	use storage::ChainState;
	use test_data::{MockTime, TestChain, TransactionBuilder};

	fn context(chain: TestChain) -> MiningContext {
		MiningContext::new(Arc::new(chain), Arc::new(KernelNotifications::new()), Arc::new(MockTime::new(1_000_000)))
	}

	fn entry(id: i32, fee: i64, weight: usize, sigops_cost: usize) -> MemoryPoolEntry {
		MemoryPoolEntry {
			transaction: TransactionBuilder::with_version(id).add_output(1).into_indexed(),
			fee,
			weight,
			sigops_cost,
		}
	}

	fn options() -> Options {
		Options {
			block_reserved_weight: 0,
			coinbase_output_max_additional_sigops: 0,
			test_block_validity: false,
			..Default::default()
		}
	}

	#[test]
	fn test_consecutive_failures_give_up_when_nearly_full() {
		let context = context(TestChain::with_genesis(Network::Unitest, 999_000));
		let pool = MemoryPool::new();
		pool.insert_chunk(Chunk::new(vec![entry(0, 1_000_000, 9000, 0)]));
		for id in 1..=(MAX_CONSECUTIVE_FAILURES as i32 + 1) {
			pool.insert_chunk(Chunk::new(vec![entry(id, 2000, 2000, 0)]));
		}
		// fits, but comes after too many failures
		pool.insert_chunk(Chunk::new(vec![entry(-1, 10, 100, 0)]));

		let options = Options {
			block_max_weight: 10_000,
			..options()
		};
		let template = BlockAssembler::new(&context, Some(&pool), options).create_new_block().unwrap();
		assert_eq!(template.tx_fees, vec![1_000_000]);
	}

	#[test]
	fn test_failures_do_not_stop_selection_with_room_left() {
		let context = context(TestChain::with_genesis(Network::Unitest, 999_000));
		let pool = MemoryPool::new();
		pool.insert_chunk(Chunk::new(vec![entry(0, 1_000_000, 1000, 0)]));
		for id in 1..=(MAX_CONSECUTIVE_FAILURES as i32 + 1) {
			pool.insert_chunk(Chunk::new(vec![entry(id, 200_000, 20_000, 0)]));
		}
		pool.insert_chunk(Chunk::new(vec![entry(-1, 10, 100, 0)]));

		let options = Options {
			block_max_weight: 10_000,
			..options()
		};
		let template = BlockAssembler::new(&context, Some(&pool), options).create_new_block().unwrap();
		assert_eq!(template.tx_fees, vec![1_000_000, 10]);
	}

	#[test]
	fn test_reserved_weight_and_sigops() {
		let chain = TestChain::with_genesis(Network::Unitest, 999_000);
		let max_sigops = chain.consensus().max_block_sigops_cost;
		let context = context(chain);
		let pool = MemoryPool::new();
		pool.insert_chunk(Chunk::new(vec![entry(0, 100_000, 1000, 0)]));
		pool.insert_chunk(Chunk::new(vec![entry(1, 50_000, 1000, max_sigops - 400)]));
		pool.insert_chunk(Chunk::new(vec![entry(2, 10_000, 1000, max_sigops - 401)]));

		let options = Options {
			block_max_weight: 10_000,
			block_reserved_weight: 8_500,
			coinbase_output_max_additional_sigops: 400,
			test_block_validity: false,
			..Default::default()
		};
		let template = BlockAssembler::new(&context, Some(&pool), options).create_new_block().unwrap();
		// the reserved weight leaves room for a single chunk
		assert_eq!(template.tx_fees, vec![100_000]);

		let options = Options {
			block_max_weight: 20_000,
			block_reserved_weight: 8_500,
			coinbase_output_max_additional_sigops: 400,
			test_block_validity: false,
			..Default::default()
		};
		let template = BlockAssembler::new(&context, Some(&pool), options).create_new_block().unwrap();
		// sigops exactly at the limit fit
		assert_eq!(template.tx_fees, vec![100_000, 50_000]);
		assert_eq!(template.tx_sigops_cost, vec![0, max_sigops - 400]);
	}

	#[test]
	fn test_min_fee_rate_is_inclusive() {
		let context = context(TestChain::with_genesis(Network::Unitest, 999_000));
		let pool = MemoryPool::new();
		// exactly 20 sat/vB
		pool.insert_chunk(Chunk::new(vec![entry(0, 500, 100, 0)]));
		// just below
		pool.insert_chunk(Chunk::new(vec![entry(1, 499, 100, 0)]));

		let options = Options {
			block_min_fee_rate: FeeRate::from_sat_per_vb(20),
			..options()
		};
		let template = BlockAssembler::new(&context, Some(&pool), options).create_new_block().unwrap();
		assert_eq!(template.tx_fees, vec![500]);
	}
}
