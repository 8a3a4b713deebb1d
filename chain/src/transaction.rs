//! Bitcoin transaction.
//! https://en.bitcoin.it/wiki/Protocol_documentation#tx

use crate::constants::{LOCKTIME_THRESHOLD, SEQUENCE_FINAL, WITNESS_SCALE_FACTOR};
use bitcrypto::{dhash256, zero_hash, SHA256D};
use ser::{serialize, serialize_with_flags, CompactInteger, Serializable, Stream, SERIALIZE_TRANSACTION_WITNESS};

/// Must be zero.
const WITNESS_MARKER: u8 = 0;
/// Must be nonzero.
const WITNESS_FLAG: u8 = 1;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OutPoint {
	pub hash: SHA256D,
	pub index: u32,
}

impl OutPoint {
	pub fn null() -> Self {
		OutPoint {
			hash: zero_hash(),
			index: u32::max_value(),
		}
	}

	pub fn is_null(&self) -> bool {
		self.hash == zero_hash() && self.index == u32::max_value()
	}
}

impl Serializable for OutPoint {
	fn serialize(&self, stream: &mut Stream) {
		stream.append_slice(&self.hash[..]).append(&self.index);
	}
}

#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct TransactionInput {
	pub previous_output: OutPoint,
	pub script_sig: Vec<u8>,
	pub sequence: u32,
	pub script_witness: Vec<Vec<u8>>,
}

impl Default for OutPoint {
	fn default() -> Self {
		OutPoint {
			hash: zero_hash(),
			index: 0,
		}
	}
}

impl TransactionInput {
	pub fn coinbase(script_sig: Vec<u8>) -> Self {
		TransactionInput {
			previous_output: OutPoint::null(),
			script_sig,
			sequence: SEQUENCE_FINAL,
			script_witness: vec![],
		}
	}

	pub fn is_final(&self) -> bool {
		self.sequence == SEQUENCE_FINAL
	}

	pub fn has_witness(&self) -> bool {
		!self.script_witness.is_empty()
	}
}

impl Serializable for TransactionInput {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.previous_output)
			.append_bytes(&self.script_sig)
			.append(&self.sequence);
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TransactionOutput {
	pub value: u64,
	pub script_pubkey: Vec<u8>,
}

impl Serializable for TransactionOutput {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.value).append_bytes(&self.script_pubkey);
	}
}

#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Transaction {
	pub version: i32,
	pub inputs: Vec<TransactionInput>,
	pub outputs: Vec<TransactionOutput>,
	pub lock_time: u32,
}

impl Transaction {
	/// Transaction id. Never commits to witness data.
	pub fn hash(&self) -> SHA256D {
		dhash256(&serialize(self))
	}

	/// Witness transaction id. Equal to `hash` for transactions without witness.
	pub fn witness_hash(&self) -> SHA256D {
		dhash256(&serialize_with_flags(self, SERIALIZE_TRANSACTION_WITNESS))
	}

	pub fn is_empty(&self) -> bool {
		self.inputs.is_empty() || self.outputs.is_empty()
	}

	pub fn is_coinbase(&self) -> bool {
		self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
	}

	pub fn has_witness(&self) -> bool {
		self.inputs.iter().any(TransactionInput::has_witness)
	}

	/// Size without witness data.
	pub fn base_size(&self) -> usize {
		self.serialized_size()
	}

	/// Size including witness data.
	pub fn total_size(&self) -> usize {
		self.serialized_size_with_flags(SERIALIZE_TRANSACTION_WITNESS)
	}

	/// BIP141 weight: base size * 3 + total size.
	pub fn weight(&self) -> usize {
		self.base_size() * (WITNESS_SCALE_FACTOR - 1) + self.total_size()
	}

	/// Virtual size, weight divided by the witness scale factor and rounded up.
	pub fn vsize(&self) -> usize {
		(self.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR
	}

	pub fn total_spends(&self) -> u64 {
		self.outputs.iter().fold(0u64, |acc, output| acc.saturating_add(output.value))
	}

	/// Checks whether the transaction may be included in a block at `height` whose
	/// lock time cutoff is `time`.
	pub fn is_final_in_block(&self, height: u32, time: i64) -> bool {
		if self.lock_time == 0 {
			return true;
		}

		let max_lock_time = if self.lock_time < LOCKTIME_THRESHOLD {
			height as i64
		} else {
			time
		};

		if (self.lock_time as i64) < max_lock_time {
			return true;
		}

		self.inputs.iter().all(TransactionInput::is_final)
	}
}

impl Serializable for Transaction {
	fn serialize(&self, stream: &mut Stream) {
		let include_transaction_witness = stream.include_transaction_witness() && self.has_witness();
		match include_transaction_witness {
			false => stream
				.append(&self.version)
				.append_list(&self.inputs)
				.append_list(&self.outputs)
				.append(&self.lock_time),
			true => {
				stream
					.append(&self.version)
					.append(&WITNESS_MARKER)
					.append(&WITNESS_FLAG)
					.append_list(&self.inputs)
					.append_list(&self.outputs);
				for input in &self.inputs {
					stream.append(&CompactInteger::from(input.script_witness.len()));
					for item in &input.script_witness {
						stream.append_bytes(item);
					}
				}
				stream.append(&self.lock_time)
			}
		};
	}
}
