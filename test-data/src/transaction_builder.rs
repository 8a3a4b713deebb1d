use bitcrypto::SHA256D;
use chain::constants::SEQUENCE_FINAL;
use chain::script::OP_TRUE;
use chain::{IndexedTransaction, OutPoint, Transaction, TransactionInput, TransactionOutput};

#[derive(Debug, Default, Clone)]
pub struct TransactionBuilder {
	pub transaction: Transaction,
}

impl TransactionBuilder {
	pub fn with_version(version: i32) -> TransactionBuilder {
		let builder = TransactionBuilder::default();
		builder.set_version(version)
	}

	pub fn with_output(value: u64) -> TransactionBuilder {
		let builder = TransactionBuilder::default();
		builder.add_output(value)
	}

	/// Transaction spending output `index` of `hash`.
	pub fn spending(hash: &SHA256D, index: u32) -> TransactionBuilder {
		TransactionBuilder::default().add_input(hash, index)
	}

	pub fn set_version(mut self, version: i32) -> TransactionBuilder {
		self.transaction.version = version;
		self
	}

	pub fn add_output(mut self, value: u64) -> TransactionBuilder {
		self.transaction.outputs.push(TransactionOutput {
			value,
			script_pubkey: vec![OP_TRUE],
		});
		self
	}

	pub fn add_output_script(mut self, value: u64, script_pubkey: Vec<u8>) -> TransactionBuilder {
		self.transaction.outputs.push(TransactionOutput { value, script_pubkey });
		self
	}

	pub fn add_input(mut self, hash: &SHA256D, index: u32) -> TransactionBuilder {
		self.transaction.inputs.push(TransactionInput {
			previous_output: OutPoint { hash: *hash, index },
			script_sig: vec![],
			sequence: SEQUENCE_FINAL,
			script_witness: vec![],
		});
		self
	}

	/// Sets the sequence of every input.
	pub fn set_sequence(mut self, sequence: u32) -> TransactionBuilder {
		for input in &mut self.transaction.inputs {
			input.sequence = sequence;
		}
		self
	}

	pub fn set_lock_time(mut self, lock_time: u32) -> TransactionBuilder {
		self.transaction.lock_time = lock_time;
		self
	}

	/// Appends a witness item to the last input.
	pub fn add_witness(mut self, item: Vec<u8>) -> TransactionBuilder {
		if let Some(input) = self.transaction.inputs.last_mut() {
			input.script_witness.push(item);
		}
		self
	}

	pub fn hash(&self) -> SHA256D {
		self.transaction.hash()
	}

	pub fn into_transaction(self) -> Transaction {
		self.transaction
	}

	pub fn into_indexed(self) -> IndexedTransaction {
		IndexedTransaction::from_raw(self.transaction)
	}
}

impl From<TransactionBuilder> for Transaction {
	fn from(builder: TransactionBuilder) -> Transaction {
		builder.transaction
	}
}
