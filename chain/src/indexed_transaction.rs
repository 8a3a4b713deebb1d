use crate::transaction::Transaction;
use bitcrypto::SHA256D;
use std::{cmp, fmt};

/// Transaction together with its cached id.
#[derive(Clone)]
pub struct IndexedTransaction {
	pub hash: SHA256D,
	pub raw: Transaction,
}

impl fmt::Debug for IndexedTransaction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("IndexedTransaction")
			.field("hash", &self.hash)
			.field("raw", &self.raw)
			.finish()
	}
}

impl<T> From<T> for IndexedTransaction
where
	Transaction: From<T>,
{
	fn from(other: T) -> Self {
		Self::from_raw(other)
	}
}

impl IndexedTransaction {
	pub fn new(hash: SHA256D, transaction: Transaction) -> Self {
		IndexedTransaction { hash, raw: transaction }
	}

	/// Explicit conversion of the raw Transaction into IndexedTransaction.
	///
	/// Hashes transaction contents.
	pub fn from_raw<T>(transaction: T) -> Self
	where
		Transaction: From<T>,
	{
		let transaction = Transaction::from(transaction);
		Self::new(transaction.hash(), transaction)
	}
}

impl cmp::PartialEq for IndexedTransaction {
	fn eq(&self, other: &Self) -> bool {
		self.hash == other.hash
	}
}
