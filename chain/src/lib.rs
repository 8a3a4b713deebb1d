extern crate primitives;
extern crate rayon;
extern crate serialization as ser;

pub mod constants;
pub mod script;

mod block;
mod block_header;
mod indexed_transaction;
mod merkle_root;
mod transaction;

pub use primitives::{compact, fee_rate};

pub use block::Block;
pub use block_header::BlockHeader;
pub use indexed_transaction::IndexedTransaction;
pub use merkle_root::{merkle_node_hash, merkle_root};
pub use transaction::{OutPoint, Transaction, TransactionInput, TransactionOutput};
