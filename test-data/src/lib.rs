//! Fixtures for block assembly tests.

extern crate bitcrypto;
extern crate chain;
extern crate network;
extern crate parking_lot;
extern crate primitives;
extern crate storage;

mod chain_builder;
mod time;
mod transaction_builder;

pub use chain_builder::TestChain;
pub use time::MockTime;
pub use transaction_builder::TransactionBuilder;
