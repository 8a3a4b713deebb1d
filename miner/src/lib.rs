#[macro_use]
extern crate log;
extern crate clap;
extern crate parking_lot;

extern crate bitcrypto;
extern crate chain;
extern crate network;
extern crate primitives;
extern crate storage;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
#[cfg(test)]
extern crate test_data;

mod block_assembler;
mod block_template;
mod commitments;
pub mod config;
mod context;
mod error;
mod memory_pool;
mod notifications;
mod options;
mod stats;
mod time;
mod wait;

pub use block_assembler::BlockAssembler;
pub use block_template::{BlockTemplate, CoinbaseTemplate};
pub use commitments::{add_merkle_root_and_coinbase, generate_coinbase_commitment, regenerate_commitments, witness_commitment_index};
pub use context::MiningContext;
pub use error::Error;
pub use memory_pool::{BlockBuilder, Chunk, LockedPool, MemoryPool, MemoryPoolEntry, TransactionPool};
pub use notifications::{Interrupt, KernelNotifications};
pub use options::{
	BlockWaitOptions, Options, DEFAULT_BLOCK_MAX_WEIGHT, DEFAULT_BLOCK_MIN_TX_FEE, DEFAULT_BLOCK_RESERVED_WEIGHT,
	DEFAULT_COINBASE_OUTPUT_MAX_ADDITIONAL_SIGOPS, DEFAULT_PRINT_MODIFIED_FEE,
};
pub use stats::{LastBlock, LastBlockStats};
pub use time::{get_minimum_time, update_time, MAX_FUTURE_BLOCK_TIME, MAX_TIMEWARP};
pub use wait::{
	cooldown_if_headers_ahead, create_new_block_with_cooldown, get_tip, interrupt_wait, wait_and_create_new_block, wait_tip_changed,
	CooldownPolicy,
};
