extern crate chain;
extern crate network;
extern crate primitives;

mod block_index;
mod block_ref;
mod chain_state;
mod error;

pub use primitives::compact;

pub use block_index::BlockIndex;
pub use block_ref::BlockRef;
pub use chain_state::{ChainState, SharedChainState, VERSIONBITS_TOP_BITS};
pub use error::Error;
