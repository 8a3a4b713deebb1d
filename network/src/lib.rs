extern crate primitives;

mod consensus;
mod deployments;
mod network;

pub use primitives::{compact, fee_rate};

pub use consensus::ConsensusParams;
pub use deployments::Deployment;
pub use network::Network;
