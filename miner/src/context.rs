use crate::{KernelNotifications, LastBlockStats};
use primitives::time::Time;
use std::sync::Arc;
use storage::SharedChainState;

/// Everything block assembly and the template waits share with the node.
#[derive(Clone)]
pub struct MiningContext {
	pub chain: SharedChainState,
	pub notifications: Arc<KernelNotifications>,
	/// Network adjusted clock used for header timestamps.
	pub time: Arc<dyn Time>,
	pub stats: Arc<LastBlockStats>,
}

impl MiningContext {
	pub fn new(chain: SharedChainState, notifications: Arc<KernelNotifications>, time: Arc<dyn Time>) -> Self {
		MiningContext {
			chain,
			notifications,
			time,
			stats: Arc::new(LastBlockStats::new()),
		}
	}
}
