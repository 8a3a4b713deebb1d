use primitives::time::Time;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Settable clock.
#[derive(Default, Debug)]
pub struct MockTime {
	secs: AtomicU64,
}

impl MockTime {
	pub fn new(secs: u64) -> Self {
		MockTime { secs: AtomicU64::new(secs) }
	}

	pub fn set(&self, secs: u64) {
		self.secs.store(secs, Ordering::SeqCst);
	}

	pub fn advance(&self, secs: u64) {
		self.secs.fetch_add(secs, Ordering::SeqCst);
	}
}

impl Time for MockTime {
	fn now(&self) -> Duration {
		Duration::from_secs(self.secs.load(Ordering::SeqCst))
	}
}
