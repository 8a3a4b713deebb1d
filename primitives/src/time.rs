use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of network-adjusted wall clock time.
pub trait Time: Send + Sync {
	// The duration since the UNIX epoch.
	fn now(&self) -> Duration;

	/// Whole seconds since the UNIX epoch.
	fn now_secs(&self) -> i64 {
		self.now().as_secs() as i64
	}
}

#[derive(Default, Debug)]
pub struct RealTime;

impl Time for RealTime {
	fn now(&self) -> Duration {
		SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
	}
}
