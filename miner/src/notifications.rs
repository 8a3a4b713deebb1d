use bitcrypto::SHA256D;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared cancellation flag.
///
/// Stays set until `reset` is called, so every waiter sharing it returns.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
	pub fn new() -> Self {
		Interrupt::default()
	}

	pub fn is_set(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}

	pub fn reset(&self) {
		self.0.store(false, Ordering::SeqCst);
	}

	pub(crate) fn set(&self) {
		self.0.store(true, Ordering::SeqCst);
	}
}

/// Chain tip events consumed by template waiters.
#[derive(Debug, Default)]
pub struct KernelNotifications {
	tip_block: Mutex<Option<SHA256D>>,
	tip_block_cv: Condvar,
	shutdown: Interrupt,
}

impl KernelNotifications {
	pub fn new() -> Self {
		KernelNotifications::default()
	}

	/// Called whenever a new block becomes the active tip.
	pub fn block_tip(&self, hash: SHA256D) {
		trace!(target: "miner", "New tip notification {}", hash);
		*self.tip_block.lock() = Some(hash);
		self.tip_block_cv.notify_all();
	}

	/// Most recently announced tip.
	pub fn tip_block(&self) -> Option<SHA256D> {
		*self.tip_block.lock()
	}

	/// Node is shutting down. Wakes every waiter for good.
	pub fn shutdown(&self) {
		self.interrupt(&self.shutdown);
	}

	pub fn is_shutdown(&self) -> bool {
		self.shutdown.is_set()
	}

	/// Sets `interrupt` under the tip lock, so no waiter can miss it.
	pub(crate) fn interrupt(&self, interrupt: &Interrupt) {
		let _lock = self.tip_block.lock();
		interrupt.set();
		self.tip_block_cv.notify_all();
	}

	/// Blocks until `done` holds for the announced tip or `deadline` passes.
	/// Returns the tip seen last.
	///
	/// The predicate is evaluated before waiting and after every wake, spurious ones included.
	pub(crate) fn wait_until<F>(&self, deadline: Option<Instant>, mut done: F) -> Option<SHA256D>
	where
		F: FnMut(Option<&SHA256D>) -> bool,
	{
		let mut tip = self.tip_block.lock();
		while !done(tip.as_ref()) {
			match deadline {
				Some(deadline) => {
					if Instant::now() >= deadline {
						break;
					}
					self.tip_block_cv.wait_until(&mut tip, deadline);
				}
				None => self.tip_block_cv.wait(&mut tip),
			}
		}
		*tip
	}
}
