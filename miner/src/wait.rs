//! Waiting for the next block template.
//!
//! Waits block on tip notifications with absolute deadlines and re-check their condition on
//! every wake. The notification lock is always released before the chain state is read.

use crate::{BlockAssembler, BlockTemplate, BlockWaitOptions, Error, Interrupt, KernelNotifications, MiningContext, Options, TransactionPool};
use bitcrypto::{zero_hash, SHA256D};
use primitives::fee_rate::{Amount, MAX_MONEY};
use std::cmp;
use std::time::{Duration, Instant};
use storage::{BlockRef, ChainState};

/// Interval at which `wait_and_create_new_block` checks for fee increases.
const FEE_CHECK_TICK: Duration = Duration::from_secs(1);

/// Age of the tip after which test networks accept a minimum difficulty block.
const MIN_DIFFICULTY_DELAY: i64 = 20 * 60;

/// How long to wait for the tip to catch up with the best header chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownPolicy {
	pub min_window: Duration,
	pub max_window: Duration,
}

impl Default for CooldownPolicy {
	fn default() -> Self {
		CooldownPolicy {
			min_window: Duration::from_secs(3),
			max_window: Duration::from_secs(20),
		}
	}
}

impl CooldownPolicy {
	/// One second per block the headers are ahead, within `[min_window, max_window]`.
	pub fn window(&self, blocks_ahead: u32) -> Duration {
		cmp::min(cmp::max(Duration::from_secs(blocks_ahead as u64), self.min_window), self.max_window)
	}
}

fn is_interrupted(notifications: &KernelNotifications, interrupt: &Interrupt) -> bool {
	notifications.is_shutdown() || interrupt.is_set()
}

/// Current active tip, `None` before the first block is connected.
pub fn get_tip(chain: &dyn ChainState) -> Option<BlockRef> {
	chain.tip().map(|tip| tip.block_ref())
}

/// Waits until the tip differs from `current_tip`, `timeout` passes or the wait is interrupted.
///
/// While no tip is connected yet the timeout is ignored. On return `timeout` holds the time
/// left. Returns the new tip, `None` on timeout or interruption.
pub fn wait_tip_changed(context: &MiningContext, current_tip: &SHA256D, timeout: &mut Duration, interrupt: &Interrupt) -> Option<BlockRef> {
	let start = Instant::now();
	let deadline = start.checked_add(*timeout);
	let notifications = &context.notifications;

	notifications.wait_until(None, |tip| tip.is_some() || is_interrupted(notifications, interrupt));
	if !is_interrupted(notifications, interrupt) {
		notifications.wait_until(deadline, |tip| tip != Some(current_tip) || is_interrupted(notifications, interrupt));
	}
	*timeout = timeout.checked_sub(start.elapsed()).unwrap_or_default();

	if is_interrupted(notifications, interrupt) {
		debug!(target: "miner", "Tip wait interrupted");
		return None;
	}
	get_tip(&*context.chain).filter(|tip| &tip.hash != current_tip)
}

/// Waits while the best header chain is ahead of the tip, so no template is handed out for a
/// tip that is about to be replaced.
///
/// Every tip change opens a new window. Stops once a window passes without progress, which
/// bounds the stall a peer announcing headers without blocks can cause.
/// Returns `false` when interrupted.
pub fn cooldown_if_headers_ahead(context: &MiningContext, last_tip: &BlockRef, interrupt: &Interrupt, policy: &CooldownPolicy) -> bool {
	let notifications = &context.notifications;
	if is_interrupted(notifications, interrupt) {
		return false;
	}

	let mut last_tip_hash = last_tip.hash;
	while let Some(blocks_ahead) = context.chain.blocks_ahead_of_tip() {
		let window = policy.window(blocks_ahead);
		let deadline = Instant::now() + window;
		debug!(
			target: "miner",
			"Headers are {} blocks ahead of tip {}, waiting up to {}s",
			blocks_ahead,
			last_tip_hash,
			window.as_secs()
		);

		let tip = notifications.wait_until(Some(deadline), |tip| {
			is_interrupted(notifications, interrupt) || tip.map_or(false, |tip| tip != &last_tip_hash)
		});
		if is_interrupted(notifications, interrupt) {
			return false;
		}

		match tip {
			Some(tip) if tip != last_tip_hash => {
				last_tip_hash = tip;
				continue;
			}
			_ => (),
		}

		if Instant::now() >= deadline {
			debug!(target: "miner", "Tip did not move for {}s, ending cooldown", window.as_secs());
			break;
		}
	}
	true
}

/// Waits for a template worth switching to.
///
/// A template is returned as soon as the tip moves away from `previous`, or once the fees of a
/// fresh template exceed those of `previous` by `fee_threshold`. Fees are checked once per tick.
/// Returns `Ok(None)` on timeout or interruption.
pub fn wait_and_create_new_block(
	context: &MiningContext,
	mempool: Option<&dyn TransactionPool>,
	previous: Option<&BlockTemplate>,
	wait_options: &BlockWaitOptions,
	assemble_options: &Options,
	interrupt: &Interrupt,
) -> Result<Option<BlockTemplate>, Error> {
	let notifications = &context.notifications;
	let allow_min_difficulty = context.chain.consensus().pow_allow_min_difficulty_blocks;
	let previous_tip = previous.map(|template| template.block.block_header.previous_header_hash);
	// computed lazily, a new tip may come in before the first tick
	let mut current_fees: Option<Amount> = None;

	let mut now = Instant::now();
	let deadline = wait_options.timeout.and_then(|timeout| now.checked_add(timeout));

	loop {
		let tick_deadline = match deadline {
			Some(deadline) => cmp::min(now + FEE_CHECK_TICK, deadline),
			None => now + FEE_CHECK_TICK,
		};

		let mut tip_changed = false;
		notifications.wait_until(Some(tick_deadline), |tip| {
			tip_changed = match (tip, previous_tip.as_ref()) {
				(Some(tip), Some(previous_tip)) => tip != previous_tip,
				(Some(_), None) => true,
				(None, _) => false,
			};
			tip_changed || is_interrupted(notifications, interrupt)
		});
		if is_interrupted(notifications, interrupt) {
			debug!(target: "miner", "Template wait interrupted");
			return Ok(None);
		}

		if !tip_changed && allow_min_difficulty {
			if let Some(tip) = context.chain.tip() {
				if context.time.now_secs() > tip.time as i64 + MIN_DIFFICULTY_DELAY {
					tip_changed = true;
				}
			}
		}

		if tip_changed || wait_options.fee_threshold < MAX_MONEY {
			let template = BlockAssembler::new(context, mempool, assemble_options.clone()).create_new_block()?;
			if tip_changed {
				trace!(target: "miner", "Returning template for new tip {}", template.block.block_header.previous_header_hash);
				return Ok(Some(template));
			}

			let current_fees = *current_fees.get_or_insert_with(|| previous.map_or(0, BlockTemplate::total_fees));
			let new_fees = template.total_fees();
			if new_fees >= current_fees + wait_options.fee_threshold {
				trace!(target: "miner", "Returning template, fees rose from {} to {}", current_fees, new_fees);
				return Ok(Some(template));
			}
		}

		now = Instant::now();
		if deadline.map_or(false, |deadline| now >= deadline) {
			return Ok(None);
		}
	}
}

/// Wakes every wait sharing `interrupt` and makes it return `None`.
pub fn interrupt_wait(notifications: &KernelNotifications, interrupt: &Interrupt) {
	notifications.interrupt(interrupt);
}

/// Creates the first template of a mining session.
///
/// Waits for a tip and for the tip to catch up with the header chain before assembling.
/// Returns `Ok(None)` when interrupted.
pub fn create_new_block_with_cooldown(
	context: &MiningContext,
	mempool: Option<&dyn TransactionPool>,
	options: &Options,
	policy: &CooldownPolicy,
	interrupt: &Interrupt,
) -> Result<Option<BlockTemplate>, Error> {
	let mut timeout = Duration::from_secs(u64::max_value());
	let tip = match wait_tip_changed(context, &zero_hash(), &mut timeout, interrupt) {
		Some(tip) => tip,
		None => return Ok(None),
	};
	if !cooldown_if_headers_ahead(context, &tip, interrupt, policy) {
		return Ok(None);
	}
	BlockAssembler::new(context, mempool, options.clone()).create_new_block().map(Some)
}

#[cfg(test)]
mod tests {
	use super::CooldownPolicy;
	use std::time::Duration;

	#[test]
	fn test_cooldown_window() {
		let policy = CooldownPolicy::default();
		assert_eq!(policy.window(1), Duration::from_secs(3));
		assert_eq!(policy.window(3), Duration::from_secs(3));
		assert_eq!(policy.window(12), Duration::from_secs(12));
		assert_eq!(policy.window(20), Duration::from_secs(20));
		assert_eq!(policy.window(5000), Duration::from_secs(20));
	}
}
