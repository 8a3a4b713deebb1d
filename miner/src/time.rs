use chain::BlockHeader;
use network::ConsensusParams;
use std::cmp;
use std::convert::TryFrom;
use storage::{BlockIndex, ChainState};

/// How far before its parent a block at a retarget boundary may be timestamped (BIP94).
pub const MAX_TIMEWARP: i64 = 600;

/// How far into the future a block timestamp may be.
pub const MAX_FUTURE_BLOCK_TIME: i64 = 2 * 60 * 60;

/// Header timestamp for `secs`, saturating at the bounds of the header field.
pub(crate) fn header_time(secs: i64) -> u32 {
	u32::try_from(cmp::max(secs, 0)).unwrap_or(u32::max_value())
}

/// Earliest timestamp a child of `parent` may carry.
///
/// On top of the median time past rule the timewarp bound is applied on every network,
/// so templates stay valid whether or not it is enforced.
pub fn get_minimum_time(parent: &BlockIndex, difficulty_adjustment_interval: u32) -> i64 {
	let mut min_time = parent.median_time_past as i64 + 1;
	let height = parent.height + 1;
	if height % difficulty_adjustment_interval == 0 {
		min_time = cmp::max(min_time, parent.time as i64 - MAX_TIMEWARP);
	}
	min_time
}

/// Moves the header timestamp to `max(minimum time, now)`. Returns the change.
///
/// The timestamp never moves backwards, unless it lies beyond the future block time limit.
/// Where minimum difficulty blocks are allowed the difficulty depends on the timestamp,
/// so `bits` is recomputed.
pub fn update_time(header: &mut BlockHeader, consensus: &ConsensusParams, parent: &BlockIndex, chain: &dyn ChainState, now: i64) -> i64 {
	let old_time = header.time as i64;
	let new_time = cmp::max(get_minimum_time(parent, consensus.difficulty_adjustment_interval()), now);

	if old_time < new_time || old_time > now + MAX_FUTURE_BLOCK_TIME {
		header.time = header_time(new_time);
	}

	if consensus.pow_allow_min_difficulty_blocks {
		header.bits = chain.next_work_required(parent, header);
	}

	new_time - old_time
}

#[cfg(test)]
mod tests {
	use super::{get_minimum_time, header_time, update_time, MAX_FUTURE_BLOCK_TIME, MAX_TIMEWARP};
	use bitcrypto::zero_hash;
	use chain::BlockHeader;
	use network::Network;
	use storage::{BlockIndex, ChainState};
	use test_data::TestChain;

	fn parent(height: u32, time: u32, median_time_past: u32) -> BlockIndex {
		BlockIndex {
			hash: zero_hash(),
			height,
			version: 4,
			time,
			bits: 0x1d00ffff.into(),
			median_time_past,
		}
	}

	fn header(time: u32) -> BlockHeader {
		BlockHeader {
			version: 4,
			previous_header_hash: zero_hash(),
			merkle_root_hash: zero_hash(),
			time,
			bits: 0x1d00ffff.into(),
			nonce: 0,
		}
	}

	#[test]
	fn test_minimum_time_is_past_median_time() {
		assert_eq!(get_minimum_time(&parent(100, 5000, 4000), 2016), 4001);
	}

	#[test]
	fn test_minimum_time_timewarp_at_retarget() {
		// next block starts a new difficulty period
		assert_eq!(get_minimum_time(&parent(2015, 10_000, 4000), 2016), 10_000 - MAX_TIMEWARP);
		// median time past still wins when it is later
		assert_eq!(get_minimum_time(&parent(2015, 4200, 4000), 2016), 4001);
		// not a boundary
		assert_eq!(get_minimum_time(&parent(2016, 10_000, 4000), 2016), 4001);
	}

	#[test]
	fn test_update_time_moves_forward() {
		let chain = TestChain::new(Network::Unitest);
		let consensus = chain.consensus().clone();
		let parent = parent(10, 1000, 900);

		let mut block_header = header(950);
		assert_eq!(update_time(&mut block_header, &consensus, &parent, &chain, 2000), 1050);
		assert_eq!(block_header.time, 2000);

		// clock behind the header, keep the header time
		assert_eq!(update_time(&mut block_header, &consensus, &parent, &chain, 1500), -500);
		assert_eq!(block_header.time, 2000);
	}

	#[test]
	fn test_update_time_respects_floors() {
		let chain = TestChain::new(Network::Unitest);
		let consensus = chain.consensus().clone();

		// clock behind median time past
		let mut block_header = header(0);
		update_time(&mut block_header, &consensus, &parent(10, 1000, 900), &chain, 100);
		assert_eq!(block_header.time, 901);

		// clock behind the timewarp floor
		let boundary = parent(2015, 100_000, 900);
		let mut block_header = header(0);
		update_time(&mut block_header, &consensus, &boundary, &chain, 1000);
		assert_eq!(block_header.time as i64, 100_000 - MAX_TIMEWARP);
		assert!(block_header.time as i64 >= get_minimum_time(&boundary, consensus.difficulty_adjustment_interval()));
	}

	#[test]
	fn test_update_time_pulls_back_future_header() {
		let chain = TestChain::new(Network::Unitest);
		let consensus = chain.consensus().clone();
		let mut block_header = header(10_000 + MAX_FUTURE_BLOCK_TIME as u32 + 1);
		update_time(&mut block_header, &consensus, &parent(10, 1000, 900), &chain, 10_000);
		assert_eq!(block_header.time, 10_000);
	}

	#[test]
	fn test_header_time_saturates() {
		assert_eq!(header_time(1_600_000_000), 1_600_000_000);
		assert_eq!(header_time(-5), 0);
		assert_eq!(header_time(u32::max_value() as i64 + 10), u32::max_value());

		let chain = TestChain::new(Network::Unitest);
		let mut block_header = header(1000);
		update_time(&mut block_header, chain.consensus(), &parent(10, 1000, 900), &chain, 1 << 40);
		assert_eq!(block_header.time, u32::max_value());
	}

	#[test]
	fn test_update_time_recomputes_min_difficulty_bits() {
		let chain = TestChain::new(Network::Regtest);
		let consensus = chain.consensus().clone();
		let parent = parent(10, 1000, 900);

		let mut block_header = header(1000);
		update_time(&mut block_header, &consensus, &parent, &chain, 1100);
		assert_eq!(block_header.bits, parent.bits);

		update_time(&mut block_header, &consensus, &parent, &chain, 1000 + 20 * 60 + 1);
		assert_eq!(block_header.bits, consensus.pow_limit_bits);

		// networks without minimum difficulty blocks keep the bits
		let chain = TestChain::new(Network::Unitest);
		let mut block_header = header(1000);
		update_time(&mut block_header, chain.consensus(), &parent, &chain, 1000 + 20 * 60 + 1);
		assert_eq!(block_header.bits, 0x1d00ffff.into());
	}
}
