use crate::compact::Compact;
use crate::fee_rate::{Amount, COIN};
use crate::{Deployment, Network};

#[derive(Debug, Clone)]
/// Parameters that influence chain consensus.
pub struct ConsensusParams {
	/// Network.
	pub network: Network,
	/// Block height at which BIP34 becomes active.
	/// See https://github.com/bitcoin/bips/blob/master/bip-0034.mediawiki
	pub bip34_height: u32,
	/// BIP68, BIP112, BIP113 deployment
	pub csv_deployment: Option<Deployment>,
	/// BIP141, BIP143, BIP147 deployment
	pub segwit_deployment: Option<Deployment>,
	/// Witness scale factor
	pub witness_scale_factor: usize,
	/// Maximum block weight (BIP141).
	pub max_block_weight: usize,
	/// Maximum block sigops cost (BIP141).
	pub max_block_sigops_cost: usize,
	/// Number of blocks after creation that a coinbase transaction becomes spendable
	pub coinbase_maturity: u32,
	/// Number of blocks between block subsidy halvings.
	pub subsidy_halving_interval: u32,
	/// Expected time between blocks, in seconds.
	pub pow_target_spacing: u32,
	/// Difficulty retarget period, in seconds.
	pub pow_target_timespan: u32,
	/// Allow blocks at minimum difficulty when no block was found for twice the target spacing.
	pub pow_allow_min_difficulty_blocks: bool,
	/// Whether the BIP94 timewarp rule is a consensus rule on this network.
	pub enforce_bip94: bool,
	/// Lowest difficulty in compact form.
	pub pow_limit_bits: Compact,
}

impl ConsensusParams {
	pub fn new(network: Network) -> Self {
		match network {
			Network::Mainnet => ConsensusParams {
				network,
				bip34_height: 227931, // 000000000000024b89b42a942fe0d9fea3bb44ab7bd1b19115dd6a759c0808b8
				csv_deployment: Some(Deployment {
					name: "csv",
					activation: Some(419328),
				}),
				segwit_deployment: Some(Deployment {
					name: "segwit",
					activation: Some(481824),
				}),
				witness_scale_factor: 4,
				max_block_weight: 4_000_000,
				max_block_sigops_cost: 80_000,
				coinbase_maturity: 100,
				subsidy_halving_interval: 210_000,
				pow_target_spacing: 10 * 60,
				pow_target_timespan: 14 * 24 * 60 * 60, // two weeks
				pow_allow_min_difficulty_blocks: false,
				enforce_bip94: false,
				pow_limit_bits: 0x1d00ffff.into(),
			},
			Network::Testnet => ConsensusParams {
				network,
				bip34_height: 21111, // 0000000023b3a96d3484e5abb3755c413e7d41500f8e2a5c3f0dd01299cd8ef8
				csv_deployment: Some(Deployment {
					name: "csv",
					activation: Some(770112),
				}),
				segwit_deployment: Some(Deployment {
					name: "segwit",
					activation: Some(834624),
				}),
				witness_scale_factor: 4,
				max_block_weight: 4_000_000,
				max_block_sigops_cost: 80_000,
				coinbase_maturity: 100,
				subsidy_halving_interval: 210_000,
				pow_target_spacing: 10 * 60,
				pow_target_timespan: 14 * 24 * 60 * 60,
				pow_allow_min_difficulty_blocks: true,
				enforce_bip94: false,
				pow_limit_bits: 0x1d00ffff.into(),
			},
			Network::Testnet4 => ConsensusParams {
				network,
				bip34_height: 1,
				csv_deployment: Some(Deployment {
					name: "csv",
					activation: Some(1),
				}),
				segwit_deployment: Some(Deployment {
					name: "segwit",
					activation: Some(1),
				}),
				witness_scale_factor: 4,
				max_block_weight: 4_000_000,
				max_block_sigops_cost: 80_000,
				coinbase_maturity: 100,
				subsidy_halving_interval: 210_000,
				pow_target_spacing: 10 * 60,
				pow_target_timespan: 14 * 24 * 60 * 60,
				pow_allow_min_difficulty_blocks: true,
				enforce_bip94: true,
				pow_limit_bits: 0x1d00ffff.into(),
			},
			Network::Regtest | Network::Unitest => ConsensusParams {
				network,
				bip34_height: 1,
				csv_deployment: Some(Deployment {
					name: "csv",
					activation: Some(1),
				}),
				segwit_deployment: Some(Deployment {
					name: "segwit",
					activation: Some(0),
				}),
				witness_scale_factor: 4,
				max_block_weight: 4_000_000,
				max_block_sigops_cost: 80_000,
				coinbase_maturity: 100,
				subsidy_halving_interval: 150,
				pow_target_spacing: 10 * 60,
				pow_target_timespan: 14 * 24 * 60 * 60,
				pow_allow_min_difficulty_blocks: network == Network::Regtest,
				enforce_bip94: false,
				pow_limit_bits: 0x207fffff.into(),
			},
		}
	}

	/// Number of blocks between difficulty adjustments.
	pub fn difficulty_adjustment_interval(&self) -> u32 {
		self.pow_target_timespan / self.pow_target_spacing
	}

	/// Whether BIP113 median time past lock time semantics apply at `height`.
	pub fn is_csv_active(&self, height: u32) -> bool {
		self.csv_deployment.map_or(false, |deployment| deployment.is_active(height))
	}

	pub fn is_segwit_active(&self, height: u32) -> bool {
		self.segwit_deployment.map_or(false, |deployment| deployment.is_active(height))
	}

	/// New coins created by the block at `height`.
	pub fn block_subsidy(&self, height: u32) -> Amount {
		let halvings = height / self.subsidy_halving_interval;
		// Force block reward to zero when right shift is undefined.
		if halvings >= 64 {
			return 0;
		}
		(50 * COIN) >> halvings
	}
}

impl Default for ConsensusParams {
	fn default() -> Self {
		ConsensusParams::new(Network::default())
	}
}

#[cfg(test)]
mod tests {
	use super::super::Network;
	use super::ConsensusParams;
	use crate::fee_rate::COIN;

	#[test]
	fn test_consensus_params_bip34_height() {
		assert_eq!(ConsensusParams::new(Network::Mainnet).bip34_height, 227931);
		assert_eq!(ConsensusParams::new(Network::Testnet).bip34_height, 21111);
		assert_eq!(ConsensusParams::new(Network::Regtest).bip34_height, 1);
	}

	#[test]
	fn test_difficulty_adjustment_interval() {
		assert_eq!(ConsensusParams::new(Network::Mainnet).difficulty_adjustment_interval(), 2016);
		assert_eq!(ConsensusParams::new(Network::Testnet4).difficulty_adjustment_interval(), 2016);
		assert_eq!(ConsensusParams::new(Network::Regtest).difficulty_adjustment_interval(), 2016);
	}

	#[test]
	fn test_block_subsidy() {
		let mainnet = ConsensusParams::new(Network::Mainnet);
		assert_eq!(mainnet.block_subsidy(0), 50 * COIN);
		assert_eq!(mainnet.block_subsidy(209_999), 50 * COIN);
		assert_eq!(mainnet.block_subsidy(210_000), 25 * COIN);
		assert_eq!(mainnet.block_subsidy(840_000), 3 * COIN + COIN / 8);
		assert_eq!(mainnet.block_subsidy(64 * 210_000), 0);

		let regtest = ConsensusParams::new(Network::Regtest);
		assert_eq!(regtest.block_subsidy(150), 25 * COIN);
	}

	#[test]
	fn test_deployment_activation() {
		let mainnet = ConsensusParams::new(Network::Mainnet);
		assert!(!mainnet.is_csv_active(419327));
		assert!(mainnet.is_csv_active(419328));
		assert!(!mainnet.is_segwit_active(481823));
		assert!(mainnet.is_segwit_active(481824));
		assert!(ConsensusParams::new(Network::Regtest).is_segwit_active(0));
	}

	#[test]
	fn test_min_difficulty_and_timewarp_flags() {
		assert!(!ConsensusParams::new(Network::Mainnet).pow_allow_min_difficulty_blocks);
		assert!(ConsensusParams::new(Network::Regtest).pow_allow_min_difficulty_blocks);
		assert!(!ConsensusParams::new(Network::Unitest).pow_allow_min_difficulty_blocks);
		assert!(ConsensusParams::new(Network::Testnet4).enforce_bip94);
		assert!(!ConsensusParams::new(Network::Mainnet).enforce_bip94);
	}
}
