//! Bitcoin network

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Network {
	/// The original and main network for Bitcoin transactions, where satoshis have real economic value.
	Mainnet,
	/// The main bitcoin testnet.
	Testnet,
	/// Testnet with the BIP94 timewarp fix enforced.
	Testnet4,
	/// Bitcoin regtest network.
	Regtest,
	/// Testnet for unittests, proof of work difficulty is almost 0
	Unitest,
}

impl Network {
	pub fn name(&self) -> &'static str {
		match *self {
			Network::Mainnet => "main",
			Network::Testnet => "test",
			Network::Testnet4 => "testnet4",
			Network::Regtest => "regtest",
			Network::Unitest => "unitest",
		}
	}
}

impl Default for Network {
	fn default() -> Self {
		Network::Mainnet
	}
}
