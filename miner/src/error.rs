use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
	/// No block is connected yet.
	NoTip,
	/// Block refers to a parent the chain state does not know.
	UnknownParent,
	/// Assembled block failed validation.
	TestBlockValidity(storage::Error),
	/// Invalid miner configuration.
	Config(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NoTip => write!(f, "Chain has no tip"),
			Error::UnknownParent => write!(f, "Block parent is unknown"),
			Error::TestBlockValidity(err) => write!(f, "TestBlockValidity failed: {}", err),
			Error::Config(s) => write!(f, "Invalid miner configuration: {}", s),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::TestBlockValidity(err) => Some(err),
			_ => None,
		}
	}
}
