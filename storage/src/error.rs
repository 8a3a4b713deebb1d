use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
	/// Block parent is not known to the chain state.
	UnknownParent,
	/// Block failed validation.
	InvalidBlock(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::UnknownParent => write!(f, "Block parent is unknown"),
			Error::InvalidBlock(s) => write!(f, "Invalid block: {}", s),
		}
	}
}

impl std::error::Error for Error {}
