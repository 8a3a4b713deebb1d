/// Height-activated soft fork.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deployment {
	/// Deployment's name
	pub name: &'static str,
	/// Activated deployment height, `None` if never active on this network.
	pub activation: Option<u32>,
}

impl Deployment {
	pub fn is_active(&self, height: u32) -> bool {
		self.activation.map_or(false, |activation| height >= activation)
	}
}
