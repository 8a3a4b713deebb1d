//! Stream used for serialization of Bitcoin structures
use crate::compact_integer::CompactInteger;

/// Serialize transactions together with their witness data (BIP144).
pub const SERIALIZE_TRANSACTION_WITNESS: u32 = 0x4000_0000;

pub fn serialize<T>(t: &T) -> Vec<u8>
where
	T: Serializable,
{
	let mut stream = Stream::default();
	stream.append(t);
	stream.out()
}

pub fn serialize_with_flags<T>(t: &T, flags: u32) -> Vec<u8>
where
	T: Serializable,
{
	let mut stream = Stream::with_flags(flags);
	stream.append(t);
	stream.out()
}

pub fn serialized_size<T>(t: &T) -> usize
where
	T: Serializable,
{
	t.serialized_size()
}

pub fn serialized_size_with_flags<T>(t: &T, flags: u32) -> usize
where
	T: Serializable,
{
	t.serialized_size_with_flags(flags)
}

pub trait Serializable {
	/// Serialize the struct and appends it to the end of stream.
	fn serialize(&self, s: &mut Stream);

	/// Hint about the size of serialized struct.
	fn serialized_size(&self) -> usize
	where
		Self: Sized,
	{
		// fallback implementation
		serialize(self).len()
	}

	/// Hint about the size of serialized struct with given flags.
	fn serialized_size_with_flags(&self, flags: u32) -> usize
	where
		Self: Sized,
	{
		// fallback implementation
		serialize_with_flags(self, flags).len()
	}
}

/// Stream used for serialization of Bitcoin structures
#[derive(Default)]
pub struct Stream {
	buffer: Vec<u8>,
	flags: u32,
}

impl Stream {
	/// New stream
	pub fn new() -> Self {
		Stream::default()
	}

	/// Create stream with given flags,
	pub fn with_flags(flags: u32) -> Self {
		Stream {
			buffer: Vec::new(),
			flags,
		}
	}

	/// Are transactions written to this stream with witness data?
	pub fn include_transaction_witness(&self) -> bool {
		(self.flags & SERIALIZE_TRANSACTION_WITNESS) != 0
	}

	/// Serializes the struct and appends it to the end of stream.
	pub fn append<T>(&mut self, t: &T) -> &mut Self
	where
		T: Serializable,
	{
		t.serialize(self);
		self
	}

	/// Appends raw bytes to the end of the stream.
	pub fn append_slice(&mut self, bytes: &[u8]) -> &mut Self {
		self.buffer.extend_from_slice(bytes);
		self
	}

	/// Appends length-prefixed bytes, as used for scripts and witness items.
	pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
		self.append(&CompactInteger::from(bytes.len()));
		self.append_slice(bytes)
	}

	/// Appends a list of serializable structs to the end of the stream.
	pub fn append_list<T>(&mut self, t: &[T]) -> &mut Self
	where
		T: Serializable,
	{
		CompactInteger::from(t.len()).serialize(self);
		for i in t {
			i.serialize(self);
		}
		self
	}

	pub(crate) fn buffer_mut(&mut self) -> &mut Vec<u8> {
		&mut self.buffer
	}

	/// Full stream.
	pub fn out(self) -> Vec<u8> {
		self.buffer
	}
}
