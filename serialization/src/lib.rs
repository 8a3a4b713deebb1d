extern crate byteorder;

mod compact_integer;
mod impls;
mod stream;

pub use compact_integer::CompactInteger;
pub use stream::{serialize, serialize_with_flags, serialized_size, serialized_size_with_flags, Serializable, Stream, SERIALIZE_TRANSACTION_WITNESS};
