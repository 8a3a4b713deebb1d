use crate::{Serializable, Stream};
use byteorder::{LittleEndian, WriteBytesExt};

macro_rules! impl_ser_for_int {
	($t: ty, $write: ident, $size: expr) => {
		impl Serializable for $t {
			#[inline]
			fn serialize(&self, stream: &mut Stream) {
				stream
					.buffer_mut()
					.$write::<LittleEndian>(*self)
					.expect("writing to Vec never fails; qed");
			}

			#[inline]
			fn serialized_size(&self) -> usize {
				$size
			}
		}
	};
}

impl_ser_for_int!(i32, write_i32, 4);
impl_ser_for_int!(i64, write_i64, 8);
impl_ser_for_int!(u16, write_u16, 2);
impl_ser_for_int!(u32, write_u32, 4);
impl_ser_for_int!(u64, write_u64, 8);

impl Serializable for u8 {
	#[inline]
	fn serialize(&self, stream: &mut Stream) {
		stream.buffer_mut().push(*self);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		1
	}
}

impl Serializable for bool {
	#[inline]
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&(*self as u8));
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		1
	}
}
