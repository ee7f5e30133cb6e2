//! Typed reads and writes at byte offsets.
//!
//! Multi-byte values come in a little-endian flavour (`get_u32`) and a big-endian
//! flavour (`get_u32_be`). Every access checks that the full width fits before the
//! data is touched.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use sectorbuf_common::{Result, verify_arg};

use crate::Buffer;

macro_rules! typed_accessors {
    (
        $ty:ty, $order:ty,
        $get:ident, $set:ident, $get_bit:ident,
        $read:ident, $write:ident
    ) => {
        #[doc = concat!("Reads a `", stringify!($ty), "` at `index` (", stringify!($order), ").")]
        pub fn $get(&self, index: usize) -> Result<$ty> {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            self.verify_index(index, WIDTH)?;
            Ok(<$order>::$read(&self.as_slice()[index..index + WIDTH]))
        }

        #[doc = concat!("Writes a `", stringify!($ty), "` at `index` (", stringify!($order), ").")]
        pub fn $set(&mut self, index: usize, value: $ty) -> Result<&mut Self> {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            self.verify_index(index, WIDTH)?;
            <$order>::$write(&mut self.as_mut_slice()[index..index + WIDTH], value);
            Ok(self)
        }

        #[doc = concat!("Returns bit `bit` (0 = least significant) of the `", stringify!($ty), "` at `index`.")]
        pub fn $get_bit(&self, index: usize, bit: u32) -> Result<u8> {
            verify_bit(bit, <$ty>::BITS)?;
            Ok(((self.$get(index)? >> bit) & 1) as u8)
        }
    };
}

impl Buffer {
    /// Reads the byte at `index`.
    pub fn get_u8(&self, index: usize) -> Result<u8> {
        self.verify_index(index, 1)?;
        Ok(self.as_slice()[index])
    }

    /// Writes the byte at `index`.
    pub fn set_u8(&mut self, index: usize, value: u8) -> Result<&mut Self> {
        self.verify_index(index, 1)?;
        self.as_mut_slice()[index] = value;
        Ok(self)
    }

    /// Returns bit `bit` (0 = least significant) of the byte at `index`.
    pub fn get_u8_bit(&self, index: usize, bit: u32) -> Result<u8> {
        verify_bit(bit, u8::BITS)?;
        Ok((self.get_u8(index)? >> bit) & 1)
    }

    typed_accessors!(u16, LittleEndian, get_u16, set_u16, get_u16_bit, read_u16, write_u16);
    typed_accessors!(u32, LittleEndian, get_u32, set_u32, get_u32_bit, read_u32, write_u32);
    typed_accessors!(u64, LittleEndian, get_u64, set_u64, get_u64_bit, read_u64, write_u64);

    typed_accessors!(u16, BigEndian, get_u16_be, set_u16_be, get_u16_bit_be, read_u16, write_u16);
    typed_accessors!(u32, BigEndian, get_u32_be, set_u32_be, get_u32_bit_be, read_u32, write_u32);
    typed_accessors!(u64, BigEndian, get_u64_be, set_u64_be, get_u64_bit_be, read_u64, write_u64);

    /// Returns a copy of `length` bytes starting at `starting_offset`; a `length` of 0
    /// reads to the end of the buffer.
    pub fn get_bytes(&self, starting_offset: usize, length: usize) -> Result<Vec<u8>> {
        let range = self.byte_range(starting_offset, length)?;
        Ok(self.as_slice()[range].to_vec())
    }

    /// Copies `bytes` into the buffer at `starting_offset`.
    pub fn set_bytes(&mut self, starting_offset: usize, bytes: &[u8]) -> Result<&mut Self> {
        if bytes.is_empty() {
            return Ok(self);
        }
        let range = self.byte_range(starting_offset, bytes.len())?;
        self.as_mut_slice()[range].copy_from_slice(bytes);
        Ok(self)
    }

    /// Reads `length` bytes as a string, one `char` per byte (Latin-1). A `length` of
    /// 0 reads to the end of the buffer.
    pub fn get_string(&self, starting_offset: usize, length: usize) -> Result<String> {
        let range = self.byte_range(starting_offset, length)?;
        Ok(self.as_slice()[range].iter().map(|&b| char::from(b)).collect())
    }

    /// Writes `value` at `starting_offset`, one byte per `char` (Latin-1).
    ///
    /// Fails with an invalid-argument error if `value` contains a `char` above
    /// U+00FF; nothing is written in that case.
    pub fn set_string(&mut self, starting_offset: usize, value: &str) -> Result<&mut Self> {
        let bytes = value
            .chars()
            .map(|c| u8::try_from(c).ok())
            .collect::<Option<Vec<u8>>>();
        verify_arg!(
            value,
            bytes.is_some(),
            "string contains characters outside Latin-1"
        );
        self.set_bytes(starting_offset, &bytes.unwrap_or_default())
    }
}

fn verify_bit(bit: u32, bits: u32) -> Result<()> {
    verify_arg!(bit, bit < bits, "bit ({bit}) must be less than {bits}");
    Ok(())
}
