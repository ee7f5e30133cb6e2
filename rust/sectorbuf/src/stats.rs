use std::sync::OnceLock;

use sectorbuf_common::{Result, verify_arg, verify_range};

use crate::Buffer;

impl Buffer {
    /// Returns the two's-complement checksum of `byte_count` bytes starting at
    /// `start_byte`: storing the result next to the summed bytes makes their total
    /// sum zero (mod 256).
    pub fn checksum_byte(&self, start_byte: usize, byte_count: usize) -> Result<u8> {
        verify_arg!(byte_count, byte_count > 0, "byteCount must be greater than 0");
        let total_bytes = self.total_bytes();
        verify_range!(
            start_byte
                .checked_add(byte_count)
                .is_some_and(|end| end <= total_bytes),
            "startByte ({start_byte:#X}) plus byteCount ({byte_count:#X}) is greater than TotalBytes ({total_bytes:#X})"
        );
        let sum = self.as_slice()[start_byte..start_byte + byte_count]
            .iter()
            .fold(0u8, |sum, &b| sum.wrapping_add(b));
        Ok((!sum).wrapping_add(1))
    }

    /// Counts the bits equal to `value` (0 or 1) in `length` bytes starting at
    /// `starting_offset`. A `length` of 0 counts to the end of the buffer.
    pub fn bit_count(&self, starting_offset: usize, length: usize, value: u8) -> Result<u64> {
        verify_arg!(value, value <= 1, "bit value must be 0 or 1, got {value}");
        // Counting zeros is counting ones of the inverted byte.
        let invert = if value == 0 { 0xFF } else { 0x00 };
        let range = self.byte_range(starting_offset, length)?;
        let table = popcount_table();
        Ok(self.as_slice()[range]
            .iter()
            .map(|&b| u64::from(table[usize::from(b ^ invert)]))
            .sum())
    }

    /// Counts the one bits in the whole buffer.
    pub fn bit_count_all(&self) -> Result<u64> {
        self.bit_count(0, 0, 1)
    }
}

fn popcount_table() -> &'static [u8; 256] {
    static TABLE: OnceLock<[u8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u8; 256];
        for (i, count) in table.iter_mut().enumerate() {
            *count = (0..8).map(|bit| ((i >> bit) & 1) as u8).sum();
        }
        table
    })
}
