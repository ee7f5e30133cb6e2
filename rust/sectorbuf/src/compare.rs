use std::fmt;

use sectorbuf_common::{Result, error::Error};

use crate::Buffer;

/// Outcome of [`Buffer::compare_to`].
///
/// When the compared ranges differ, the result carries the first differing offset
/// (relative to the start of the calling buffer's data), the byte found there in
/// the calling buffer (`expected`) and in the other buffer (`actual`), and the
/// number of differing positions over the whole compared range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareResult {
    are_equal: bool,
    first_difference_offset: usize,
    expected_value: u8,
    actual_value: u8,
    difference_count: usize,
}

impl CompareResult {
    pub fn equal() -> CompareResult {
        CompareResult {
            are_equal: true,
            first_difference_offset: 0,
            expected_value: 0,
            actual_value: 0,
            difference_count: 0,
        }
    }

    /// A result describing a single difference.
    pub fn difference(offset: usize, expected_value: u8, actual_value: u8) -> CompareResult {
        CompareResult {
            are_equal: false,
            first_difference_offset: offset,
            expected_value,
            actual_value,
            difference_count: 1,
        }
    }

    pub(crate) fn add_difference(&mut self) {
        self.difference_count += 1;
    }

    pub fn are_equal(&self) -> bool {
        self.are_equal
    }

    /// Offset of the first difference. Meaningless when the buffers are equal.
    pub fn first_difference_offset(&self) -> usize {
        self.first_difference_offset
    }

    pub fn expected_value(&self) -> u8 {
        self.expected_value
    }

    pub fn actual_value(&self) -> u8 {
        self.actual_value
    }

    pub fn difference_count(&self) -> usize {
        self.difference_count
    }
}

impl fmt::Display for CompareResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.are_equal {
            return f.write_str("Buffers are equal");
        }
        write!(
            f,
            "Buffers are not equal. First difference at offset {}: expected 0x{:02X}, actual 0x{:02X}. Total differences: {}",
            self.first_difference_offset,
            self.expected_value,
            self.actual_value,
            self.difference_count
        )
    }
}

impl Buffer {
    /// Compares the sectors of this buffer starting at `start_sector` against the
    /// sectors of `other` starting at `other_start_sector`.
    ///
    /// A `sector_count` of 0 compares up to the end of the shorter of the two ranges.
    /// An explicit `sector_count` must select the same number of bytes in both
    /// buffers; otherwise a runtime error is returned.
    pub fn compare_to(
        &self,
        other: &Buffer,
        start_sector: usize,
        other_start_sector: usize,
        sector_count: usize,
    ) -> Result<CompareResult> {
        let this_range = self.sector_byte_range(start_sector, sector_count)?;
        let other_range = other.sector_byte_range(other_start_sector, sector_count)?;

        let len = if sector_count == 0 {
            this_range.len().min(other_range.len())
        } else if this_range.len() != other_range.len() {
            return Err(Error::runtime(format!(
                "compared ranges differ in length: {:#X} and {:#X} bytes",
                this_range.len(),
                other_range.len()
            )));
        } else {
            this_range.len()
        };

        let expected = &self.as_slice()[this_range.start..this_range.start + len];
        let actual = &other.as_slice()[other_range.start..other_range.start + len];

        let mut result: Option<CompareResult> = None;
        for (i, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            if e != a {
                match result.as_mut() {
                    Some(found) => found.add_difference(),
                    None => {
                        result = Some(CompareResult::difference(this_range.start + i, e, a));
                    }
                }
            }
        }
        Ok(result.unwrap_or_else(CompareResult::equal))
    }

    /// Compares the whole of this buffer against `other`.
    pub fn compare_all(&self, other: &Buffer) -> Result<CompareResult> {
        self.compare_to(other, 0, 0, 0)
    }
}
