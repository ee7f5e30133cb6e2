//! The sector buffer: allocation, geometry, addressing and resize.

use std::ops::Range;

use log::debug;
use sectorbuf_bytes::AlignedRegion;
use sectorbuf_common::{Result, error::Error, verify_range};
use sectorbuf_random::Random32;

use crate::config::{BufferConfig, validate_geometry};

/// A block of memory organized as `sector_count` sectors of `bytes_per_sector` bytes.
///
/// The data region starts at a 4096-byte aligned address and is preceded by a
/// 4096-byte reserved prefix that callers may use for out-of-band metadata (see
/// [`reserved_prefix`](Self::reserved_prefix)). Everything else on `Buffer`
/// addresses bytes from the aligned data start onward.
///
/// Most operations take a sector range `(start_sector, sector_count)`, where a
/// `sector_count` of 0 selects every sector from `start_sector` to the end. Byte
/// ranges `(offset, length)` follow the same convention. Every operation validates
/// its arguments before touching the data.
///
/// Content written by a freshly constructed or resized buffer is all zeros.
#[derive(Clone)]
pub struct Buffer {
    name: String,
    region: AlignedRegion,
    bytes_per_sector: usize,
    sector_count: usize,
    /// Created lazily by the first random fill; re-seeded afterwards.
    pub(crate) random: Option<Random32>,
    parallel_min_sectors: usize,
}

impl Buffer {
    /// Creates a buffer of `sector_count` sectors, each `bytes_per_sector` bytes long,
    /// filled with zeros.
    ///
    /// Fails with an invalid-argument error if either value is zero.
    pub fn new(sector_count: usize, bytes_per_sector: usize) -> Result<Buffer> {
        Self::with_config(BufferConfig::new(sector_count, bytes_per_sector))
    }

    /// Creates a buffer of `sector_count` sectors of the default sector size.
    pub fn with_sector_count(sector_count: usize) -> Result<Buffer> {
        Self::new(sector_count, crate::config::DEFAULT_BYTES_PER_SECTOR)
    }

    /// Creates a buffer from a full [`BufferConfig`].
    pub fn with_config(config: BufferConfig) -> Result<Buffer> {
        let region = Self::allocate(config.sector_count, config.bytes_per_sector)?;
        let mut buffer = Buffer {
            name: config.name,
            region,
            bytes_per_sector: config.bytes_per_sector,
            sector_count: config.sector_count,
            random: None,
            parallel_min_sectors: config.parallel_min_sectors,
        };
        buffer.fill(0, 0, 0)?;
        Ok(buffer)
    }

    /// Changes the geometry of the buffer, keeping the sector size.
    ///
    /// See [`resize`](Self::resize).
    pub fn resize_sectors(&mut self, sector_count: usize) -> Result<&mut Self> {
        self.resize(sector_count, self.bytes_per_sector)
    }

    /// Changes the geometry of the buffer.
    ///
    /// The leading `min(old_total, new_total)` bytes are preserved; any new bytes are
    /// zero. The random source is released and the name is cleared. On error the
    /// buffer is left untouched.
    pub fn resize(&mut self, sector_count: usize, bytes_per_sector: usize) -> Result<&mut Self> {
        let region = Self::allocate(sector_count, bytes_per_sector)?;
        let preserved = self.total_bytes().min(region.len());

        let mut resized = Buffer {
            name: String::new(),
            region,
            bytes_per_sector,
            sector_count,
            random: None,
            parallel_min_sectors: self.parallel_min_sectors,
        };
        resized.fill(0, 0, 0)?;
        resized.region.as_mut_slice()[..preserved]
            .copy_from_slice(&self.region.as_slice()[..preserved]);

        debug!(
            "resized buffer from {}x{} to {}x{}, preserved {} bytes",
            self.sector_count, self.bytes_per_sector, sector_count, bytes_per_sector, preserved
        );
        *self = resized;
        Ok(self)
    }

    fn allocate(sector_count: usize, bytes_per_sector: usize) -> Result<AlignedRegion> {
        validate_geometry(sector_count, bytes_per_sector)?;
        let total_bytes = sector_count.checked_mul(bytes_per_sector).ok_or_else(|| {
            Error::out_of_range(format!(
                "sectorCount ({sector_count:#X}) times bytesPerSector ({bytes_per_sector:#X}) overflows"
            ))
        })?;
        let region = AlignedRegion::zeroed(total_bytes)?;
        debug!(
            "allocated {} bytes for a {}x{} buffer",
            region.allocated_len(),
            sector_count,
            bytes_per_sector
        );
        Ok(region)
    }
}

impl Buffer {
    /// Returns the number of bytes in each sector.
    #[inline]
    pub fn bytes_per_sector(&self) -> usize {
        self.bytes_per_sector
    }

    /// Returns the number of sectors.
    #[inline]
    pub fn sector_count(&self) -> usize {
        self.sector_count
    }

    /// Returns `sector_count * bytes_per_sector`.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.sector_count * self.bytes_per_sector
    }

    /// Returns the total bytes rounded up to the 4096-byte alignment.
    #[inline]
    pub fn data_buffer_size(&self) -> usize {
        self.region.capacity()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the sector count at which per-sector fills go parallel.
    pub fn parallel_min_sectors(&self) -> usize {
        self.parallel_min_sectors
    }

    pub fn set_parallel_min_sectors(&mut self, sectors: usize) {
        self.parallel_min_sectors = sectors;
    }

    /// Returns `true` if a random fill has created the buffer's random source.
    pub fn has_random_source(&self) -> bool {
        self.random.is_some()
    }

    /// Returns the addressable data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.region.as_slice()
    }

    /// Returns the addressable data, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.region.as_mut_slice()
    }

    /// Returns a raw pointer to the aligned data start, for low-level I/O calls.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.region.as_ptr()
    }

    /// Returns a raw pointer to the start of the backing allocation.
    #[inline]
    pub fn allocation_ptr(&self) -> *const u8 {
        self.region.allocation_ptr()
    }

    /// Returns the 4096-byte region immediately preceding the data start.
    pub fn reserved_prefix(&self) -> &[u8] {
        self.region.prefix()
    }

    pub fn reserved_prefix_mut(&mut self) -> &mut [u8] {
        self.region.prefix_mut()
    }

    /// Returns `true` if every byte of the buffer is zero.
    pub fn is_all_zeros(&self) -> bool {
        let data = self.as_slice();
        // data[0] == 0 and data[i] == data[i + 1] for every i.
        data[0] == 0 && data[..data.len() - 1] == data[1..]
    }
}

impl Buffer {
    /// Resolves a sector range to the number of sectors it covers.
    ///
    /// A `sector_count` of 0 selects all sectors from `start_sector` to the end.
    pub fn resolve_sector_count(&self, start_sector: usize, sector_count: usize) -> Result<usize> {
        verify_range!(
            start_sector < self.sector_count,
            "startSector ({start_sector:#X}) must be less than the sector count of the buffer ({:#X})",
            self.sector_count
        );
        let sector_count = if sector_count == 0 {
            self.sector_count - start_sector
        } else {
            sector_count
        };
        verify_range!(
            start_sector
                .checked_add(sector_count)
                .is_some_and(|end| end <= self.sector_count),
            "startSector ({start_sector:#X}) plus sectorCount ({sector_count:#X}) exceeds the sector count of the buffer ({:#X})",
            self.sector_count
        );
        Ok(sector_count)
    }

    /// Resolves a sector range to the byte range `[start_byte, end_byte)` it covers.
    pub fn sector_byte_range(
        &self,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<Range<usize>> {
        let sector_count = self.resolve_sector_count(start_sector, sector_count)?;
        let start = start_sector * self.bytes_per_sector;
        Ok(start..start + sector_count * self.bytes_per_sector)
    }

    /// Resolves a byte range, where a `length` of 0 selects everything from
    /// `starting_offset` to the end.
    pub fn byte_range(&self, starting_offset: usize, length: usize) -> Result<Range<usize>> {
        let total_bytes = self.total_bytes();
        verify_range!(
            starting_offset < total_bytes,
            "startingOffset ({starting_offset:#X}) must be less than the total number of bytes in the buffer ({total_bytes:#X})"
        );
        let length = if length == 0 {
            total_bytes - starting_offset
        } else {
            length
        };
        let end = starting_offset.checked_add(length);
        verify_range!(
            end.is_some_and(|end| end <= total_bytes),
            "startingOffset ({starting_offset:#X}) plus length ({length:#X}) exceeds the total number of bytes in the buffer ({total_bytes:#X})"
        );
        Ok(starting_offset..starting_offset + length)
    }

    /// Checks that `width` bytes starting at `index` are addressable.
    pub(crate) fn verify_index(&self, index: usize, width: usize) -> Result<()> {
        let total_bytes = self.total_bytes();
        let last = index.checked_add(width - 1);
        verify_range!(
            last.is_some_and(|last| last < total_bytes),
            "index ({:#X}) is greater than or equal to TotalBytes ({total_bytes:#X})",
            last.unwrap_or(usize::MAX)
        );
        Ok(())
    }

    /// Sector loops must be representable with a signed 64-bit counter.
    pub(crate) fn verify_counter_max(max_value: usize) -> Result<()> {
        verify_range!(
            i64::try_from(max_value).is_ok(),
            "cannot address {max_value:#X} sectors with a signed 64-bit counter"
        );
        Ok(())
    }
}

impl Default for Buffer {
    /// Equivalent to `Buffer::new(0x10000, 512)`.
    fn default() -> Self {
        Self::with_config(BufferConfig::default()).expect("default geometry must be valid")
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("sector_count", &self.sector_count)
            .field("bytes_per_sector", &self.bytes_per_sector)
            .field("region", &self.region)
            .field("random", &self.random)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buf = Buffer::new(100, 1024).unwrap();
        assert_eq!(buf.sector_count(), 100);
        assert_eq!(buf.bytes_per_sector(), 1024);
        assert_eq!(buf.total_bytes(), 102400);
        assert_eq!(buf.as_slice().len(), 102400);
        assert!(buf.is_all_zeros());
        assert!(!buf.has_random_source());
    }

    #[test]
    fn test_buffer_default() {
        let buf = Buffer::default();
        assert_eq!(buf.sector_count(), 0x10000);
        assert_eq!(buf.bytes_per_sector(), 512);
        assert_eq!(buf.total_bytes(), 0x2000000);
    }

    #[test]
    fn test_buffer_alignment_and_prefix() {
        let buf = Buffer::new(3, 500).unwrap();
        assert_eq!(buf.as_ptr() as usize % 4096, 0);
        assert_eq!(buf.data_buffer_size(), 4096);
        assert_eq!(buf.reserved_prefix().len(), 4096);
        assert_eq!(
            buf.reserved_prefix().as_ptr() as usize + 4096,
            buf.as_ptr() as usize
        );
        assert!(buf.allocation_ptr() as usize <= buf.reserved_prefix().as_ptr() as usize);
    }

    #[test]
    fn test_buffer_zero_geometry() {
        assert!(Buffer::new(0, 512).unwrap_err().is_invalid_arg());
        assert!(Buffer::new(1, 0).unwrap_err().is_invalid_arg());
        assert!(Buffer::new(usize::MAX, 512).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_sector_range_resolution() {
        let buf = Buffer::new(10, 512).unwrap();
        assert_eq!(buf.sector_byte_range(0, 0).unwrap(), 0..5120);
        assert_eq!(buf.sector_byte_range(2, 3).unwrap(), 1024..2560);
        assert_eq!(buf.sector_byte_range(9, 0).unwrap(), 4608..5120);
        assert_eq!(buf.resolve_sector_count(4, 0).unwrap(), 6);

        assert!(buf.sector_byte_range(10, 0).unwrap_err().is_out_of_range());
        assert!(buf.sector_byte_range(8, 3).unwrap_err().is_out_of_range());
        assert!(
            buf.sector_byte_range(1, usize::MAX)
                .unwrap_err()
                .is_out_of_range()
        );
    }

    #[test]
    fn test_byte_range_resolution() {
        let buf = Buffer::new(1, 512).unwrap();
        assert_eq!(buf.byte_range(0, 0).unwrap(), 0..512);
        assert_eq!(buf.byte_range(500, 0).unwrap(), 500..512);
        assert_eq!(buf.byte_range(10, 2).unwrap(), 10..12);

        let err = buf.byte_range(512, 0).unwrap_err();
        assert!(err.is_out_of_range());
        assert!(err.to_string().contains("0x200"));
        assert!(buf.byte_range(500, 13).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_verify_index() {
        let buf = Buffer::new(1, 16).unwrap();
        assert!(buf.verify_index(15, 1).is_ok());
        assert!(buf.verify_index(8, 8).is_ok());
        assert!(buf.verify_index(9, 8).unwrap_err().is_out_of_range());
        assert!(buf.verify_index(usize::MAX, 2).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_verify_counter_max() {
        assert!(Buffer::verify_counter_max(i64::MAX as usize).is_ok());
        assert!(
            Buffer::verify_counter_max(i64::MAX as usize + 1)
                .unwrap_err()
                .is_out_of_range()
        );
    }

    #[test]
    fn test_name() {
        let mut buf = Buffer::with_config(BufferConfig::new(1, 8).with_name("scratch")).unwrap();
        assert_eq!(buf.name(), "scratch");
        buf.set_name("data");
        assert_eq!(buf.name(), "data");
    }

    #[test]
    fn test_reserved_prefix_is_not_addressable() {
        let mut buf = Buffer::new(1, 8).unwrap();
        buf.reserved_prefix_mut().fill(0xEE);
        assert!(buf.is_all_zeros());
        assert!(buf.reserved_prefix().iter().all(|&b| b == 0xEE));
    }
}
