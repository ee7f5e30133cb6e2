use sectorbuf_common::{Result, error::Error};

use crate::align::{align_up, checked_align_up, is_ptr_aligned};

/// An owned byte region whose data start is aligned to a page boundary and preceded
/// by a reserved prefix.
///
/// The backing allocation is over-sized so that the data can start at a
/// [`AlignedRegion::ALIGNMENT`]-aligned address, with another
/// [`AlignedRegion::PREFIX_LEN`] bytes reserved right before it for out-of-band
/// metadata:
///
/// ```text
///   inner: [ padding | reserved prefix (4 KiB) | data (len) | tail padding ]
///                    ^                         ^
///                    prefix start              data start (4 KiB aligned)
/// ```
///
/// The data region is addressed through [`as_slice`](Self::as_slice) and
/// [`as_mut_slice`](Self::as_mut_slice). The prefix is only reachable through
/// [`prefix`](Self::prefix) and [`prefix_mut`](Self::prefix_mut).
pub struct AlignedRegion {
    /// The backing allocation, including alignment padding and the prefix.
    inner: Vec<u8>,
    /// Offset of the data start within `inner`.
    start: usize,
    /// Addressable data length.
    len: usize,
    /// Data length rounded up to the alignment.
    capacity: usize,
}

impl AlignedRegion {
    /// Required alignment of the data start, in bytes.
    pub const ALIGNMENT: usize = 4096;
    /// Size of the reserved region in front of the data start, in bytes.
    pub const PREFIX_LEN: usize = 4096;

    /// Allocates a new zero-initialized region with `len` addressable bytes.
    ///
    /// Fails with an out-of-range error if the allocation size cannot be represented
    /// or cannot be reserved. Fails with a runtime error if the aligned data start
    /// does not fit the allocation.
    pub fn zeroed(len: usize) -> Result<AlignedRegion> {
        let capacity = checked_align_up(len, Self::ALIGNMENT).ok_or_else(|| {
            Error::out_of_range(format!("region length {len:#X} is too large"))
        })?;
        let allocation = capacity
            .checked_add(Self::ALIGNMENT - 1 + Self::PREFIX_LEN)
            .ok_or_else(|| {
                Error::out_of_range(format!("region length {len:#X} is too large"))
            })?;

        let mut inner = Vec::new();
        inner.try_reserve_exact(allocation).map_err(|e| {
            Error::out_of_range(format!(
                "cannot allocate {allocation:#X} bytes for a region of {len:#X} bytes: {e}"
            ))
        })?;
        inner.resize(allocation, 0);

        let start = Self::data_start_offset(&inner);
        if start + capacity > inner.len() {
            return Err(Error::runtime("aligned region allocation error"));
        }
        let region = AlignedRegion {
            inner,
            start,
            len,
            capacity,
        };
        if !region.is_aligned_at(0, Self::ALIGNMENT) {
            return Err(Error::runtime("aligned region data start is misaligned"));
        }
        Ok(region)
    }

    /// Returns the number of addressable bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the region has no addressable bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the addressable length rounded up to [`Self::ALIGNMENT`].
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the total size of the backing allocation, including padding and prefix.
    #[inline]
    pub fn allocated_len(&self) -> usize {
        self.inner.len()
    }

    /// Returns a raw pointer to the data start.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.as_slice().as_ptr()
    }

    /// Returns a raw pointer to the start of the backing allocation.
    #[inline]
    pub fn allocation_ptr(&self) -> *const u8 {
        self.inner.as_ptr()
    }

    /// Returns the addressable data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[self.start..self.start + self.len]
    }

    /// Returns the addressable data, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let start = self.start;
        &mut self.inner[start..start + self.len]
    }

    /// Returns the reserved prefix immediately preceding the data start.
    #[inline]
    pub fn prefix(&self) -> &[u8] {
        &self.inner[self.start - Self::PREFIX_LEN..self.start]
    }

    /// Returns the reserved prefix, mutably.
    #[inline]
    pub fn prefix_mut(&mut self) -> &mut [u8] {
        let start = self.start;
        &mut self.inner[start - Self::PREFIX_LEN..start]
    }

    /// Computes the offset of the first aligned address that leaves room for the prefix.
    #[inline]
    fn data_start_offset(inner: &[u8]) -> usize {
        let p = inner.as_ptr() as usize;
        align_up(p, Self::ALIGNMENT) - p + Self::PREFIX_LEN
    }

    /// Checks if the data is aligned to the specified alignment at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if the offset is greater than the region's length.
    pub fn is_aligned_at(&self, offset: usize, alignment: usize) -> bool {
        assert!(offset <= self.len());
        is_ptr_aligned(self.as_ptr().wrapping_add(offset), alignment)
    }
}

impl Clone for AlignedRegion {
    /// Makes a fresh aligned allocation and copies the data region into it.
    /// The reserved prefix of the clone is zeroed.
    fn clone(&self) -> AlignedRegion {
        let inner = vec![0u8; self.inner.len()];
        let start = Self::data_start_offset(&inner);
        debug_assert!(start + self.capacity <= inner.len());
        let mut region = AlignedRegion {
            inner,
            start,
            len: self.len,
            capacity: self.capacity,
        };
        region.as_mut_slice().copy_from_slice(self.as_slice());
        region
    }
}

impl std::fmt::Debug for AlignedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedRegion")
            .field("len", &self.len)
            .field("cap", &self.capacity)
            .field("internal_offset", &self.start)
            .field("internal_len", &self.inner.len())
            .finish_non_exhaustive()
    }
}
