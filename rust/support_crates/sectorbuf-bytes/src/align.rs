/// Rounds `n` up to the next multiple of `alignment`.
///
/// # Arguments
///
/// * `n` - The value to round. Values already on a boundary are returned unchanged.
/// * `alignment` - The boundary; a non-zero power of two.
///
/// # Returns
///
/// The smallest multiple of `alignment` that is not less than `n`. Overflow is not
/// checked in release builds; use [`checked_align_up`] when `n` may come close to
/// `usize::MAX`.
///
/// # Panics
///
/// In debug builds, panics if `alignment` is zero or not a power of two.
///
/// # Examples
///
/// ```
/// use sectorbuf_bytes::align::align_up;
///
/// assert_eq!(align_up(0, 4096), 0);
/// assert_eq!(align_up(1, 4096), 4096);
/// assert_eq!(align_up(4096, 4096), 4096);
/// assert_eq!(align_up(4097, 4096), 8192);
/// ```
#[inline]
pub fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    (n + alignment - 1) & !(alignment - 1)
}

/// Rounds `n` up to the next multiple of `alignment` without overflowing.
///
/// # Arguments
///
/// * `n` - The value to round.
/// * `alignment` - The boundary; a non-zero power of two.
///
/// # Returns
///
/// `Some` with the rounded value, or `None` if it does not fit in `usize`.
///
/// # Panics
///
/// In debug builds, panics if `alignment` is zero or not a power of two.
///
/// ```
/// use sectorbuf_bytes::align::checked_align_up;
///
/// assert_eq!(checked_align_up(5, 8), Some(8));
/// assert_eq!(checked_align_up(usize::MAX, 8), None);
/// ```
#[inline]
pub fn checked_align_up(n: usize, alignment: usize) -> Option<usize> {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    n.checked_add(alignment - 1).map(|n| n & !(alignment - 1))
}

/// Checks whether `n` lies on an `alignment` boundary.
///
/// # Arguments
///
/// * `n` - The value to test.
/// * `alignment` - The boundary; a non-zero power of two.
///
/// # Returns
///
/// `true` if `n` is a multiple of `alignment`.
///
/// # Panics
///
/// In debug builds, panics if `alignment` is zero or not a power of two.
///
/// ```
/// use sectorbuf_bytes::align::is_aligned;
///
/// assert!(is_aligned(0, 4096));
/// assert!(!is_aligned(512, 4096));
/// assert!(is_aligned(8192, 4096));
/// ```
#[inline]
pub fn is_aligned(n: usize, alignment: usize) -> bool {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    (n & (alignment - 1)) == 0
}

/// Checks whether the address of `ptr` is a multiple of `alignment`.
///
/// Only the address is inspected; `ptr` is never dereferenced. Panics under the same
/// conditions as [`is_aligned`].
#[inline]
pub fn is_ptr_aligned(ptr: *const u8, alignment: usize) -> bool {
    is_aligned(ptr as usize, alignment)
}
