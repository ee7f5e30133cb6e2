use sectorbuf_random::SeededRandomSource;

use crate::{Buffer, BufferConfig};

#[test]
fn test_total_bytes_matches_geometry() {
    for (sectors, bytes_per_sector) in [(1, 1), (1, 512), (7, 520), (64, 4096), (3, 4097)] {
        let buf = Buffer::new(sectors, bytes_per_sector).unwrap();
        assert_eq!(buf.total_bytes(), sectors * bytes_per_sector);
        assert_eq!(buf.as_slice().len(), buf.total_bytes());
        assert!(buf.data_buffer_size() >= buf.total_bytes());
        assert_eq!(buf.data_buffer_size() % 4096, 0);
        assert_eq!(buf.as_ptr() as usize % 4096, 0);
    }
}

#[test]
fn test_with_sector_count_uses_default_sector_size() {
    let buf = Buffer::with_sector_count(8).unwrap();
    assert_eq!(buf.bytes_per_sector(), 512);
    assert_eq!(buf.total_bytes(), 4096);
}

#[test]
fn test_invalid_construction() {
    assert!(Buffer::new(0, 512).unwrap_err().is_invalid_arg());
    assert!(Buffer::new(8, 0).unwrap_err().is_invalid_arg());
    assert!(
        Buffer::with_config(BufferConfig::new(0, 0))
            .unwrap_err()
            .is_invalid_arg()
    );
}

#[test]
fn test_construction_beyond_allocatable_size() {
    // 2^54 sectors of 512 bytes is 2^63 bytes: the product fits, the allocation cannot.
    let err = Buffer::new(1usize << 54, 512).unwrap_err();
    assert!(err.is_out_of_range());

    let mut buf = Buffer::new(2, 512).unwrap();
    buf.fill_ones_all().unwrap();
    assert!(buf.resize_sectors(1usize << 54).unwrap_err().is_out_of_range());
    assert_eq!(buf.total_bytes(), 1024);
    assert_eq!(buf.bit_count_all().unwrap(), 1024 * 8);
}

#[test]
fn test_zero_detection() {
    let mut buf = Buffer::new(4, 512).unwrap();
    assert!(buf.is_all_zeros());

    let k = fastrand::usize(..buf.total_bytes());
    buf.set_u8(k, 1).unwrap();
    assert!(!buf.is_all_zeros());

    buf.fill_zeros_all().unwrap();
    assert!(buf.is_all_zeros());

    buf.set_u8(buf.total_bytes() - 1, 0x80).unwrap();
    assert!(!buf.is_all_zeros());
}

#[test]
fn test_clone_is_deep() {
    let mut buf = Buffer::with_config(BufferConfig::new(2, 64).with_name("orig")).unwrap();
    buf.fill_random_seeded_all(11).unwrap();

    let mut copy = buf.clone();
    assert_eq!(copy.name(), "orig");
    assert!(copy.compare_all(&buf).unwrap().are_equal());
    assert_ne!(copy.as_ptr(), buf.as_ptr());

    copy.set_u8(0, !buf.get_u8(0).unwrap()).unwrap();
    assert!(!copy.compare_all(&buf).unwrap().are_equal());
}

#[test]
fn test_clone_carries_random_state() {
    let mut buf = Buffer::new(1, 64).unwrap();
    buf.fill_random_seeded_all(5).unwrap();

    let mut copy = buf.clone();
    assert!(copy.has_random_source());

    // Continuing from the same generator state yields the same words.
    let mut a = buf.random.take().unwrap();
    let mut b = copy.random.take().unwrap();
    assert_eq!(a.next32(), b.next32());
    assert_eq!(a.next32(), b.next32());
}

#[test]
fn test_out_of_range_reads_do_not_mutate() {
    let mut buf = Buffer::new(2, 512).unwrap();
    buf.fill_incrementing_all(0).unwrap();
    let before = buf.clone();

    assert!(buf.get_u8(buf.total_bytes()).unwrap_err().is_out_of_range());
    assert!(buf.set_u8(buf.total_bytes(), 1).unwrap_err().is_out_of_range());
    assert!(buf.set_u32(buf.total_bytes() - 3, 1).unwrap_err().is_out_of_range());
    assert!(buf.get_u8_bit(0, 8).unwrap_err().is_invalid_arg());
    assert!(buf.fill(1, 2, 0).unwrap_err().is_out_of_range());
    assert!(buf.fill(1, 1, 2).unwrap_err().is_out_of_range());

    assert!(buf.compare_all(&before).unwrap().are_equal());
}

#[test]
fn test_error_messages_use_hex_offsets() {
    let buf = Buffer::new(1, 500).unwrap();
    let message = buf.get_u8(500).unwrap_err().to_string();
    assert!(message.contains("0x1F4"), "{message}");
}
