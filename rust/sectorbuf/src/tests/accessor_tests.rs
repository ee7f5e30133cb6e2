use crate::Buffer;

#[test]
fn test_typed_values_read_back() {
    let mut buf = Buffer::new(4, 512).unwrap();
    let total = buf.total_bytes();

    for _ in 0..200 {
        let v8 = fastrand::u8(..);
        let i = fastrand::usize(..total);
        buf.set_u8(i, v8).unwrap();
        assert_eq!(buf.get_u8(i).unwrap(), v8);

        let v16 = fastrand::u16(..);
        let i = fastrand::usize(..total - 1);
        buf.set_u16(i, v16).unwrap();
        assert_eq!(buf.get_u16(i).unwrap(), v16);
        buf.set_u16_be(i, v16).unwrap();
        assert_eq!(buf.get_u16_be(i).unwrap(), v16);

        let v32 = fastrand::u32(..);
        let i = fastrand::usize(..total - 3);
        buf.set_u32(i, v32).unwrap();
        assert_eq!(buf.get_u32(i).unwrap(), v32);
        buf.set_u32_be(i, v32).unwrap();
        assert_eq!(buf.get_u32_be(i).unwrap(), v32);

        let v64 = fastrand::u64(..);
        let i = fastrand::usize(..total - 7);
        buf.set_u64(i, v64).unwrap();
        assert_eq!(buf.get_u64(i).unwrap(), v64);
        buf.set_u64_be(i, v64).unwrap();
        assert_eq!(buf.get_u64_be(i).unwrap(), v64);
    }
}

#[test]
fn test_byte_order_is_mirrored() {
    let mut buf = Buffer::new(1, 32).unwrap();
    buf.set_u64(0, 0x1122334455667788).unwrap();
    assert_eq!(buf.get_u64_be(0).unwrap(), 0x8877665544332211);
    assert_eq!(buf.get_u32_be(0).unwrap(), 0x88776655);
    assert_eq!(buf.get_u16(6).unwrap(), 0x1122);
}

#[test]
fn test_last_position_of_each_width() {
    let mut buf = Buffer::new(1, 64).unwrap();
    assert!(buf.set_u8(63, 1).is_ok());
    assert!(buf.set_u16(62, 1).is_ok());
    assert!(buf.set_u32(60, 1).is_ok());
    assert!(buf.set_u64(56, 1).is_ok());

    assert!(buf.get_u16_be(63).unwrap_err().is_out_of_range());
    assert!(buf.get_u32(61).unwrap_err().is_out_of_range());
    assert!(buf.get_u64_be(57).unwrap_err().is_out_of_range());
}

#[test]
fn test_bit_access_per_width() {
    let mut buf = Buffer::new(1, 16).unwrap();
    buf.set_u32(0, 1 << 31).unwrap();
    assert_eq!(buf.get_u32_bit(0, 31).unwrap(), 1);
    assert_eq!(buf.get_u32_bit(0, 30).unwrap(), 0);
    assert_eq!(buf.get_u32_bit_be(0, 7).unwrap(), 1);

    buf.set_u64_be(8, 1).unwrap();
    assert_eq!(buf.get_u64_bit_be(8, 0).unwrap(), 1);
    assert_eq!(buf.get_u64_bit(8, 56).unwrap(), 1);
    assert!(buf.get_u64_bit(8, 64).unwrap_err().is_invalid_arg());
    assert!(buf.get_u16_bit_be(0, 16).unwrap_err().is_invalid_arg());
}

#[test]
fn test_strings_round_trip_latin1() {
    let mut buf = Buffer::new(1, 32).unwrap();
    buf.set_string(0, "\u{E9}").unwrap();
    assert_eq!(buf.get_u8(0).unwrap(), 0xE9);
    assert_eq!(buf.get_string(0, 1).unwrap(), "\u{E9}");

    let text = "Gr\u{FC}\u{DF}e \u{B1}\u{FF}";
    let len = text.chars().count();
    buf.set_string(4, text).unwrap();
    assert_eq!(buf.get_string(4, len).unwrap(), text);
    assert_eq!(buf.get_bytes(4, 3).unwrap(), vec![b'G', b'r', 0xFC]);

    // Every byte value survives a read followed by a write.
    buf.fill_incrementing_all(0xE0).unwrap();
    let all = buf.get_string(0, 0).unwrap();
    let before = buf.get_bytes(0, 0).unwrap();
    buf.fill_zeros_all().unwrap();
    buf.set_string(0, &all).unwrap();
    assert_eq!(buf.get_bytes(0, 0).unwrap(), before);
}

#[test]
fn test_set_string_rejects_chars_beyond_latin1() {
    let mut buf = Buffer::new(1, 16).unwrap();
    let err = buf.set_string(0, "ab\u{20AC}").unwrap_err();
    assert!(err.is_invalid_arg());
    assert!(buf.is_all_zeros());
    assert!(buf.set_string(0, "\u{100}").unwrap_err().is_invalid_arg());
}
