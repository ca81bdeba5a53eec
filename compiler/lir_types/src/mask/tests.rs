use super::*;

#[test]
fn narrow_mask_fits_one_word() {
    let mask = WideMask::all_ones(8);
    assert_eq!(mask.words(), &[0xFF]);
    assert_eq!(mask.low_u64(), 0xFF);
    assert_eq!(mask.count_ones(), 8);
}

#[test]
fn word_aligned_mask() {
    let mask = WideMask::all_ones(128);
    assert_eq!(mask.words(), &[u64::MAX, u64::MAX]);
    assert_eq!(mask.count_ones(), 128);
}

#[test]
fn wide_mask_has_partial_high_word() {
    let mask = WideMask::all_ones(65);
    assert_eq!(mask.words(), &[u64::MAX, 1]);
    assert_eq!(mask.width(), 65);
    assert_eq!(mask.count_ones(), 65);
}

#[test]
fn display_is_hex_big_endian() {
    assert_eq!(WideMask::all_ones(16).to_string(), "0xffff");
    assert_eq!(
        WideMask::all_ones(68).to_string(),
        "0xfffffffffffffffff"
    );
}
