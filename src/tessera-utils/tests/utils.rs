use tessera_utils::{align::*, bits::sign_extend};

#[test]
fn align_to_words() {
    assert_eq!(align_up(0, 8), 0);
    assert_eq!(align_up(1, 8), 8);
    assert_eq!(align_up(1300, 8), 1304);
    assert_eq!(align_up(1304, 8), 1304);

    assert_eq!(align_down(1303, 8), 1296);
    assert_eq!(align_down(7, 8), 0);
}

#[test]
fn bits_round_up_to_bytes() {
    assert_eq!(bits_to_bytes(0), 0);
    assert_eq!(bits_to_bytes(1), 1);
    assert_eq!(bits_to_bytes(8), 1);
    assert_eq!(bits_to_bytes(15), 2);
    assert_eq!(bits_to_bytes(65), 9);
}

#[test]
fn sign_extension() {
    assert_eq!(sign_extend(0b111, 3), -1);
    assert_eq!(sign_extend(0b011, 3), 3);
    assert_eq!(sign_extend(0b100, 3), -4);
    assert_eq!(sign_extend(0x80, 8), -128);
    assert_eq!(sign_extend(u64::MAX, 64), -1);
}
