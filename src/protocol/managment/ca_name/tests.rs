//! NAME packing and arbitration order.
use super::*;

fn sample() -> CaName {
    CaName::builder()
        .identity_number(0x1_2345)
        .manufacturer_code(0x2B1)
        .function_instance(5)
        .function(130)
        .vehicle_system(0x33)
        .vehicle_system_instance(0x0C)
        .industry_group(1)
        .arbitrary_address_capable(true)
        .build()
}

#[test]
fn test_all_fields() {
    let name = sample();
    assert_eq!(name.identity_number(), 0x1_2345);
    assert_eq!(name.manufacturer_code(), 0x2B1);
    assert_eq!(name.function_instance(), 5);
    assert_eq!(name.function(), 130);
    assert_eq!(name.vehicle_system(), 0x33);
    assert_eq!(name.vehicle_system_instance(), 0x0C);
    assert_eq!(name.industry_group(), 1);
    assert!(name.is_arbitrary_address_capable());
}

#[test]
/// Oversized values are masked to their field width and do not bleed.
fn test_builder_masks_values() {
    let name = CaName::builder()
        .identity_number(u32::MAX)
        .manufacturer_code(0)
        .build();
    assert_eq!(name.identity_number(), 0xF_FFFF);
    assert_eq!(name.manufacturer_code(), 0);
    assert!(!name.is_arbitrary_address_capable());
}

#[test]
/// 20-bit serial, 12-bit manufacturer code, 3-bit function instance.
fn test_field_positions() {
    let name = CaName::builder().manufacturer_code(0xFFF).build();
    assert_eq!(name.manufacturer_code(), 0xFFF);
    assert_eq!(name.raw(), 0x0000_0000_FFF0_0000);
    assert_eq!(name.identity_number(), 0);

    let name = CaName::builder().identity_number(0xF_FFFF).build();
    assert_eq!(name.raw(), 0x0000_0000_000F_FFFF);
    assert_eq!(name.manufacturer_code(), 0);

    let name = CaName::builder().function_instance(0xFF).build();
    assert_eq!(name.function_instance(), 0x07);
    assert_eq!(name.raw(), 0x0000_0007_0000_0000);
    assert_eq!(name.function(), 0);
}

#[test]
fn test_bit_63_is_aac() {
    let name = CaName::builder().arbitrary_address_capable(true).build();
    assert_eq!(name.raw(), 1u64 << 63);
    assert_eq!(name.to_bytes()[7], 0x80);
}

#[test]
fn test_payload_parsing() {
    let name = sample();
    assert_eq!(CaName::from_payload(&name.to_bytes()), Some(name));
    assert_eq!(CaName::from_payload(&[0; 7]), None);
}

#[test]
/// Byte 7 outranks every lower byte.
fn test_compare_starts_at_byte_7() {
    let a = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x10];
    let b = [0, 0, 0, 0, 0, 0, 0, 0x11];
    assert_eq!(compare_names(&a, &b), Ordering::Less);
    assert_eq!(compare_names(&b, &a), Ordering::Greater);
}

#[test]
fn test_compare_antisymmetric_and_reflexive() {
    let names = [
        [0u8; 8],
        [1, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 1],
        sample().to_bytes(),
        [0xFF; 8],
        [0x42, 0x20, 0x04, 0x56, 0x00, 0x82, 0x00, 0xA0],
    ];
    for a in &names {
        assert_eq!(compare_names(a, a), Ordering::Equal);
        for b in &names {
            assert_eq!(compare_names(a, b), compare_names(b, a).reverse());
        }
    }
}

#[test]
/// Byte-wise arbitration agrees with the numeric order of the raw NAME.
fn test_compare_matches_numeric_order() {
    let a = CaName::from_raw(0x0000_0001_0000_0000);
    let b = CaName::from_raw(0x0000_0000_FFFF_FFFF);
    assert_eq!(a.compare(&b), Ordering::Greater);
    assert_eq!(a.compare(&b), a.raw().cmp(&b.raw()));
}
