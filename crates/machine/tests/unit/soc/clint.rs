//! Timer unit (CLINT) tests.
//!
//! Verifies the split 32-bit register file, the single-step carry of the
//! time counter, and the pending queries.

use rvmach_core::soc::devices::{BusTarget, Clint};

fn read_u32(clint: &mut Clint, offset: u32) -> u32 {
    let mut buf = [0u8; 4];
    clint.load(offset, &mut buf).unwrap();
    u32::from_le_bytes(buf)
}

fn write_u32(clint: &mut Clint, offset: u32, val: u32) {
    clint.store(offset, &val.to_le_bytes()).unwrap();
}

#[test]
fn mtime_starts_at_zero_and_mtimecmp_at_max() {
    let clint = Clint::new();
    assert_eq!(clint.mtime(), 0);
    assert_eq!(clint.mtimecmp(), u64::MAX);
}

#[test]
fn bump_increments_low_word_only() {
    let mut clint = Clint::new();
    clint.bump_mtime();
    clint.bump_mtime();
    assert_eq!(clint.mtime(), 2);
    assert_eq!(read_u32(&mut clint, 0xBFF8), 2);
    assert_eq!(read_u32(&mut clint, 0xBFFC), 0);
}

#[test]
fn low_word_overflow_carries_into_high_word_once() {
    let mut clint = Clint::new();
    write_u32(&mut clint, 0xBFF8, u32::MAX);
    write_u32(&mut clint, 0xBFFC, 7);

    clint.bump_mtime();

    assert_eq!(read_u32(&mut clint, 0xBFF8), 0);
    assert_eq!(read_u32(&mut clint, 0xBFFC), 8);
}

#[test]
fn msip_writes_keep_only_bit_zero() {
    let mut clint = Clint::new();
    write_u32(&mut clint, 0x0000, 0xFF);
    assert_eq!(read_u32(&mut clint, 0x0000), 1);
    assert!(clint.software_pending(0));

    write_u32(&mut clint, 0x0000, 0);
    assert!(!clint.software_pending(0));
}

#[test]
fn timer_pending_compares_full_64_bit_values() {
    let mut clint = Clint::new();
    assert!(!clint.timer_pending(0), "quiet until the comparator is set");

    // mtimecmp = 2.
    write_u32(&mut clint, 0x4000, 2);
    write_u32(&mut clint, 0x4004, 0);
    assert!(!clint.timer_pending(0));

    clint.bump_mtime();
    assert!(!clint.timer_pending(0));
    clint.bump_mtime();
    assert!(clint.timer_pending(0));
}

#[test]
fn high_words_participate_in_the_compare() {
    let mut clint = Clint::new();
    write_u32(&mut clint, 0x4000, 0);
    write_u32(&mut clint, 0x4004, 1); // mtimecmp = 1 << 32

    write_u32(&mut clint, 0xBFF8, u32::MAX); // mtime = 2^32 - 1
    assert!(!clint.timer_pending(0));

    clint.bump_mtime(); // mtime = 1 << 32
    assert!(clint.timer_pending(0));
}

#[test]
fn narrow_reads_extract_register_bytes() {
    let mut clint = Clint::new();
    write_u32(&mut clint, 0xBFF8, 0xAABB_CCDD);

    let mut byte = [0u8; 1];
    clint.load(0xBFF8, &mut byte).unwrap();
    assert_eq!(byte[0], 0xDD);
    clint.load(0xBFF8 + 1, &mut byte).unwrap();
    assert_eq!(byte[0], 0xCC);

    let mut half = [0u8; 2];
    clint.load(0xBFF8 + 2, &mut half).unwrap();
    assert_eq!(u16::from_le_bytes(half), 0xAABB);
}

#[test]
fn doubleword_access_spans_the_word_pair() {
    let mut clint = Clint::new();
    clint
        .store(0x4000, &0x0123_4567_89AB_CDEFu64.to_le_bytes())
        .unwrap();
    assert_eq!(clint.mtimecmp(), 0x0123_4567_89AB_CDEF);

    let mut buf = [0u8; 8];
    clint.load(0x4000, &mut buf).unwrap();
    assert_eq!(u64::from_le_bytes(buf), 0x0123_4567_89AB_CDEF);
}

#[test]
fn narrow_writes_are_ignored() {
    let mut clint = Clint::new();
    clint.store(0x0000, &[1]).unwrap();
    assert_eq!(read_u32(&mut clint, 0x0000), 0);
}

#[test]
fn unrecognized_offsets_read_zero() {
    let mut clint = Clint::new();
    assert_eq!(read_u32(&mut clint, 0x8000), 0);
}
