//! Fixed-width prefix arithmetic
//!
//! Pure functions over network-order address bytes. The storage layer uses
//! the end-of-range helpers to turn "prefix overlaps block" into a plain
//! `start <= x <= end` comparison; resolvers use [`is_prefix_in_range`] to
//! confirm the candidates such comparisons return.

/// Set every bit from `from_bit` to the end of `bytes`.
///
/// The byte holding `from_bit` receives the partial mask `0xFF >> (from_bit % 8)`
/// when the bit is not byte aligned; every following byte becomes `0xFF`.
#[inline]
fn set_host_bits(bytes: &mut [u8], from_bit: u8) {
    let first = from_bit as usize / 8;
    let rem = from_bit % 8;

    for (i, byte) in bytes.iter_mut().enumerate().skip(first) {
        if i == first && rem != 0 {
            *byte |= 0xFF >> rem;
        } else {
            *byte = 0xFF;
        }
    }
}

/// Highest address of the block `start/max_length`.
///
/// `start` is expected to be aligned to its own prefix length already. When
/// `max_length` equals the address width there is nothing to set and `start`
/// is returned unchanged.
pub fn end_of_range(start: &[u8], max_length: u8) -> Vec<u8> {
    let mut end = start.to_vec();
    set_host_bits(&mut end, max_length);
    end
}

/// Widen `current_end` so it reaches the end of the whole `start/prefix_length` block.
///
/// SLURM filters without an explicit max length suppress everything more
/// specific than their prefix, so the mask starts at `prefix_length` rather
/// than at a max length as in [`end_of_range`]. A `current_end` of a
/// different width than `start` is ignored and the block end of `start` is
/// returned.
pub fn end_of_filter_range(start: &[u8], prefix_length: u8, current_end: &[u8]) -> Vec<u8> {
    let mut end = if current_end.len() == start.len() {
        current_end.to_vec()
    } else {
        start.to_vec()
    };
    set_host_bits(&mut end, prefix_length);
    end
}

/// Whether every bit past `length` is zero.
pub fn is_aligned(start: &[u8], length: u8) -> bool {
    let bits = length as usize;
    start.iter().enumerate().all(|(i, b)| {
        let host = match bits.saturating_sub(i * 8) {
            0 => 0xFF,
            n if n >= 8 => 0u8,
            n => 0xFF >> n,
        };
        b & host == 0
    })
}

/// Whether `son` lies inside the block `father/father_length`.
///
/// Compares the first `father_length` bits of both sequences. Sequences of
/// different widths (IPv4 against IPv6) are never in range of one another.
pub fn is_prefix_in_range(son: &[u8], father: &[u8], father_length: u8) -> bool {
    if son.len() != father.len() {
        return false;
    }

    let bits = father_length as usize;
    son.iter().zip(father).enumerate().all(|(i, (s, f))| {
        let mask = match bits.saturating_sub(i * 8) {
            0 => 0u8,
            b if b >= 8 => 0xFF,
            b => 0xFF << (8 - b),
        };
        s & mask == f & mask
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_aligned() {
        assert!(is_aligned(&[10, 0, 0, 0], 24));
        assert!(is_aligned(&[10, 0, 0, 128], 25));
        assert!(is_aligned(&[10, 0, 0, 5], 32));
        assert!(is_aligned(&[0, 0, 0, 0], 0));
        assert!(!is_aligned(&[10, 0, 0, 5], 24));
        assert!(!is_aligned(&[10, 0, 0, 64], 25));
        assert!(!is_aligned(&[10, 0, 0, 0], 0));
    }

    #[test]
    fn test_end_of_range_byte_aligned() {
        assert_eq!(end_of_range(&[10, 0, 0, 0], 24), vec![10, 0, 0, 255]);
        assert_eq!(end_of_range(&[10, 0, 0, 0], 16), vec![10, 0, 255, 255]);
        assert_eq!(end_of_range(&[10, 0, 0, 0], 0), vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_end_of_range_partial_byte() {
        // 10.0.0.0/25 -> 10.0.0.127
        assert_eq!(end_of_range(&[10, 0, 0, 0], 25), vec![10, 0, 0, 127]);
        // 192.168.0.0/20 -> 192.168.15.255
        assert_eq!(end_of_range(&[192, 168, 0, 0], 20), vec![192, 168, 15, 255]);
    }

    #[test]
    fn test_end_of_range_full_width_is_identity() {
        let host = [192, 0, 2, 1];
        assert_eq!(end_of_range(&host, 32), host.to_vec());

        let mut v6 = [0u8; 16];
        v6[0] = 0x20;
        v6[1] = 0x01;
        v6[15] = 0x01;
        assert_eq!(end_of_range(&v6, 128), v6.to_vec());
    }

    #[test]
    fn test_end_of_range_ipv6() {
        let mut start = [0u8; 16];
        start[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
        let end = end_of_range(&start, 32);
        assert_eq!(&end[..4], &[0x20, 0x01, 0x0d, 0xb8]);
        assert!(end[4..].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_filter_range_masks_from_prefix_length() {
        // Filter 10.0.0.0/16 carrying a max length of 24: the ROA-style end
        // stops at 10.0.0.255, the filter end covers the whole /16.
        let start = [10, 0, 0, 0];
        let roa_style = end_of_range(&start, 24);
        assert_eq!(roa_style, vec![10, 0, 0, 255]);

        let filter_end = end_of_filter_range(&start, 16, &roa_style);
        assert_eq!(filter_end, vec![10, 0, 255, 255]);
        assert_ne!(filter_end, roa_style);
    }

    #[test]
    fn test_filter_range_keeps_current_end_bits() {
        let filter_end = end_of_filter_range(&[10, 0, 0, 0], 24, &[10, 0, 0, 0]);
        assert_eq!(filter_end, vec![10, 0, 0, 255]);
    }

    #[test]
    fn test_filter_range_width_mismatch_falls_back_to_start() {
        let filter_end = end_of_filter_range(&[10, 0, 0, 0], 8, &[0u8; 16]);
        assert_eq!(filter_end, vec![10, 255, 255, 255]);
    }

    #[test]
    fn test_prefix_in_range() {
        assert!(is_prefix_in_range(&[10, 0, 0, 128], &[10, 0, 0, 0], 24));
        assert!(is_prefix_in_range(&[10, 0, 1, 0], &[10, 0, 0, 0], 16));
        assert!(!is_prefix_in_range(&[10, 0, 1, 0], &[10, 0, 0, 0], 24));
        // Partial boundary byte: 10.0.0.0/25 does not hold 10.0.0.128
        assert!(!is_prefix_in_range(&[10, 0, 0, 128], &[10, 0, 0, 0], 25));
        assert!(is_prefix_in_range(&[10, 0, 0, 127], &[10, 0, 0, 0], 25));
    }

    #[test]
    fn test_zero_length_father_holds_everything() {
        assert!(is_prefix_in_range(&[203, 0, 113, 7], &[0, 0, 0, 0], 0));
    }

    #[test]
    fn test_family_mismatch_never_in_range() {
        assert!(!is_prefix_in_range(&[0u8; 4], &[0u8; 16], 0));
        assert!(!is_prefix_in_range(&[0u8; 16], &[0u8; 4], 0));
    }

    proptest! {
        #[test]
        fn prop_reflexive_v4(bytes in proptest::array::uniform4(any::<u8>()), len in 0u8..=32) {
            prop_assert!(is_prefix_in_range(&bytes, &bytes, len));
        }

        #[test]
        fn prop_reflexive_v6(bytes in proptest::array::uniform16(any::<u8>()), len in 0u8..=128) {
            prop_assert!(is_prefix_in_range(&bytes, &bytes, len));
        }

        #[test]
        fn prop_family_mismatch(
            v4 in proptest::array::uniform4(any::<u8>()),
            v6 in proptest::array::uniform16(any::<u8>()),
            len in 0u8..=128,
        ) {
            prop_assert!(!is_prefix_in_range(&v4, &v6, len));
            prop_assert!(!is_prefix_in_range(&v6, &v4, len));
        }

        #[test]
        fn prop_end_of_range_stays_in_block(
            bytes in proptest::array::uniform4(any::<u8>()),
            len in 0u8..=32,
        ) {
            let end = end_of_range(&bytes, len);
            prop_assert!(is_prefix_in_range(&end, &bytes, len));
            prop_assert!(end.as_slice() >= bytes.as_slice());
        }
    }
}
