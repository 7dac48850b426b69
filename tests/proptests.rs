//! Property tests for the round-trip/idempotence properties enumerated in
//! spec.md §8, run against the public API rather than any internal module.

use proptest::prelude::*;

use vc2_conformance::bitreader::BitReader;
use vc2_conformance::bitwriter::BitWriter;
use vc2_conformance::idwt::{dwt, idwt, oned_analysis, oned_synthesis};
use vc2_conformance::quant::{forward_quant, inverse_quant};
use vc2_conformance::tables::constants::WaveletFilter;
use vc2_conformance::tables::lifting::LIFTING_FILTERS;
use vc2_conformance::vlc::{read_sint, read_uint, write_sint, write_uint};

proptest! {
    #[test]
    fn uint_round_trips(value in 0u64..(1u64 << 40)) {
        let mut w = BitWriter::new();
        write_uint(&mut w, value);
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        prop_assert_eq!(read_uint(&mut r), value);
    }

    #[test]
    fn sint_round_trips(value in -(1i64 << 40)..(1i64 << 40)) {
        let mut w = BitWriter::new();
        write_sint(&mut w, value);
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        prop_assert_eq!(read_sint(&mut r), value);
    }

    #[test]
    fn oned_analysis_then_synthesis_is_the_identity(
        values in proptest::collection::vec(-1000i64..1000, 2..32)
            .prop_map(|mut v| { if v.len() % 2 != 0 { v.pop(); } v })
            .prop_filter("need at least 2 samples", |v| v.len() >= 2)
    ) {
        for wavelet in [
            WaveletFilter::HaarNoShift,
            WaveletFilter::LeGall5_3,
            WaveletFilter::DeslauriersDubuc9_7,
        ] {
            let filter = LIFTING_FILTERS.get(&wavelet).unwrap();
            let mut a = values.clone();
            oned_analysis(&mut a, filter);
            oned_synthesis(&mut a, filter);
            prop_assert_eq!(&a, &values);
        }
    }

    #[test]
    fn quant_round_trip_stays_within_the_declared_error_bound(
        index in 0u32..80,
        value in -10_000i64..10_000,
    ) {
        let bound = 1i64 << (index / 4 + 1);
        let quantised = forward_quant(value, index);
        let reconstructed = inverse_quant(quantised, index);
        prop_assert!((value - reconstructed).abs() < bound);
    }

    #[test]
    fn idwt_inverts_dwt_on_an_8x8_picture(
        seed in proptest::collection::vec(-50i64..50, 64),
    ) {
        let wavelet = LIFTING_FILTERS.get(&WaveletFilter::HaarNoShift).unwrap().clone();
        let picture: Vec<Vec<i64>> = seed.chunks(8).map(|row| row.to_vec()).collect();

        let coeffs = dwt(&picture, 1, 0, &wavelet, &wavelet);
        let reconstructed = idwt(&coeffs, 1, 0, &wavelet, &wavelet);
        prop_assert_eq!(reconstructed, picture);
    }
}
