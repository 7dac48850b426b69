//! Whole-stream scenarios from spec.md §8, exercised through the public
//! generator and decoder APIs rather than any internal module.

use std::collections::HashMap;

use vc2_conformance::decoder::sequence_header::SourceParameters;
use vc2_conformance::decoder::transform::{band_read_order, padded_size, subband_dimensions};
use vc2_conformance::decoder::decode_stream;
use vc2_conformance::generator::{
    Auto, DataUnitSpec, FragmentSpec, PictureSpec, SequenceHeaderSpec, SequenceSpec, SliceSizeSpec,
};
use vc2_conformance::generator::write_sequence;
use vc2_conformance::tables::constants::{Orientation, WaveletFilter};
use vc2_conformance::{Picture, VideoParameters, Vc2Error};

fn zero_coefficients(
    width: u32,
    height: u32,
    dwt_depth: u32,
    dwt_depth_ho: u32,
) -> HashMap<(u32, Orientation), Vec<Vec<i64>>> {
    let padded_w = padded_size(width, dwt_depth_ho + dwt_depth);
    let padded_h = padded_size(height, dwt_depth);
    let mut m = HashMap::new();
    for (level, orientation) in band_read_order(dwt_depth, dwt_depth_ho) {
        let (bw, bh) = subband_dimensions(padded_w, padded_h, dwt_depth, dwt_depth_ho, level);
        m.insert((level, orientation), vec![vec![0i64; bw as usize]; bh as usize]);
    }
    m
}

fn source_parameters_for(width: u32, height: u32) -> SourceParameters {
    SourceParameters {
        frame_width: width,
        frame_height: height,
        color_diff_format_index: 2,
        source_sampling: 0,
        top_field_first: true,
        frame_rate_numerator: 25,
        frame_rate_denominator: 1,
        pixel_aspect_ratio_numerator: 1,
        pixel_aspect_ratio_denominator: 1,
        clean_width: width,
        clean_height: height,
        left_offset: 0,
        top_offset: 0,
        luma_offset: 0,
        luma_excursion: 255,
        color_diff_offset: 128,
        color_diff_excursion: 255,
        color_primaries_index: 1,
        color_matrix_index: 1,
        transfer_function_index: 0,
    }
}

fn sequence_header_for(profile: u32, width: u32, height: u32) -> DataUnitSpec {
    DataUnitSpec::SequenceHeader(SequenceHeaderSpec {
        major_version: 2,
        minor_version: 0,
        profile,
        level: 0,
        base_video_format: 4,
        custom_source_parameters: Some(source_parameters_for(width, height)),
        picture_coding_mode: 0,
    })
}

fn count_pictures(bytes: &[u8]) -> vc2_conformance::Result<usize> {
    let mut n = 0;
    decode_stream(bytes, &mut |_p: &Picture, _vp: &VideoParameters| n += 1)?;
    Ok(n)
}

/// Scenario 4 (spec.md §8): summing `slice_bytes(sx, sy)` over every slice
/// in a picture must exactly reproduce the picture's declared byte budget,
/// with no slice differing from the mean by more than one byte. The
/// arithmetic is a telescoping division identity independent of any
/// decoder state, but we also drive it through a real low-delay picture to
/// confirm the generator and decoder agree on the same budget.
#[test]
fn ld_slice_byte_budget_sums_exactly_across_a_10x10_slice_grid() {
    let slices_x = 10u32;
    let slices_y = 10u32;
    let numerator = 123u64;
    let denominator = 100u64;
    let total_slices = (slices_x * slices_y) as u64;

    let mut total = 0u64;
    let mut max_bytes = 0u64;
    let mut min_bytes = u64::MAX;
    for slice_number in 0..total_slices {
        let bytes = ((slice_number + 1) * numerator) / denominator - (slice_number * numerator) / denominator;
        total += bytes;
        max_bytes = max_bytes.max(bytes);
        min_bytes = min_bytes.min(bytes);
    }
    assert_eq!(total, numerator);
    assert!(max_bytes - min_bytes <= 1);

    let dwt_depth = 1;
    let picture = PictureSpec {
        picture_number: Auto::Value(0),
        major_version: 2,
        wavelet_index: WaveletFilter::HaarNoShift as u32,
        wavelet_index_ho: None,
        dwt_depth,
        dwt_depth_ho: None,
        slices_x,
        slices_y,
        slice_size: SliceSizeSpec::LowDelay {
            slice_bytes_numerator: numerator as u32,
            slice_bytes_denominator: denominator as u32,
        },
        custom_quant_matrix: None,
        qindex: 0,
        is_low_delay: true,
        luma_width: 20,
        luma_height: 20,
        color_diff_width: 10,
        color_diff_height: 10,
        y_coefficients: zero_coefficients(20, 20, dwt_depth, 0),
        c1_coefficients: zero_coefficients(10, 10, dwt_depth, 0),
        c2_coefficients: zero_coefficients(10, 10, dwt_depth, 0),
    };

    let spec = SequenceSpec {
        data_units: vec![
            sequence_header_for(0, 20, 20),
            DataUnitSpec::Picture(picture),
            DataUnitSpec::EndOfSequence,
        ],
    };

    let bytes = write_sequence(&spec).unwrap();
    assert_eq!(count_pictures(&bytes).unwrap(), 1);
}

/// Scenario 6 (spec.md §8): a sequence carrying two sequence headers with
/// differing byte content must fail closed, not silently adopt the second.
#[test]
fn sequence_header_identity_mismatch_is_rejected() {
    let spec = SequenceSpec {
        data_units: vec![
            sequence_header_for(0, 16, 16),
            sequence_header_for(0, 32, 32),
            DataUnitSpec::EndOfSequence,
        ],
    };

    let bytes = write_sequence(&spec).unwrap();
    let err = count_pictures(&bytes).unwrap_err();
    assert!(matches!(err, Vc2Error::SequenceHeaderChangedMidSequence { .. }));
}

/// An out-of-enum profile value must be rejected at the point it's read,
/// not merely absorbed by the level-constraint table's `any` escape hatch.
#[test]
fn out_of_enum_profile_is_rejected_as_bad_profile() {
    let spec = SequenceSpec {
        data_units: vec![sequence_header_for(7, 16, 16), DataUnitSpec::EndOfSequence],
    };

    let bytes = write_sequence(&spec).unwrap();
    let err = count_pictures(&bytes).unwrap_err();
    assert!(matches!(err, Vc2Error::BadProfile { value: 7, .. }));
}

/// An out-of-enum level value must be rejected at the point it's read.
#[test]
fn out_of_enum_level_is_rejected_as_bad_level() {
    let spec = SequenceSpec {
        data_units: vec![
            DataUnitSpec::SequenceHeader(SequenceHeaderSpec {
                major_version: 2,
                minor_version: 0,
                profile: 0,
                level: 9,
                base_video_format: 4,
                custom_source_parameters: Some(source_parameters_for(16, 16)),
                picture_coding_mode: 0,
            }),
            DataUnitSpec::EndOfSequence,
        ],
    };

    let bytes = write_sequence(&spec).unwrap();
    let err = count_pictures(&bytes).unwrap_err();
    assert!(matches!(err, Vc2Error::BadLevel { value: 9, .. }));
}

/// Scenario from spec.md §3, §8: profile must not change between sequences
/// within a stream, even though each sequence gets its own fresh decoder
/// state.
#[test]
fn profile_change_across_sequences_in_a_stream_is_rejected() {
    let mut data_units = vec![sequence_header_for(0, 16, 16), DataUnitSpec::EndOfSequence];
    data_units.push(sequence_header_for(3, 16, 16));
    data_units.push(DataUnitSpec::EndOfSequence);

    let spec = SequenceSpec { data_units };
    let bytes = write_sequence(&spec).unwrap();
    let err = count_pictures(&bytes).unwrap_err();
    assert!(matches!(err, Vc2Error::ProfileChanged { previous: 0, current: 3, .. }));
}

#[test]
fn high_quality_sequence_round_trips() {
    let dwt_depth = 1;
    let picture = PictureSpec {
        picture_number: Auto::Auto,
        major_version: 2,
        wavelet_index: WaveletFilter::HaarNoShift as u32,
        wavelet_index_ho: None,
        dwt_depth,
        dwt_depth_ho: None,
        slices_x: 2,
        slices_y: 2,
        slice_size: SliceSizeSpec::HighQuality {
            slice_prefix_bytes: 0,
            slice_size_scaler: 1,
        },
        custom_quant_matrix: None,
        qindex: 0,
        is_low_delay: false,
        luma_width: 8,
        luma_height: 8,
        color_diff_width: 4,
        color_diff_height: 4,
        y_coefficients: zero_coefficients(8, 8, dwt_depth, 0),
        c1_coefficients: zero_coefficients(4, 4, dwt_depth, 0),
        c2_coefficients: zero_coefficients(4, 4, dwt_depth, 0),
    };

    let spec = SequenceSpec {
        data_units: vec![
            sequence_header_for(3, 8, 8),
            DataUnitSpec::Picture(picture),
            DataUnitSpec::EndOfSequence,
        ],
    };

    let bytes = write_sequence(&spec).unwrap();
    assert_eq!(count_pictures(&bytes).unwrap(), 1);
}

/// A fragmented picture: one `fragment_slice_count = 0` header fragment
/// opening the transform parameters, then every slice delivered across two
/// slice-bearing fragments.
#[test]
fn fragmented_picture_assembles_from_a_header_and_two_slice_fragments() {
    let dwt_depth = 1;
    let picture = PictureSpec {
        picture_number: Auto::Value(0),
        major_version: 2,
        wavelet_index: WaveletFilter::HaarNoShift as u32,
        wavelet_index_ho: None,
        dwt_depth,
        dwt_depth_ho: None,
        slices_x: 2,
        slices_y: 2,
        slice_size: SliceSizeSpec::HighQuality {
            slice_prefix_bytes: 0,
            slice_size_scaler: 1,
        },
        custom_quant_matrix: None,
        qindex: 0,
        is_low_delay: false,
        luma_width: 8,
        luma_height: 8,
        color_diff_width: 4,
        color_diff_height: 4,
        y_coefficients: zero_coefficients(8, 8, dwt_depth, 0),
        c1_coefficients: zero_coefficients(4, 4, dwt_depth, 0),
        c2_coefficients: zero_coefficients(4, 4, dwt_depth, 0),
    };

    let spec = SequenceSpec {
        data_units: vec![
            sequence_header_for(3, 8, 8),
            DataUnitSpec::Fragment(FragmentSpec::Header {
                picture_number: Auto::Value(0),
                picture: picture.clone(),
            }),
            DataUnitSpec::Fragment(FragmentSpec::Slices {
                picture_number: Auto::Value(0),
                picture: picture.clone(),
                start_index: 0,
                count: 2,
            }),
            DataUnitSpec::Fragment(FragmentSpec::Slices {
                picture_number: Auto::Value(0),
                picture,
                start_index: 2,
                count: 2,
            }),
            DataUnitSpec::EndOfSequence,
        ],
    };

    let bytes = write_sequence(&spec).unwrap();
    assert_eq!(count_pictures(&bytes).unwrap(), 1);
}
