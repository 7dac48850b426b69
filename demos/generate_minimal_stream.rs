//! Builds the smallest possible valid VC-2 sequence (a sequence header, one
//! all-zero-coefficient high-quality picture, end of sequence) and writes it
//! to a file, or to stdout when no path is given.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use vc2_conformance::decoder::sequence_header::SourceParameters;
use vc2_conformance::decoder::transform::{band_read_order, padded_size, subband_dimensions};
use vc2_conformance::generator::{
    Auto, DataUnitSpec, PictureSpec, SequenceHeaderSpec, SequenceSpec, SliceSizeSpec,
};
use vc2_conformance::generator::write_sequence;
use vc2_conformance::tables::constants::WaveletFilter;

fn zero_coefficients(width: u32, height: u32, dwt_depth: u32, dwt_depth_ho: u32) -> HashMap<(u32, vc2_conformance::tables::constants::Orientation), Vec<Vec<i64>>> {
    let padded_w = padded_size(width, dwt_depth_ho + dwt_depth);
    let padded_h = padded_size(height, dwt_depth);
    let mut m = HashMap::new();
    for (level, orientation) in band_read_order(dwt_depth, dwt_depth_ho) {
        let (bw, bh) = subband_dimensions(padded_w, padded_h, dwt_depth, dwt_depth_ho, level);
        m.insert((level, orientation), vec![vec![0i64; bw as usize]; bh as usize]);
    }
    m
}

fn build_spec() -> SequenceSpec {
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

    SequenceSpec {
        data_units: vec![
            DataUnitSpec::SequenceHeader(SequenceHeaderSpec {
                major_version: 2,
                minor_version: 0,
                profile: 3,
                level: 0,
                base_video_format: 4,
                custom_source_parameters: Some(SourceParameters {
                    frame_width: 8,
                    frame_height: 8,
                    color_diff_format_index: 2,
                    source_sampling: 0,
                    top_field_first: true,
                    frame_rate_numerator: 25,
                    frame_rate_denominator: 1,
                    pixel_aspect_ratio_numerator: 1,
                    pixel_aspect_ratio_denominator: 1,
                    clean_width: 8,
                    clean_height: 8,
                    left_offset: 0,
                    top_offset: 0,
                    luma_offset: 0,
                    luma_excursion: 255,
                    color_diff_offset: 128,
                    color_diff_excursion: 255,
                    color_primaries_index: 1,
                    color_matrix_index: 1,
                    transfer_function_index: 0,
                }),
                picture_coding_mode: 0,
            }),
            DataUnitSpec::Picture(picture),
            DataUnitSpec::EndOfSequence,
        ],
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let bytes = match write_sequence(&build_spec()) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("generator error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match env::args().nth(1) {
        Some(path) => fs::write(&path, &bytes),
        None => io::stdout().write_all(&bytes),
    };

    if let Err(e) = result {
        eprintln!("write error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
