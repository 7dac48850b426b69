//! Bitstream generator (SPEC_FULL §B): a programmatic writer half of
//! `vc2_conformance/scripts/vc2_bitstream_generator.py`'s `AUTO`-sentinel
//! serialiser, minus its JSON/expression-evaluation front-end. `DataUnitSpec`
//! and `SequenceSpec` stand in for the JSON "high-level specification" input.
//!
//! The generator is deliberately not conformance-checked: callers can supply
//! out-of-table indices or mismatched quantisation matrices to produce
//! malformed streams the decoder is expected to reject.

use crate::bitwriter::{BitWriter, BoundedWriter};
use crate::decoder::sequence_header::SourceParameters;
use crate::decoder::transform::{band_read_order, padded_size, subband_dimensions};
use crate::error::{Result, Vc2Error};
use crate::state::{CoeffStorage, QuantMatrix};
use crate::tables::constants::{Orientation, ParseCode, PARSE_INFO_PREFIX};
use crate::vlc::{write_bool, write_nbits, write_uint, write_uint_lit};

/// A field whose value the generator fills in during the final patch-up
/// pass: `next_parse_offset`, `previous_parse_offset`, `picture_number`.
#[derive(Debug, Clone, Copy)]
pub enum Auto<T> {
    Value(T),
    Auto,
}

#[derive(Debug, Clone)]
pub enum SliceSizeSpec {
    LowDelay {
        slice_bytes_numerator: u32,
        slice_bytes_denominator: u32,
    },
    HighQuality {
        slice_prefix_bytes: u32,
        slice_size_scaler: u32,
    },
}

#[derive(Debug, Clone)]
pub struct SequenceHeaderSpec {
    pub major_version: u32,
    pub minor_version: u32,
    pub profile: u32,
    pub level: u32,
    pub base_video_format: u32,
    /// `None` writes all eight `custom_..._flag`s false (pure base-format
    /// defaults); `Some` writes all eight true with explicit (index-0)
    /// values, the coarsest bespoke override the writer supports.
    pub custom_source_parameters: Option<SourceParameters>,
    pub picture_coding_mode: u32,
}

#[derive(Debug, Clone)]
pub struct PictureSpec {
    pub picture_number: Auto<u32>,
    pub major_version: u32,
    pub wavelet_index: u32,
    pub wavelet_index_ho: Option<u32>,
    pub dwt_depth: u32,
    pub dwt_depth_ho: Option<u32>,
    pub slices_x: u32,
    pub slices_y: u32,
    pub slice_size: SliceSizeSpec,
    pub custom_quant_matrix: Option<QuantMatrix>,
    pub qindex: u32,
    pub is_low_delay: bool,
    pub luma_width: u32,
    pub luma_height: u32,
    pub color_diff_width: u32,
    pub color_diff_height: u32,
    /// Already-quantised signed coefficients, one full-size band array per
    /// `(level, orientation)` sized per [`subband_dimensions`] against the
    /// *padded* component size. Slices read only their owning rectangle.
    pub y_coefficients: CoeffStorage,
    pub c1_coefficients: CoeffStorage,
    pub c2_coefficients: CoeffStorage,
}

/// One fragment data unit. A fragmented picture always opens with a
/// `Header` fragment (`fragment_slice_count = 0`, carries
/// `transform_parameters`) followed by one or more `Slices` fragments, each
/// contributing a contiguous run of the picture's slices starting at its own
/// linear `(fragment_y_offset * slices_x + fragment_x_offset)` index — this
/// mirrors `decoder::slice::fragment_parse`'s two-shape dispatch exactly.
#[derive(Debug, Clone)]
pub enum FragmentSpec {
    Header {
        picture_number: Auto<u32>,
        picture: PictureSpec,
    },
    Slices {
        picture_number: Auto<u32>,
        picture: PictureSpec,
        start_index: u32,
        count: u32,
    },
}

#[derive(Debug, Clone)]
pub enum DataUnitSpec {
    SequenceHeader(SequenceHeaderSpec),
    Picture(PictureSpec),
    Fragment(FragmentSpec),
    EndOfSequence,
    Auxiliary(Vec<u8>),
    Padding(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub struct SequenceSpec {
    pub data_units: Vec<DataUnitSpec>,
}

fn parse_code_for(unit: &DataUnitSpec, is_low_delay: bool) -> ParseCode {
    match unit {
        DataUnitSpec::SequenceHeader(_) => ParseCode::SEQUENCE_HEADER,
        DataUnitSpec::EndOfSequence => ParseCode::END_OF_SEQUENCE,
        DataUnitSpec::Auxiliary(_) => ParseCode(0x20),
        DataUnitSpec::Padding(_) => ParseCode(0x30),
        DataUnitSpec::Picture(p) => {
            if p.is_low_delay {
                ParseCode::LOW_DELAY_PICTURE
            } else {
                ParseCode::HIGH_QUALITY_PICTURE
            }
        }
        DataUnitSpec::Fragment(f) => {
            let _ = is_low_delay;
            let picture = match f {
                FragmentSpec::Header { picture, .. } => picture,
                FragmentSpec::Slices { picture, .. } => picture,
            };
            if picture.is_low_delay {
                ParseCode::LOW_DELAY_PICTURE_FRAGMENT
            } else {
                ParseCode::HIGH_QUALITY_PICTURE_FRAGMENT
            }
        }
    }
}

fn write_sequence_header_body(w: &mut BitWriter, spec: &SequenceHeaderSpec) {
    write_uint(w, spec.major_version as u64);
    write_uint(w, spec.minor_version as u64);
    write_uint(w, spec.profile as u64);
    write_uint(w, spec.level as u64);
    write_uint(w, spec.base_video_format as u64);

    match &spec.custom_source_parameters {
        None => {
            for _ in 0..8 {
                write_bool(w, false);
            }
        }
        Some(sp) => {
            write_bool(w, true);
            write_uint(w, sp.frame_width as u64);
            write_uint(w, sp.frame_height as u64);

            write_bool(w, true);
            write_uint(w, sp.color_diff_format_index as u64);

            write_bool(w, true);
            write_uint(w, sp.source_sampling as u64);

            write_bool(w, true);
            write_uint(w, 0); // preset index 0: explicit numerator/denominator follow
            write_uint(w, sp.frame_rate_numerator);
            write_uint(w, sp.frame_rate_denominator);

            write_bool(w, true);
            write_uint(w, 0);
            write_uint(w, sp.pixel_aspect_ratio_numerator);
            write_uint(w, sp.pixel_aspect_ratio_denominator);

            write_bool(w, true);
            write_uint(w, sp.clean_width as u64);
            write_uint(w, sp.clean_height as u64);
            write_uint(w, sp.left_offset as u64);
            write_uint(w, sp.top_offset as u64);

            write_bool(w, true);
            write_uint(w, 0);
            write_uint(w, sp.luma_offset as u64);
            write_uint(w, sp.luma_excursion as u64);
            write_uint(w, sp.color_diff_offset as u64);
            write_uint(w, sp.color_diff_excursion as u64);

            write_bool(w, true);
            write_uint(w, 0);
            write_bool(w, true);
            write_uint(w, sp.color_primaries_index as u64);
            write_bool(w, true);
            write_uint(w, sp.color_matrix_index as u64);
            write_bool(w, true);
            write_uint(w, sp.transfer_function_index as u64);
        }
    }

    write_uint(w, spec.picture_coding_mode as u64);
}

fn write_transform_parameters(w: &mut BitWriter, p: &PictureSpec) {
    write_uint(w, p.wavelet_index as u64);
    write_uint(w, p.dwt_depth as u64);

    if p.major_version >= 3 {
        match p.wavelet_index_ho {
            Some(v) => {
                write_bool(w, true);
                write_uint(w, v as u64);
            }
            None => write_bool(w, false),
        }
        match p.dwt_depth_ho {
            Some(v) => {
                write_bool(w, true);
                write_uint(w, v as u64);
            }
            None => write_bool(w, false),
        }
    }

    write_uint(w, p.slices_x as u64);
    write_uint(w, p.slices_y as u64);
    match &p.slice_size {
        SliceSizeSpec::LowDelay {
            slice_bytes_numerator,
            slice_bytes_denominator,
        } => {
            write_uint(w, *slice_bytes_numerator as u64);
            write_uint(w, *slice_bytes_denominator as u64);
        }
        SliceSizeSpec::HighQuality {
            slice_prefix_bytes,
            slice_size_scaler,
        } => {
            write_uint(w, *slice_prefix_bytes as u64);
            write_uint(w, *slice_size_scaler as u64);
        }
    }

    match &p.custom_quant_matrix {
        None => write_bool(w, false),
        Some(matrix) => {
            write_bool(w, true);
            let dwt_depth_ho = p.dwt_depth_ho.unwrap_or(0);
            for key in band_read_order(p.dwt_depth, dwt_depth_ho) {
                let value = *matrix.get(&key).unwrap_or(&0);
                write_uint(w, value as u64);
            }
        }
    }
}

fn slice_rect(band_w: u32, band_h: u32, slices_x: u32, slices_y: u32, sx: u32, sy: u32) -> (u32, u32, u32, u32) {
    let left = band_w * sx / slices_x;
    let right = band_w * (sx + 1) / slices_x;
    let top = band_h * sy / slices_y;
    let bottom = band_h * (sy + 1) / slices_y;
    (left, right, top, bottom)
}

fn intlog2(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    }
}

fn write_uint_bounded(w: &mut BoundedWriter, value: u64) -> Result<()> {
    let v = value + 1;
    let k = 63 - v.leading_zeros();
    for i in (0..k).rev() {
        w.write_bit(false)?;
        w.write_bit((v >> i) & 1 != 0)?;
    }
    w.write_bit(true)
}

fn write_sint_bounded(w: &mut BoundedWriter, value: i64) -> Result<()> {
    write_uint_bounded(w, value.unsigned_abs())?;
    if value != 0 {
        w.write_bit(value < 0)?;
    }
    Ok(())
}

fn component_padded_size(p: &PictureSpec, width: u32, height: u32) -> (u32, u32) {
    let dwt_depth_ho = p.dwt_depth_ho.unwrap_or(0);
    (
        padded_size(width, dwt_depth_ho + p.dwt_depth),
        padded_size(height, p.dwt_depth),
    )
}

fn write_bands_to<W>(
    p: &PictureSpec,
    coefficients: &CoeffStorage,
    width: u32,
    height: u32,
    sx: u32,
    sy: u32,
    mut write_value: W,
) -> Result<()>
where
    W: FnMut(i64) -> Result<()>,
{
    let (padded_w, padded_h) = component_padded_size(p, width, height);
    let dwt_depth_ho = p.dwt_depth_ho.unwrap_or(0);
    for (level, orientation) in band_read_order(p.dwt_depth, dwt_depth_ho) {
        let (bw, bh) = subband_dimensions(padded_w, padded_h, p.dwt_depth, dwt_depth_ho, level);
        let (left, right, top, bottom) = slice_rect(bw, bh, p.slices_x, p.slices_y, sx, sy);
        let band = coefficients
            .get(&(level, orientation))
            .ok_or_else(|| Vc2Error::Generator(format!("missing coefficients for band {level:?}/{orientation:?}")))?;
        for y in top..bottom {
            for x in left..right {
                write_value(band[y as usize][x as usize])?;
            }
        }
    }
    Ok(())
}

fn measure_bits<F: FnOnce(&mut BitWriter) -> Result<()>>(f: F) -> Result<u64> {
    let mut scratch = BitWriter::new();
    f(&mut scratch)?;
    let (bytes, bit_pos) = scratch.tell();
    Ok(bytes * 8 + (7 - bit_pos as u64))
}

fn write_ld_slice(w: &mut BitWriter, p: &PictureSpec, sx: u32, sy: u32) -> Result<()> {
    let (num, den) = match p.slice_size {
        SliceSizeSpec::LowDelay {
            slice_bytes_numerator,
            slice_bytes_denominator,
        } => (slice_bytes_numerator as u64, slice_bytes_denominator as u64),
        SliceSizeSpec::HighQuality { .. } => {
            return Err(Vc2Error::Generator("LD slice write requested for an HQ slice_size spec".into()))
        }
    };
    let slice_number = (sy * p.slices_x + sx) as u64;
    let slice_bytes = ((slice_number + 1) * num) / den - (slice_number * num) / den;
    let total_bits = slice_bytes * 8;

    write_nbits(w, p.qindex as u64, 7);

    let length_bits = intlog2(total_bits.saturating_sub(7));
    let y_bits = measure_bits(|scratch| {
        write_bands_to(p, &p.y_coefficients, p.luma_width, p.luma_height, sx, sy, |v| {
            crate::vlc::write_sint(scratch, v);
            Ok(())
        })
    })?;
    write_nbits(w, y_bits, length_bits);

    let remaining_bits = total_bits.saturating_sub(7).saturating_sub(length_bits as u64);
    let c_bits = remaining_bits.saturating_sub(y_bits);

    {
        let mut yb = w.bounded(y_bits);
        write_bands_to(p, &p.y_coefficients, p.luma_width, p.luma_height, sx, sy, |v| {
            write_sint_bounded(&mut yb, v)
        })?;
        yb.flush_outputb()?;
    }
    {
        let (padded_w, padded_h) = component_padded_size(p, p.color_diff_width, p.color_diff_height);
        let dwt_depth_ho = p.dwt_depth_ho.unwrap_or(0);
        let mut cb = w.bounded(c_bits);
        for (level, orientation) in band_read_order(p.dwt_depth, dwt_depth_ho) {
            let (bw, bh) = subband_dimensions(padded_w, padded_h, p.dwt_depth, dwt_depth_ho, level);
            let (left, right, top, bottom) = slice_rect(bw, bh, p.slices_x, p.slices_y, sx, sy);
            let c1 = p
                .c1_coefficients
                .get(&(level, orientation))
                .ok_or_else(|| Vc2Error::Generator("missing C1 coefficients".into()))?;
            let c2 = p
                .c2_coefficients
                .get(&(level, orientation))
                .ok_or_else(|| Vc2Error::Generator("missing C2 coefficients".into()))?;
            for y in top..bottom {
                for x in left..right {
                    write_sint_bounded(&mut cb, c1[y as usize][x as usize])?;
                    write_sint_bounded(&mut cb, c2[y as usize][x as usize])?;
                }
            }
        }
        cb.flush_outputb()?;
    }
    Ok(())
}

fn write_hq_slice(w: &mut BitWriter, p: &PictureSpec, sx: u32, sy: u32) -> Result<()> {
    let (prefix_bytes, scaler) = match p.slice_size {
        SliceSizeSpec::HighQuality {
            slice_prefix_bytes,
            slice_size_scaler,
        } => (slice_prefix_bytes, slice_size_scaler),
        SliceSizeSpec::LowDelay { .. } => {
            return Err(Vc2Error::Generator("HQ slice write requested for an LD slice_size spec".into()))
        }
    };
    for _ in 0..prefix_bytes {
        write_nbits(w, 0, 8);
    }
    write_nbits(w, p.qindex as u64, 8);

    let components: [(&CoeffStorage, u32, u32); 3] = [
        (&p.y_coefficients, p.luma_width, p.luma_height),
        (&p.c1_coefficients, p.color_diff_width, p.color_diff_height),
        (&p.c2_coefficients, p.color_diff_width, p.color_diff_height),
    ];

    for (coeffs, width, height) in components {
        let bits = measure_bits(|scratch| {
            write_bands_to(p, coeffs, width, height, sx, sy, |v| {
                crate::vlc::write_sint(scratch, v);
                Ok(())
            })
        })?;
        let length = (bits + (scaler as u64 * 8) - 1) / (scaler as u64 * 8);
        if length > 255 {
            return Err(Vc2Error::Generator("HQ slice component too large for a 1-byte scaled length".into()));
        }
        write_nbits(w, length, 8);
        let n_bits = scaler as u64 * length * 8;
        let mut b = w.bounded(n_bits);
        write_bands_to(p, coeffs, width, height, sx, sy, |v| write_sint_bounded(&mut b, v))?;
        b.flush_outputb()?;
    }
    Ok(())
}

fn write_picture_body(
    w: &mut BitWriter,
    p: &PictureSpec,
    picture_number: u32,
    slice_count: u32,
    start_index: u32,
) -> Result<()> {
    let total = p.slices_x * p.slices_y;
    for i in 0..slice_count {
        let linear = (start_index + i) % total;
        let sx = linear % p.slices_x;
        let sy = linear / p.slices_x;
        if p.is_low_delay {
            write_ld_slice(w, p, sx, sy)?;
        } else {
            write_hq_slice(w, p, sx, sy)?;
        }
    }
    let _ = picture_number;
    Ok(())
}

fn patch_u32(bytes: &mut [u8], byte_offset: usize, value: u32) {
    bytes[byte_offset..byte_offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Serialise a full sequence, resolving every [`Auto`] sentinel in a final
/// patch-up pass over the produced bytes. Fails with
/// [`Vc2Error::Generator`] if the spec does not end with
/// [`DataUnitSpec::EndOfSequence`] (a non-terminating spec would otherwise
/// make `next_parse_offset` resolution ill-defined).
pub fn write_sequence(spec: &SequenceSpec) -> Result<Vec<u8>> {
    if !matches!(spec.data_units.last(), Some(DataUnitSpec::EndOfSequence)) {
        return Err(Vc2Error::Generator(
            "sequence specification must end with an end-of-sequence data unit".to_string(),
        ));
    }

    let mut w = BitWriter::new();
    let mut unit_starts: Vec<usize> = Vec::with_capacity(spec.data_units.len());
    let mut next_offset_patches: Vec<usize> = Vec::with_capacity(spec.data_units.len());
    let mut prev_offset_patches: Vec<usize> = Vec::with_capacity(spec.data_units.len());
    let mut last_picture_number: Option<u32> = None;

    for unit in &spec.data_units {
        unit_starts.push(w.tell().0 as usize);

        let code = parse_code_for(unit, false);
        write_uint_lit(&mut w, PARSE_INFO_PREFIX as u64, 4);
        write_uint_lit(&mut w, code.0 as u64, 1);
        next_offset_patches.push(w.tell().0 as usize);
        write_uint_lit(&mut w, 0, 4);
        prev_offset_patches.push(w.tell().0 as usize);
        write_uint_lit(&mut w, 0, 4);

        match unit {
            DataUnitSpec::SequenceHeader(s) => write_sequence_header_body(&mut w, s),
            DataUnitSpec::Picture(p) => {
                let picture_number = match p.picture_number {
                    Auto::Value(v) => v,
                    Auto::Auto => last_picture_number.map_or(0, |n| n.wrapping_add(1)),
                };
                last_picture_number = Some(picture_number);
                write_uint_lit(&mut w, picture_number as u64, 4);
                write_transform_parameters(&mut w, p);
                write_picture_body(&mut w, p, picture_number, p.slices_x * p.slices_y, 0)?;
            }
            DataUnitSpec::Fragment(FragmentSpec::Header { picture_number, picture }) => {
                let picture_number = match picture_number {
                    Auto::Value(v) => *v,
                    Auto::Auto => last_picture_number.map_or(0, |n| n.wrapping_add(1)),
                };
                last_picture_number = Some(picture_number);
                write_uint_lit(&mut w, picture_number as u64, 4);
                write_uint(&mut w, 0); // fragment_data_length: unused by this decoder, written as 0
                write_uint(&mut w, 0); // fragment_slice_count = 0 marks the restart/header fragment
                write_transform_parameters(&mut w, picture);
            }
            DataUnitSpec::Fragment(FragmentSpec::Slices {
                picture_number,
                picture,
                start_index,
                count,
            }) => {
                let picture_number = match picture_number {
                    Auto::Value(v) => *v,
                    Auto::Auto => last_picture_number.map_or(0, |n| n.wrapping_add(1)),
                };
                last_picture_number = Some(picture_number);
                write_uint_lit(&mut w, picture_number as u64, 4);
                write_uint(&mut w, 0); // fragment_data_length: unused by this decoder, written as 0
                write_uint(&mut w, *count as u64);
                let slices_x = picture.slices_x;
                write_uint(&mut w, (*start_index % slices_x) as u64); // fragment_x_offset
                write_uint(&mut w, (*start_index / slices_x) as u64); // fragment_y_offset
                write_picture_body(&mut w, picture, picture_number, *count, *start_index)?;
            }
            DataUnitSpec::EndOfSequence => {}
            DataUnitSpec::Auxiliary(bytes) | DataUnitSpec::Padding(bytes) => {
                for &b in bytes {
                    write_uint_lit(&mut w, b as u64, 1);
                }
            }
        }

        w.byte_align();
    }

    let mut bytes = w.into_bytes();
    for (i, &start) in unit_starts.iter().enumerate() {
        let next_offset = if i + 1 < unit_starts.len() {
            (unit_starts[i + 1] - start) as u32
        } else {
            0
        };
        let prev_offset = if i == 0 { 0 } else { (start - unit_starts[i - 1]) as u32 };
        patch_u32(&mut bytes, next_offset_patches[i], next_offset);
        patch_u32(&mut bytes, prev_offset_patches[i], prev_offset);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_stream;
    use crate::tables::constants::WaveletFilter;
    use crate::tables::quant_matrices::{default_quant_matrix, QuantMatrixKey};
    use std::collections::HashMap;

    fn flat_band(width: u32, height: u32, value: i64) -> Vec<Vec<i64>> {
        vec![vec![value; width as usize]; height as usize]
    }

    fn zero_coefficients(width: u32, height: u32, dwt_depth: u32, dwt_depth_ho: u32) -> CoeffStorage {
        let padded_w = padded_size(width, dwt_depth_ho + dwt_depth);
        let padded_h = padded_size(height, dwt_depth);
        let mut m = HashMap::new();
        for (level, orientation) in band_read_order(dwt_depth, dwt_depth_ho) {
            let (bw, bh) = subband_dimensions(padded_w, padded_h, dwt_depth, dwt_depth_ho, level);
            m.insert((level, orientation), flat_band(bw, bh, 0));
        }
        m
    }

    #[test]
    fn minimal_sequence_round_trips_through_the_decoder() {
        let dwt_depth = 1;
        let key = QuantMatrixKey {
            wavelet_index: WaveletFilter::HaarNoShift,
            wavelet_index_ho: WaveletFilter::HaarNoShift,
            dwt_depth,
            dwt_depth_ho: 0,
        };
        assert!(
            default_quant_matrix(&key).is_some(),
            "test relies on a default quant matrix existing for Haar/depth 1"
        );

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
                DataUnitSpec::SequenceHeader(SequenceHeaderSpec {
                    major_version: 2,
                    minor_version: 0,
                    profile: 3,
                    level: 0,
                    base_video_format: 4, // CIF; overridden in full by custom_source_parameters below
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
        };

        let bytes = write_sequence(&spec).unwrap();

        let mut pictures = 0;
        decode_stream(&bytes, &mut |_pic: &crate::picture::Picture, _vp: &crate::picture::VideoParameters| {
            pictures += 1;
        })
        .unwrap();
        assert_eq!(pictures, 1);
    }

    #[test]
    fn spec_without_end_of_sequence_is_rejected() {
        let spec = SequenceSpec {
            data_units: vec![DataUnitSpec::Auxiliary(vec![0xAA])],
        };
        let err = write_sequence(&spec).unwrap_err();
        assert!(matches!(err, Vc2Error::Generator(_)));
    }
}
