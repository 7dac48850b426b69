//! Sequence header (4.E): `parse_parameters`, base video format lookup and
//! the source-parameters override cascade.

use crate::bitreader::BitReader;
use crate::conformance::assert_level_constraint;
use crate::error::{Result, Vc2Error};
use crate::state::DecoderState;
use crate::tables::constants::{BaseVideoFormat, PictureCodingMode, Profile};
use crate::tables::level_constraints::is_known_level;
use crate::tables::presets::{
    BaseVideoFormatParameters, BASE_VIDEO_FORMAT_PARAMETERS, PRESET_COLOR_MATRICES,
    PRESET_COLOR_PRIMARIES, PRESET_COLOR_SPECS, PRESET_FRAME_RATES, PRESET_PIXEL_ASPECT_RATIOS,
    PRESET_SIGNAL_RANGES, PRESET_TRANSFER_FUNCTIONS,
};
use crate::valueset::Value;
use crate::vlc::read_uint;

/// Live, non-persisted override state produced by the source-parameters
/// cascade. `custom_*_flag` values control only the parse cascade (SPEC_FULL
/// §"Config objects"); they are not stored on [`DecoderState`] afterwards.
#[derive(Debug, Clone, Default)]
pub struct SourceParameters {
    pub frame_width: u32,
    pub frame_height: u32,
    pub color_diff_format_index: u32,
    pub source_sampling: u32,
    pub top_field_first: bool,
    pub frame_rate_numerator: u64,
    pub frame_rate_denominator: u64,
    pub pixel_aspect_ratio_numerator: u64,
    pub pixel_aspect_ratio_denominator: u64,
    pub clean_width: u32,
    pub clean_height: u32,
    pub left_offset: u32,
    pub top_offset: u32,
    pub luma_offset: u32,
    pub luma_excursion: u32,
    pub color_diff_offset: u32,
    pub color_diff_excursion: u32,
    pub color_primaries_index: u32,
    pub color_matrix_index: u32,
    pub transfer_function_index: u32,
}

fn base_video_format_defaults(p: &BaseVideoFormatParameters) -> SourceParameters {
    SourceParameters {
        frame_width: p.frame_width,
        frame_height: p.frame_height,
        color_diff_format_index: p.color_diff_format_index,
        source_sampling: p.source_sampling,
        top_field_first: p.top_field_first,
        frame_rate_numerator: PRESET_FRAME_RATES[p.frame_rate_index as usize].numerator,
        frame_rate_denominator: PRESET_FRAME_RATES[p.frame_rate_index as usize].denominator,
        pixel_aspect_ratio_numerator: PRESET_PIXEL_ASPECT_RATIOS[p.pixel_aspect_ratio_index as usize]
            .numerator,
        pixel_aspect_ratio_denominator: PRESET_PIXEL_ASPECT_RATIOS
            [p.pixel_aspect_ratio_index as usize]
            .denominator,
        clean_width: p.clean_width,
        clean_height: p.clean_height,
        left_offset: p.left_offset,
        top_offset: p.top_offset,
        luma_offset: PRESET_SIGNAL_RANGES[p.signal_range_index as usize].luma_offset,
        luma_excursion: PRESET_SIGNAL_RANGES[p.signal_range_index as usize].luma_excursion,
        color_diff_offset: PRESET_SIGNAL_RANGES[p.signal_range_index as usize].color_diff_offset,
        color_diff_excursion: PRESET_SIGNAL_RANGES[p.signal_range_index as usize]
            .color_diff_excursion,
        color_primaries_index: PRESET_COLOR_SPECS[p.color_spec_index as usize].color_primaries_index,
        color_matrix_index: PRESET_COLOR_SPECS[p.color_spec_index as usize].color_matrix_index,
        transfer_function_index: PRESET_COLOR_SPECS[p.color_spec_index as usize]
            .transfer_function_index,
    }
}

/// `parse_parameters` (4.E): `major_version`, `minor_version`, `profile`,
/// `level`, all UInt. `profile` and `level` are each checked against their
/// enum of legal values before being fed to the level-constrained
/// accumulator.
fn parse_parameters(r: &mut BitReader, state: &mut DecoderState, unit_offset: u64) -> Result<()> {
    state.major_version = read_uint(r) as u32;
    state.minor_version = read_uint(r) as u32;

    let offset = r.tell();
    state.profile = read_uint(r) as u32;
    Profile::from_u32(state.profile).ok_or(Vc2Error::BadProfile {
        offset,
        value: state.profile,
    })?;
    assert_level_constraint(state, offset, "profile", Value::Int(state.profile as i64))?;

    let offset = r.tell();
    state.level = read_uint(r) as u32;
    if !is_known_level(state.level) {
        return Err(Vc2Error::BadLevel {
            offset,
            value: state.level,
        });
    }
    assert_level_constraint(state, offset, "level", Value::Int(state.level as i64))?;

    let _ = unit_offset;
    Ok(())
}

fn read_custom_frame_size(r: &mut BitReader, sp: &mut SourceParameters) {
    if crate::vlc::read_bool(r) {
        sp.frame_width = read_uint(r) as u32;
        sp.frame_height = read_uint(r) as u32;
    }
}

fn read_custom_color_diff_sampling_format(r: &mut BitReader, sp: &mut SourceParameters) {
    if crate::vlc::read_bool(r) {
        sp.color_diff_format_index = read_uint(r) as u32;
    }
}

fn read_custom_scan_format(r: &mut BitReader, sp: &mut SourceParameters) {
    if crate::vlc::read_bool(r) {
        sp.source_sampling = read_uint(r) as u32;
    }
}

fn read_custom_frame_rate(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if !crate::vlc::read_bool(r) {
        return Ok(());
    }
    let index = read_uint(r) as usize;
    if index == 0 {
        sp.frame_rate_numerator = read_uint(r);
        sp.frame_rate_denominator = read_uint(r);
    } else {
        let preset = PRESET_FRAME_RATES
            .get(index)
            .ok_or_else(|| Vc2Error::Generator(format!("bad frame rate preset index {index}")))?;
        sp.frame_rate_numerator = preset.numerator;
        sp.frame_rate_denominator = preset.denominator;
    }
    Ok(())
}

fn read_custom_pixel_aspect_ratio(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if !crate::vlc::read_bool(r) {
        return Ok(());
    }
    let index = read_uint(r) as usize;
    if index == 0 {
        sp.pixel_aspect_ratio_numerator = read_uint(r);
        sp.pixel_aspect_ratio_denominator = read_uint(r);
    } else {
        let preset = PRESET_PIXEL_ASPECT_RATIOS.get(index).ok_or_else(|| {
            Vc2Error::Generator(format!("bad pixel aspect ratio preset index {index}"))
        })?;
        sp.pixel_aspect_ratio_numerator = preset.numerator;
        sp.pixel_aspect_ratio_denominator = preset.denominator;
    }
    Ok(())
}

fn read_custom_clean_area(r: &mut BitReader, sp: &mut SourceParameters) {
    if crate::vlc::read_bool(r) {
        sp.clean_width = read_uint(r) as u32;
        sp.clean_height = read_uint(r) as u32;
        sp.left_offset = read_uint(r) as u32;
        sp.top_offset = read_uint(r) as u32;
    }
}

fn read_custom_signal_range(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if !crate::vlc::read_bool(r) {
        return Ok(());
    }
    let index = read_uint(r) as usize;
    if index == 0 {
        sp.luma_offset = read_uint(r) as u32;
        sp.luma_excursion = read_uint(r) as u32;
        sp.color_diff_offset = read_uint(r) as u32;
        sp.color_diff_excursion = read_uint(r) as u32;
    } else {
        let preset = PRESET_SIGNAL_RANGES
            .get(index)
            .ok_or_else(|| Vc2Error::Generator(format!("bad signal range preset index {index}")))?;
        sp.luma_offset = preset.luma_offset;
        sp.luma_excursion = preset.luma_excursion;
        sp.color_diff_offset = preset.color_diff_offset;
        sp.color_diff_excursion = preset.color_diff_excursion;
    }
    Ok(())
}

fn read_custom_color_spec(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if !crate::vlc::read_bool(r) {
        return Ok(());
    }
    let index = read_uint(r) as usize;
    if index == 0 {
        read_color_primaries(r, sp)?;
        read_color_matrix(r, sp)?;
        read_transfer_function(r, sp)?;
    } else {
        let preset = PRESET_COLOR_SPECS
            .get(index)
            .ok_or_else(|| Vc2Error::Generator(format!("bad colour spec preset index {index}")))?;
        sp.color_primaries_index = preset.color_primaries_index;
        sp.color_matrix_index = preset.color_matrix_index;
        sp.transfer_function_index = preset.transfer_function_index;
    }
    Ok(())
}

fn read_color_primaries(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if crate::vlc::read_bool(r) {
        let index = read_uint(r) as usize;
        if index >= PRESET_COLOR_PRIMARIES.len() {
            return Err(Vc2Error::Generator(format!(
                "bad colour primaries preset index {index}"
            )));
        }
        sp.color_primaries_index = index as u32;
    }
    Ok(())
}

fn read_color_matrix(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if crate::vlc::read_bool(r) {
        let index = read_uint(r) as usize;
        if index >= PRESET_COLOR_MATRICES.len() {
            return Err(Vc2Error::Generator(format!(
                "bad colour matrix preset index {index}"
            )));
        }
        sp.color_matrix_index = index as u32;
    }
    Ok(())
}

fn read_transfer_function(r: &mut BitReader, sp: &mut SourceParameters) -> Result<()> {
    if crate::vlc::read_bool(r) {
        let index = read_uint(r) as usize;
        if index >= PRESET_TRANSFER_FUNCTIONS.len() {
            return Err(Vc2Error::Generator(format!(
                "bad transfer function preset index {index}"
            )));
        }
        sp.transfer_function_index = index as u32;
    }
    Ok(())
}

/// The full override cascade (4.E): frame-size, colour-diff sampling, scan
/// format, frame rate, pixel aspect ratio, clean area, signal range, colour
/// spec, each gated by its own `custom_..._flag`.
fn source_parameters(r: &mut BitReader, base: &BaseVideoFormatParameters) -> Result<SourceParameters> {
    let mut sp = base_video_format_defaults(base);
    read_custom_frame_size(r, &mut sp);
    read_custom_color_diff_sampling_format(r, &mut sp);
    read_custom_scan_format(r, &mut sp);
    read_custom_frame_rate(r, &mut sp)?;
    read_custom_pixel_aspect_ratio(r, &mut sp)?;
    read_custom_clean_area(r, &mut sp);
    read_custom_signal_range(r, &mut sp)?;
    read_custom_color_spec(r, &mut sp)?;
    Ok(sp)
}

/// Full sequence header (4.E): parse parameters, base video format index,
/// the source-parameters cascade, picture coding mode. Mutates `state` with
/// every field a decoded picture depends on; resets per-sequence-header
/// storage first.
pub fn sequence_header(r: &mut BitReader, state: &mut DecoderState, unit_offset: u64) -> Result<()> {
    state.reset_for_new_sequence_header();

    parse_parameters(r, state, unit_offset)?;

    let base_format_offset = r.tell();
    let base_format_index = read_uint(r) as u32;
    let base_format = BaseVideoFormat::from_u32(base_format_index).ok_or(Vc2Error::BadBaseVideoFormat {
        offset: base_format_offset,
        value: base_format_index,
    })?;
    let base_params = &BASE_VIDEO_FORMAT_PARAMETERS[base_format as usize];

    let sp = source_parameters(r, base_params)?;
    state.frame_width = sp.frame_width;
    state.frame_height = sp.frame_height;
    state.top_field_first = sp.top_field_first;
    state.luma_width = sp.frame_width;
    state.luma_height = sp.frame_height;
    let (cdw, cdh) = color_diff_dimensions(sp.frame_width, sp.frame_height, sp.color_diff_format_index);
    state.color_diff_width = cdw;
    state.color_diff_height = cdh;
    state.luma_depth = bit_depth(sp.luma_excursion);
    state.color_diff_depth = bit_depth(sp.color_diff_excursion);

    let coding_mode_offset = r.tell();
    let coding_mode_index = read_uint(r) as u32;
    let coding_mode = PictureCodingMode::from_u32(coding_mode_index).ok_or(Vc2Error::BadPictureCodingMode {
        offset: coding_mode_offset,
        value: coding_mode_index,
    })?;
    state.conformance.picture_coding_mode = Some(coding_mode);

    Ok(())
}

/// `luma_excursion` determines the bit depth as `ceil(log2(excursion + 1))`.
fn bit_depth(excursion: u32) -> u32 {
    (32 - (excursion + 1).leading_zeros()).max(1)
}

fn color_diff_dimensions(frame_width: u32, frame_height: u32, format_index: u32) -> (u32, u32) {
    match format_index {
        0 => (frame_width, frame_height),
        1 => (frame_width / 2, frame_height),
        2 => (frame_width / 2, frame_height / 2),
        _ => (frame_width, frame_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitwriter::BitWriter;
    use crate::vlc::{write_bool, write_uint};

    #[test]
    fn defaults_with_no_custom_overrides_use_base_format() {
        let mut w = BitWriter::new();
        write_uint(&mut w, 2); // major_version
        write_uint(&mut w, 0); // minor_version
        write_uint(&mut w, 0); // profile (low delay)
        write_uint(&mut w, 1); // level
        write_uint(&mut w, 4); // base_video_format: cif
        for _ in 0..8 {
            write_bool(&mut w, false); // no custom overrides
        }
        write_uint(&mut w, 0); // picture_coding_mode: frames
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        let mut state = DecoderState::new();
        sequence_header(&mut r, &mut state, 0).unwrap();

        assert_eq!(state.luma_width, 352);
        assert_eq!(state.luma_height, 288);
        assert_eq!(state.luma_depth, 8);
        assert_eq!(state.profile, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn bad_base_video_format_index_is_rejected() {
        let mut w = BitWriter::new();
        write_uint(&mut w, 2);
        write_uint(&mut w, 0);
        write_uint(&mut w, 0);
        write_uint(&mut w, 1);
        write_uint(&mut w, 99); // out of range
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        let mut state = DecoderState::new();
        let err = sequence_header(&mut r, &mut state, 0).unwrap_err();
        assert!(matches!(err, Vc2Error::BadBaseVideoFormat { .. }));
    }
}
