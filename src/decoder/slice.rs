//! Picture and fragment decoding (13.5): picture headers, LD/HQ slice
//! unpacking with exact byte-budget arithmetic, DC prediction, and picture
//! finalisation.

use super::transform::{self, band_read_order, padded_size, subband_dimensions};
use super::PictureSink;
use crate::bitreader::{BitReader, BitSource};
use crate::conformance::assert_picture_number_incremented_as_expected;
use crate::error::Result;
use crate::idwt::idwt;
use crate::picture::{finalise_component, Picture, VideoParameters};
use crate::quant::inverse_quant;
use crate::state::{DecoderState, Picture2D};
use crate::tables::constants::{Orientation, ParseCode, WaveletFilter};
use crate::tables::lifting::LIFTING_FILTERS;
use crate::vlc::{read_nbits, read_sint, read_uint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Y,
    C1,
    C2,
}

fn component_size(state: &DecoderState, component: Component) -> (u32, u32) {
    match component {
        Component::Y => (state.luma_width, state.luma_height),
        Component::C1 | Component::C2 => (state.color_diff_width, state.color_diff_height),
    }
}

/// `slice_left/right/top/bottom`: the band rectangle owned by slice `(sx,
/// sy)`, computed by integer division against the slice grid.
fn slice_bounds(band_w: u32, band_h: u32, slices_x: u32, slices_y: u32, sx: u32, sy: u32) -> (u32, u32, u32, u32) {
    let left = band_w * sx / slices_x;
    let right = band_w * (sx + 1) / slices_x;
    let top = band_h * sy / slices_y;
    let bottom = band_h * (sy + 1) / slices_y;
    (left, right, top, bottom)
}

fn decode_component_bands<B: BitSource>(
    r: &mut B,
    state: &mut DecoderState,
    component: Component,
    sx: u32,
    sy: u32,
    qindex: u32,
) {
    let (comp_w, comp_h) = component_size(state, component);
    let padded_w = padded_size(comp_w, state.dwt_depth_ho + state.dwt_depth);
    let padded_h = padded_size(comp_h, state.dwt_depth);
    let slices_x = state.slice_params.slices_x;
    let slices_y = state.slice_params.slices_y;
    let dwt_depth = state.dwt_depth;
    let dwt_depth_ho = state.dwt_depth_ho;
    let quant_matrix = state.quant_matrix.clone();

    for (level, orientation) in band_read_order(dwt_depth, dwt_depth_ho) {
        let (bw, bh) = subband_dimensions(padded_w, padded_h, dwt_depth, dwt_depth_ho, level);
        let (left, right, top, bottom) = slice_bounds(bw, bh, slices_x, slices_y, sx, sy);
        let quant_index = (qindex as i64 - *quant_matrix.get(&(level, orientation)).unwrap_or(&0) as i64)
            .max(0) as u32;
        state.quantizer.insert((level, orientation), quant_index);

        let band = match component {
            Component::Y => state
                .y_transform
                .entry((level, orientation))
                .or_insert_with(|| vec![vec![0i64; bw as usize]; bh as usize]),
            Component::C1 => state
                .c1_transform
                .entry((level, orientation))
                .or_insert_with(|| vec![vec![0i64; bw as usize]; bh as usize]),
            Component::C2 => state
                .c2_transform
                .entry((level, orientation))
                .or_insert_with(|| vec![vec![0i64; bw as usize]; bh as usize]),
        };

        for y in top..bottom {
            for x in left..right {
                let value = read_sint(r);
                band[y as usize][x as usize] = inverse_quant(value, quant_index);
            }
        }
    }
}

/// LD slices interleave C1/C2 coefficients sample-by-sample within a shared
/// bounded block.
fn decode_interleaved_color_diff_bands<B: BitSource>(
    r: &mut B,
    state: &mut DecoderState,
    sx: u32,
    sy: u32,
    qindex: u32,
) {
    let (comp_w, comp_h) = component_size(state, Component::C1);
    let padded_w = padded_size(comp_w, state.dwt_depth_ho + state.dwt_depth);
    let padded_h = padded_size(comp_h, state.dwt_depth);
    let slices_x = state.slice_params.slices_x;
    let slices_y = state.slice_params.slices_y;
    let dwt_depth = state.dwt_depth;
    let dwt_depth_ho = state.dwt_depth_ho;
    let quant_matrix = state.quant_matrix.clone();

    for (level, orientation) in band_read_order(dwt_depth, dwt_depth_ho) {
        let (bw, bh) = subband_dimensions(padded_w, padded_h, dwt_depth, dwt_depth_ho, level);
        let (left, right, top, bottom) = slice_bounds(bw, bh, slices_x, slices_y, sx, sy);
        let quant_index = (qindex as i64 - *quant_matrix.get(&(level, orientation)).unwrap_or(&0) as i64)
            .max(0) as u32;
        state.quantizer.insert((level, orientation), quant_index);

        let c1_band = state
            .c1_transform
            .entry((level, orientation))
            .or_insert_with(|| vec![vec![0i64; bw as usize]; bh as usize]);
        let c2_band = state
            .c2_transform
            .entry((level, orientation))
            .or_insert_with(|| vec![vec![0i64; bw as usize]; bh as usize]);

        for y in top..bottom {
            for x in left..right {
                let v1 = read_sint(r);
                c1_band[y as usize][x as usize] = inverse_quant(v1, quant_index);
                let v2 = read_sint(r);
                c2_band[y as usize][x as usize] = inverse_quant(v2, quant_index);
            }
        }
    }
}

fn intlog2(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    }
}

fn slice_bytes_for(state: &DecoderState, sx: u32, sy: u32) -> u64 {
    let slices_x = state.slice_params.slices_x as u64;
    let slice_number = sy as u64 * slices_x + sx as u64;
    let num = state.slice_params.slice_bytes_numerator as u64;
    let den = state.slice_params.slice_bytes_denominator as u64;
    ((slice_number + 1) * num) / den - (slice_number * num) / den
}

/// LD slice (13.5.3): byte budget `slice_bytes`, a bounded luma block sized
/// by the read-out `slice_y_length`, then a bounded interleaved-colour-diff
/// block sized by whatever remains of the slice's budget.
fn ld_slice(r: &mut BitReader, state: &mut DecoderState, sx: u32, sy: u32) -> Result<()> {
    let total_bits = slice_bytes_for(state, sx, sy) * 8;

    let qindex = read_nbits(r, 7) as u32;
    let length_bits = intlog2(total_bits.saturating_sub(7));
    let slice_y_length = read_nbits(r, length_bits);
    let remaining_bits = total_bits.saturating_sub(7).saturating_sub(length_bits as u64);
    let c_bits = remaining_bits.saturating_sub(slice_y_length);

    {
        let mut yr = r.bounded(slice_y_length);
        decode_component_bands(&mut yr, state, Component::Y, sx, sy, qindex);
        yr.flush_inputb();
    }
    {
        let mut cr = r.bounded(c_bits);
        decode_interleaved_color_diff_bands(&mut cr, state, sx, sy, qindex);
        cr.flush_inputb();
    }
    Ok(())
}

/// HQ slice (13.5.4): a raw (ignored) prefix, a 1-byte `qindex`, then each
/// component in its own bounded block sized by a 1-byte scaled length.
fn hq_slice(r: &mut BitReader, state: &mut DecoderState, sx: u32, sy: u32) -> Result<()> {
    for _ in 0..state.slice_params.slice_prefix_bytes {
        read_nbits(r, 8);
    }
    let qindex = read_nbits(r, 8) as u32;
    for component in [Component::Y, Component::C1, Component::C2] {
        let length = read_nbits(r, 8) as u64;
        let n_bits = state.slice_params.slice_size_scaler as u64 * length * 8;
        let mut br = r.bounded(n_bits);
        decode_component_bands(&mut br, state, component, sx, sy, qindex);
        br.flush_inputb();
    }
    Ok(())
}

/// Decode `count` slices starting at linear slice index `start_index`,
/// wrapping within the `slices_x * slices_y` grid (fragment resumption).
fn decode_slices(r: &mut BitReader, state: &mut DecoderState, code: ParseCode, start_index: u32, count: u32) -> Result<()> {
    let slices_x = state.slice_params.slices_x;
    let total = slices_x * state.slice_params.slices_y;
    let is_low_delay = code.is_ld_picture() || code.is_ld_fragment();
    for i in 0..count {
        let linear = (start_index + i) % total;
        let sx = linear % slices_x;
        let sy = linear / slices_x;
        if is_low_delay {
            ld_slice(r, state, sx, sy)?;
        } else {
            hq_slice(r, state, sx, sy)?;
        }
    }
    Ok(())
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// DC prediction (13.4): `band[y][x] += predictor(x, y)`, where the
/// predictor is the integer mean of the left/top-left/top neighbours when
/// all three exist, else whichever single neighbour is available, else 0.
fn dc_predict_band(band: &mut Picture2D) {
    let height = band.len();
    if height == 0 {
        return;
    }
    let width = band[0].len();
    for y in 0..height {
        for x in 0..width {
            let pred = if x > 0 && y > 0 {
                let sum = band[y][x - 1] + band[y - 1][x - 1] + band[y - 1][x];
                floor_div(sum + 1, 3)
            } else if y > 0 {
                band[y - 1][x]
            } else if x > 0 {
                band[0][x - 1]
            } else {
                0
            };
            band[y][x] += pred;
        }
    }
}

fn dc_orientation(state: &DecoderState) -> Orientation {
    if state.dwt_depth_ho > 0 {
        Orientation::L
    } else {
        Orientation::LL
    }
}

fn apply_dc_prediction(state: &mut DecoderState) {
    let key = (0, dc_orientation(state));
    if let Some(band) = state.y_transform.get_mut(&key) {
        dc_predict_band(band);
    }
    if let Some(band) = state.c1_transform.get_mut(&key) {
        dc_predict_band(band);
    }
    if let Some(band) = state.c2_transform.get_mut(&key) {
        dc_predict_band(band);
    }
}

fn finish_picture(state: &mut DecoderState, code: ParseCode, sink: &mut impl PictureSink) {
    if code.using_dc_prediction() {
        apply_dc_prediction(state);
    }

    let wavelet = LIFTING_FILTERS
        .get(&WaveletFilter::from_u32(state.wavelet_index).expect("validated in transform_parameters"))
        .expect("every enum wavelet has lifting data");
    let wavelet_ho = LIFTING_FILTERS
        .get(&WaveletFilter::from_u32(state.wavelet_index_ho).expect("validated in transform_parameters"))
        .expect("every enum wavelet has lifting data");

    let y_raw = idwt(&state.y_transform, state.dwt_depth, state.dwt_depth_ho, wavelet, wavelet_ho);
    let c1_raw = idwt(&state.c1_transform, state.dwt_depth, state.dwt_depth_ho, wavelet, wavelet_ho);
    let c2_raw = idwt(&state.c2_transform, state.dwt_depth, state.dwt_depth_ho, wavelet, wavelet_ho);

    let y = finalise_component(&y_raw, state.luma_width, state.luma_height, state.luma_depth);
    let c1 = finalise_component(&c1_raw, state.color_diff_width, state.color_diff_height, state.color_diff_depth);
    let c2 = finalise_component(&c2_raw, state.color_diff_width, state.color_diff_height, state.color_diff_depth);

    let picture = Picture {
        y,
        c1,
        c2,
        picture_number: state.picture_number,
    };
    let video_parameters = VideoParameters {
        frame_width: state.frame_width,
        frame_height: state.frame_height,
        luma_width: state.luma_width,
        luma_height: state.luma_height,
        color_diff_width: state.color_diff_width,
        color_diff_height: state.color_diff_height,
        luma_depth: state.luma_depth,
        color_diff_depth: state.color_diff_depth,
        top_field_first: state.top_field_first,
    };
    sink.picture_decoded(&picture, &video_parameters);
}

fn fragment_parse(
    r: &mut BitReader,
    state: &mut DecoderState,
    code: ParseCode,
    unit_offset: u64,
    sink: &mut impl PictureSink,
) -> Result<()> {
    let pn_offset = r.tell();
    let picture_number = read_nbits(r, 32) as u32;
    let fragment_data_length = read_uint(r) as u32;
    let fragment_slice_count = read_uint(r) as u32;
    state.fragment.fragment_data_length = fragment_data_length;
    state.fragment.fragment_slice_count = fragment_slice_count;

    let is_low_delay = code.is_ld_fragment();

    if fragment_slice_count == 0 {
        assert_picture_number_incremented_as_expected(state, pn_offset, picture_number)?;
        state.picture_number = picture_number;
        state.y_transform.clear();
        state.c1_transform.clear();
        state.c2_transform.clear();
        state.fragment.fragment_slices_received = 0;
        state.fragment.fragmented_picture_done = false;

        transform::transform_parameters(r, state, unit_offset, is_low_delay)?;
        Ok(())
    } else {
        let fragment_x_offset = read_uint(r) as u32;
        let fragment_y_offset = read_uint(r) as u32;
        state.fragment.fragment_x_offset = fragment_x_offset;
        state.fragment.fragment_y_offset = fragment_y_offset;

        let slices_x = state.slice_params.slices_x;
        let total = slices_x * state.slice_params.slices_y;
        let start_index = fragment_y_offset * slices_x + fragment_x_offset;

        decode_slices(r, state, code, start_index, fragment_slice_count)?;

        state.fragment.fragment_slices_received += fragment_slice_count;
        if state.fragment.fragment_slices_received >= total {
            state.fragment.fragmented_picture_done = true;
            finish_picture(state, code, sink);
        }
        Ok(())
    }
}

/// Entry point dispatched from [`super::parse_sequence`] for any picture or
/// picture-fragment data unit.
pub fn picture_parse(
    r: &mut BitReader,
    state: &mut DecoderState,
    code: ParseCode,
    unit_offset: u64,
    sink: &mut impl PictureSink,
) -> Result<()> {
    if code.is_fragment() {
        return fragment_parse(r, state, code, unit_offset, sink);
    }

    let pn_offset = r.tell();
    let picture_number = read_nbits(r, 32) as u32;
    assert_picture_number_incremented_as_expected(state, pn_offset, picture_number)?;
    state.picture_number = picture_number;

    state.y_transform.clear();
    state.c1_transform.clear();
    state.c2_transform.clear();

    let is_low_delay = code.is_ld_picture();
    transform::transform_parameters(r, state, unit_offset, is_low_delay)?;

    let total = state.slice_params.slices_x * state.slice_params.slices_y;
    decode_slices(r, state, code, 0, total)?;

    finish_picture(state, code, sink);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitwriter::BitWriter;
    use crate::vlc::write_sint;

    #[test]
    fn intlog2_matches_expected_bit_lengths() {
        assert_eq!(intlog2(0), 0);
        assert_eq!(intlog2(1), 0);
        assert_eq!(intlog2(2), 1);
        assert_eq!(intlog2(5), 3);
        assert_eq!(intlog2(8), 3);
        assert_eq!(intlog2(9), 4);
    }

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 3), 2);
        assert_eq!(floor_div(-7, 3), -3);
        assert_eq!(floor_div(-6, 3), -2);
    }

    #[test]
    fn slice_bytes_tie_break_sums_to_picture_budget() {
        let mut state = DecoderState::new();
        state.slice_params.slices_x = 3;
        state.slice_params.slices_y = 1;
        state.slice_params.slice_bytes_numerator = 10;
        state.slice_params.slice_bytes_denominator = 3;

        let total: u64 = (0..3).map(|sx| slice_bytes_for(&state, sx, 0)).sum();
        assert_eq!(total, 10 / 3 * 3 + if 10 % 3 != 0 { 10 % 3 } else { 0 });
        // The tie-break arithmetic guarantees an exact partition of the budget.
        assert_eq!(total, (3 * 10) / 3);
    }

    #[test]
    fn dc_prediction_matches_neighbour_rule() {
        let mut band: Picture2D = vec![vec![0, 1], vec![2, 3]];
        dc_predict_band(&mut band);
        // (0,0): no neighbours -> +0
        assert_eq!(band[0][0], 0);
        // (1,0) i.e. x=1,y=0: only left neighbour band[0][0] (original 0) -> +0
        assert_eq!(band[0][1], 1);
        // (0,1) i.e. x=0,y=1: only top neighbour band[0][0] (original 0) -> +0
        assert_eq!(band[1][0], 2);
    }

    #[test]
    fn decode_component_bands_places_values_in_band_rectangle() {
        let mut state = DecoderState::new();
        state.luma_width = 2;
        state.luma_height = 2;
        state.dwt_depth = 0;
        state.dwt_depth_ho = 0;
        state.slice_params.slices_x = 1;
        state.slice_params.slices_y = 1;

        let mut w = BitWriter::new();
        write_sint(&mut w, 10);
        write_sint(&mut w, -5);
        write_sint(&mut w, 3);
        write_sint(&mut w, 0);
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);

        decode_component_bands(&mut r, &mut state, Component::Y, 0, 0, 0);

        let band = state.y_transform.get(&(0, Orientation::LL)).unwrap();
        assert_eq!(band.len(), 2);
        assert_eq!(band[0].len(), 2);
        assert_eq!(band[0][0], inverse_quant(10, 0));
        assert_eq!(band[0][1], inverse_quant(-5, 0));
        assert_eq!(band[1][0], inverse_quant(3, 0));
        assert_eq!(band[1][1], inverse_quant(0, 0));
    }
}
