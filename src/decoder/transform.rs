//! Transform parameters (4.E, 13.x): wavelet/depth selection, extended
//! (asymmetric) transform parameters, slice parameters, and the
//! quantisation matrix.

use crate::bitreader::BitReader;
use crate::conformance::assert_level_constraint;
use crate::error::{Offset, Result, Vc2Error};
use crate::state::DecoderState;
use crate::tables::constants::{Orientation, WaveletFilter};
use crate::tables::level_constraints::LEVEL_CONSTRAINTS;
use crate::tables::quant_matrices::{default_quant_matrix, QuantMatrix, QuantMatrixKey};
use crate::valueset::Value;
use crate::vlc::{read_bool, read_uint};
use std::collections::BTreeMap;

/// Round `dim` up to the next multiple of `2^shift`: the padded component
/// size the transform actually operates on, which `picture::remove_padding`
/// later crops back down to the declared (unpadded) dimensions.
pub fn padded_size(dim: u32, shift: u32) -> u32 {
    let unit = 1u32 << shift;
    ((dim + unit - 1) / unit) * unit
}

/// Width/height of the band at `level` (as numbered by [`band_read_order`])
/// for a component whose *padded* full-resolution size is `width x height`.
pub fn subband_dimensions(
    width: u32,
    height: u32,
    dwt_depth: u32,
    dwt_depth_ho: u32,
    level: u32,
) -> (u32, u32) {
    if level == 0 {
        (width >> (dwt_depth_ho + dwt_depth), height >> dwt_depth)
    } else if level <= dwt_depth_ho {
        (width >> (dwt_depth_ho + dwt_depth - level + 1), height >> dwt_depth)
    } else {
        let k = level - dwt_depth_ho;
        (width >> (dwt_depth - k + 1), height >> (dwt_depth - k + 1))
    }
}

/// The level0/level1.. orientation sequence a quantisation matrix (and a
/// slice's coefficient bands) are read in, per SPEC_FULL's "Quant-matrix
/// read order" / "Orientation sequence inside a slice".
pub fn band_read_order(dwt_depth: u32, dwt_depth_ho: u32) -> Vec<(u32, Orientation)> {
    let mut entries = Vec::new();
    if dwt_depth_ho > 0 {
        entries.push((0, Orientation::L));
    } else {
        entries.push((0, Orientation::LL));
    }
    for level in 1..=dwt_depth_ho {
        entries.push((level, Orientation::H));
    }
    for level in (dwt_depth_ho + 1)..=(dwt_depth_ho + dwt_depth) {
        entries.push((level, Orientation::HL));
        entries.push((level, Orientation::LH));
        entries.push((level, Orientation::HH));
    }
    entries
}

fn extended_transform_parameters(r: &mut BitReader, state: &mut DecoderState) -> Result<()> {
    if read_bool(r) {
        let offset = r.tell();
        let value = read_uint(r) as u32;
        WaveletFilter::from_u32(value).ok_or(Vc2Error::BadHOWaveletIndex { offset, value })?;
        state.wavelet_index_ho = value;
    }
    if read_bool(r) {
        state.dwt_depth_ho = read_uint(r) as u32;
    }
    Ok(())
}

fn slice_parameters(r: &mut BitReader, state: &mut DecoderState, is_low_delay: bool) -> Result<()> {
    let slices_x_offset = r.tell();
    let slices_x = read_uint(r) as u32;
    let slices_y_offset = r.tell();
    let slices_y = read_uint(r) as u32;
    if slices_x == 0 || slices_y == 0 {
        return Err(Vc2Error::ZeroSlicesInCodedPicture {
            offset: slices_x_offset,
            slices_x,
            slices_y,
        });
    }
    assert_level_constraint(state, slices_x_offset, "slices_x", Value::Int(slices_x as i64))?;
    assert_level_constraint(state, slices_y_offset, "slices_y", Value::Int(slices_y as i64))?;
    state.slice_params.slices_x = slices_x;
    state.slice_params.slices_y = slices_y;

    if is_low_delay {
        state.slice_params.slice_bytes_numerator = read_uint(r) as u32;
        let denom_offset = r.tell();
        let denom = read_uint(r) as u32;
        if denom == 0 {
            return Err(Vc2Error::SliceBytesHasZeroDenominator { offset: denom_offset });
        }
        state.slice_params.slice_bytes_denominator = denom;
    } else {
        state.slice_params.slice_prefix_bytes = read_uint(r) as u32;
        let scaler_offset = r.tell();
        let scaler = read_uint(r) as u32;
        if scaler == 0 {
            return Err(Vc2Error::SliceSizeScalerIsZero { offset: scaler_offset });
        }
        state.slice_params.slice_size_scaler = scaler;
    }
    Ok(())
}

fn assert_quant_matrix_value_allowed(state: &DecoderState, offset: Offset, value: u32) -> Result<()> {
    let mut partial: BTreeMap<String, Value> = state
        .conformance
        .level_constrained_values
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    partial.insert("quant_matrix_value".to_string(), Value::Int(value as i64));
    if !LEVEL_CONSTRAINTS.is_allowed(&partial) {
        let allowed = LEVEL_CONSTRAINTS.allowed_values_for("quant_matrix_value", &partial);
        return Err(Vc2Error::QuantisationMatrixValueNotAllowedInLevel {
            offset,
            key: "quant_matrix_value".to_string(),
            value: value as i64,
            allowed: allowed.to_string(),
        });
    }
    Ok(())
}

fn quant_matrix(r: &mut BitReader, state: &mut DecoderState, offset: u64) -> Result<()> {
    let custom = read_bool(r);
    let matrix = if custom {
        let mut m = QuantMatrix::new();
        for (level, orientation) in band_read_order(state.dwt_depth, state.dwt_depth_ho) {
            let value_offset = r.tell();
            let value = read_uint(r) as u32;
            assert_quant_matrix_value_allowed(state, value_offset, value)?;
            m.insert((level, orientation), value);
        }
        m
    } else {
        let wavelet_index = WaveletFilter::from_u32(state.wavelet_index)
            .expect("validated in transform_parameters");
        let wavelet_index_ho = WaveletFilter::from_u32(state.wavelet_index_ho)
            .expect("validated in extended_transform_parameters");
        let key = QuantMatrixKey {
            wavelet_index,
            wavelet_index_ho,
            dwt_depth: state.dwt_depth,
            dwt_depth_ho: state.dwt_depth_ho,
        };
        default_quant_matrix(&key)
            .cloned()
            .ok_or(Vc2Error::NoQuantisationMatrixAvailable {
                offset: (offset, 7),
                wavelet_index: state.wavelet_index,
                wavelet_index_ho: state.wavelet_index_ho,
                dwt_depth: state.dwt_depth,
                dwt_depth_ho: state.dwt_depth_ho,
            })?
    };
    state.quant_matrix = matrix;
    Ok(())
}

/// `transform_parameters` (4.E, 13.2): wavelet index and depth, the
/// extended-transform-parameters block when `major_version >= 3`, slice
/// parameters, and the quantisation matrix.
pub fn transform_parameters(
    r: &mut BitReader,
    state: &mut DecoderState,
    unit_offset: u64,
    is_low_delay: bool,
) -> Result<()> {
    let wavelet_offset = r.tell();
    let wavelet_index = read_uint(r) as u32;
    WaveletFilter::from_u32(wavelet_index).ok_or(Vc2Error::BadWaveletIndex {
        offset: wavelet_offset,
        value: wavelet_index,
    })?;
    assert_level_constraint(state, wavelet_offset, "wavelet_index", Value::Int(wavelet_index as i64))?;
    state.wavelet_index = wavelet_index;
    state.wavelet_index_ho = wavelet_index;

    let dwt_depth_offset = r.tell();
    state.dwt_depth = read_uint(r) as u32;
    assert_level_constraint(state, dwt_depth_offset, "dwt_depth", Value::Int(state.dwt_depth as i64))?;
    state.dwt_depth_ho = 0;

    if state.major_version >= 3 {
        extended_transform_parameters(r, state)?;
    }

    slice_parameters(r, state, is_low_delay)?;
    quant_matrix(r, state, unit_offset)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitwriter::BitWriter;
    use crate::vlc::{write_bool, write_uint};

    #[test]
    fn low_delay_transform_parameters_with_default_quant_matrix() {
        let mut w = BitWriter::new();
        write_uint(&mut w, 1); // wavelet_index: LeGall5_3
        write_uint(&mut w, 2); // dwt_depth
        write_uint(&mut w, 4); // slices_x
        write_uint(&mut w, 3); // slices_y
        write_uint(&mut w, 100); // slice_bytes_numerator
        write_uint(&mut w, 1); // slice_bytes_denominator
        write_bool(&mut w, false); // custom_quant_matrix: false
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        let mut state = DecoderState::new();
        state.major_version = 2;
        transform_parameters(&mut r, &mut state, 0, true).unwrap();

        assert_eq!(state.slice_params.slices_x, 4);
        assert_eq!(state.slice_params.slices_y, 3);
        assert!(state.quant_matrix.contains_key(&(0, Orientation::LL)));
    }

    #[test]
    fn zero_slices_is_rejected() {
        let mut w = BitWriter::new();
        write_uint(&mut w, 1);
        write_uint(&mut w, 1);
        write_uint(&mut w, 0); // slices_x = 0
        write_uint(&mut w, 1);
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        let mut state = DecoderState::new();
        let err = transform_parameters(&mut r, &mut state, 0, true).unwrap_err();
        assert!(matches!(err, Vc2Error::ZeroSlicesInCodedPicture { .. }));
    }

    #[test]
    fn band_read_order_matches_spec_sequencing() {
        let order = band_read_order(2, 1);
        assert_eq!(
            order,
            vec![
                (0, Orientation::L),
                (1, Orientation::H),
                (2, Orientation::HL),
                (2, Orientation::LH),
                (2, Orientation::HH),
                (3, Orientation::HL),
                (3, Orientation::LH),
                (3, Orientation::HH),
            ]
        );
    }
}
