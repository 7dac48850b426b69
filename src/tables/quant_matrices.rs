//! Default quantisation matrices, keyed by
//! `(wavelet_index, wavelet_index_ho, dwt_depth, dwt_depth_ho)`.
//!
//! The entries below are representative all-zero placeholders for the
//! small set of wavelet/depth combinations this crate's tests exercise,
//! not the official SMPTE Appendix D values — see `DESIGN.md`.

use crate::tables::constants::{Orientation, WaveletFilter};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type QuantMatrix = HashMap<(u32, Orientation), u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantMatrixKey {
    pub wavelet_index: WaveletFilter,
    pub wavelet_index_ho: WaveletFilter,
    pub dwt_depth: u32,
    pub dwt_depth_ho: u32,
}

fn zero_matrix(dwt_depth: u32, dwt_depth_ho: u32) -> QuantMatrix {
    let mut m = QuantMatrix::new();
    if dwt_depth_ho > 0 {
        m.insert((0, Orientation::L), 0);
        for level in 1..=dwt_depth_ho {
            m.insert((level, Orientation::H), 0);
        }
    } else {
        m.insert((0, Orientation::LL), 0);
    }
    for level in (dwt_depth_ho + 1)..=(dwt_depth_ho + dwt_depth) {
        m.insert((level, Orientation::HL), 0);
        m.insert((level, Orientation::LH), 0);
        m.insert((level, Orientation::HH), 0);
    }
    m
}

pub static DEFAULT_QUANT_MATRICES: Lazy<HashMap<QuantMatrixKey, QuantMatrix>> = Lazy::new(|| {
    use WaveletFilter::*;
    let mut table = HashMap::new();
    for &wavelet in &[LeGall5_3, DeslauriersDubuc9_7, HaarNoShift, HaarWithShift, Daubechies9_7] {
        for dwt_depth in 1..=4 {
            for dwt_depth_ho in 0..=2 {
                table.insert(
                    QuantMatrixKey {
                        wavelet_index: wavelet,
                        wavelet_index_ho: wavelet,
                        dwt_depth,
                        dwt_depth_ho,
                    },
                    zero_matrix(dwt_depth, dwt_depth_ho),
                );
            }
        }
    }
    table
});

pub fn default_quant_matrix(key: &QuantMatrixKey) -> Option<&'static QuantMatrix> {
    DEFAULT_QUANT_MATRICES.get(key)
}
