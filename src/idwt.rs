//! Inverse (and, supplemented, forward) discrete wavelet transform engine
//! built from lifting filters (15.4): horizontal/vertical synthesis and
//! analysis stages composed into the full 2D `idwt`/`dwt`.

use crate::tables::constants::LiftingFilterType;
use crate::tables::lifting::{LiftingFilterParameters, LiftingStage};

fn clamp(pos: i64, lo: i64, hi: i64) -> usize {
    pos.clamp(lo, hi) as usize
}

/// Apply one wavelet's full stage list to a 1D array in place, synthesis
/// (inverse) direction.
pub fn oned_synthesis(a: &mut [i64], wavelet: &LiftingFilterParameters) {
    for stage in &wavelet.stages {
        apply_stage(a, stage, false);
    }
}

/// The complement analysis (forward) filter: stage order reversed, each
/// stage's add/subtract polarity inverted. Not present in the reference
/// decoder (which never needs a forward transform); derived mechanically
/// per the round-trip property this crate tests.
pub fn oned_analysis(a: &mut [i64], wavelet: &LiftingFilterParameters) {
    for stage in wavelet.stages.iter().rev() {
        apply_stage(a, stage, true);
    }
}

fn apply_stage(a: &mut [i64], stage: &LiftingStage, invert: bool) {
    let len = a.len();
    if len < 2 {
        return;
    }
    let update_even = matches!(
        stage.lift_type,
        LiftingFilterType::EvenAddOdd | LiftingFilterType::EvenSubtractOdd
    );
    let subtract = matches!(
        stage.lift_type,
        LiftingFilterType::EvenSubtractOdd | LiftingFilterType::OddSubtractEven
    );
    // Inverting for the analysis direction flips the sign of the update.
    let subtract = subtract ^ invert;

    let half = len / 2;
    for n in 0..half {
        let mut acc: i64 = 0;
        for (k, &tap) in stage.taps.iter().enumerate() {
            let i = stage.offset + k as i32;
            let pos = if update_even {
                clamp(2 * (n as i64 + i as i64) - 1, 1, len as i64 - 1)
            } else {
                clamp(2 * (n as i64 + i as i64), 0, len as i64 - 2)
            };
            acc += tap * a[pos];
        }
        if stage.scale_shift > 0 {
            acc += 1 << (stage.scale_shift - 1);
        }
        acc >>= stage.scale_shift;

        let target = if update_even { 2 * n } else { 2 * n + 1 };
        if subtract {
            a[target] -= acc;
        } else {
            a[target] += acc;
        }
    }
}

fn final_shift(v: i64, shift: u32) -> i64 {
    if shift == 0 {
        v
    } else {
        (v + (1 << (shift - 1))) >> shift
    }
}

pub type Band = Vec<Vec<i64>>;

/// Horizontal-only synthesis (15.4.2): interleave `l`/`h` half-width bands,
/// synthesise each row, apply the final bit shift.
pub fn h_synthesis(l: &Band, h: &Band, wavelet: &LiftingFilterParameters) -> Band {
    let height = l.len();
    let width = l[0].len() + h[0].len();
    let mut out = vec![vec![0i64; width]; height];

    for y in 0..height {
        let mut row = vec![0i64; width];
        for x in 0..l[y].len() {
            row[2 * x] = l[y][x];
        }
        for x in 0..h[y].len() {
            row[2 * x + 1] = h[y][x];
        }
        oned_synthesis(&mut row, wavelet);
        for x in 0..width {
            out[y][x] = final_shift(row[x], wavelet.filter_bit_shift);
        }
    }
    out
}

/// 2D synthesis (15.4.3): interleave LL/HL/LH/HH quarter-sized bands,
/// synthesise down columns with the vertical wavelet then across rows with
/// the horizontal wavelet, apply the final bit shift.
pub fn vh_synthesis(
    ll: &Band,
    hl: &Band,
    lh: &Band,
    hh: &Band,
    vertical: &LiftingFilterParameters,
    horizontal: &LiftingFilterParameters,
) -> Band {
    let bh = ll.len();
    let bw = ll[0].len();
    let height = bh * 2;
    let width = bw * 2;
    let mut synth = vec![vec![0i64; width]; height];

    for y in 0..bh {
        for x in 0..bw {
            synth[2 * y][2 * x] = ll[y][x];
            synth[2 * y][2 * x + 1] = hl[y][x];
            synth[2 * y + 1][2 * x] = lh[y][x];
            synth[2 * y + 1][2 * x + 1] = hh[y][x];
        }
    }

    for x in 0..width {
        let mut col: Vec<i64> = (0..height).map(|y| synth[y][x]).collect();
        oned_synthesis(&mut col, vertical);
        for y in 0..height {
            synth[y][x] = col[y];
        }
    }

    for y in 0..height {
        oned_synthesis(&mut synth[y], horizontal);
        for x in 0..width {
            synth[y][x] = final_shift(synth[y][x], horizontal.filter_bit_shift);
        }
    }

    synth
}

/// Forward counterparts, splitting a band in two instead of interleaving.
pub fn h_analysis(band: &Band, wavelet: &LiftingFilterParameters) -> (Band, Band) {
    let height = band.len();
    let width = band[0].len();
    let mut l = vec![vec![0i64; width / 2]; height];
    let mut h = vec![vec![0i64; width / 2]; height];
    for y in 0..height {
        let mut row = band[y].clone();
        oned_analysis(&mut row, wavelet);
        for x in 0..width / 2 {
            l[y][x] = row[2 * x];
            h[y][x] = row[2 * x + 1];
        }
    }
    (l, h)
}

pub fn vh_analysis(
    band: &Band,
    vertical: &LiftingFilterParameters,
    horizontal: &LiftingFilterParameters,
) -> (Band, Band, Band, Band) {
    let height = band.len();
    let width = band[0].len();
    let mut work = band.clone();

    for y in 0..height {
        oned_analysis(&mut work[y], horizontal);
    }
    for x in 0..width {
        let mut col: Vec<i64> = (0..height).map(|y| work[y][x]).collect();
        oned_analysis(&mut col, vertical);
        for y in 0..height {
            work[y][x] = col[y];
        }
    }

    let bh = height / 2;
    let bw = width / 2;
    let mut ll = vec![vec![0i64; bw]; bh];
    let mut hl = vec![vec![0i64; bw]; bh];
    let mut lh = vec![vec![0i64; bw]; bh];
    let mut hh = vec![vec![0i64; bw]; bh];
    for y in 0..bh {
        for x in 0..bw {
            ll[y][x] = work[2 * y][2 * x];
            hl[y][x] = work[2 * y][2 * x + 1];
            lh[y][x] = work[2 * y + 1][2 * x];
            hh[y][x] = work[2 * y + 1][2 * x + 1];
        }
    }
    (ll, hl, lh, hh)
}

use crate::state::CoeffStorage;
use crate::tables::constants::Orientation;
use std::collections::HashMap;

/// Full inverse transform (15.4.1) for one component: start from the DC
/// band, apply horizontal-only synthesis for the horizontal-only levels,
/// then 2D synthesis for the remaining levels.
pub fn idwt(
    coeffs: &CoeffStorage,
    dwt_depth: u32,
    dwt_depth_ho: u32,
    wavelet: &LiftingFilterParameters,
    wavelet_ho: &LiftingFilterParameters,
) -> Band {
    let dc_orientation = if dwt_depth_ho > 0 {
        Orientation::L
    } else {
        Orientation::LL
    };
    let mut dc = coeffs.get(&(0, dc_orientation)).expect("DC band present").clone();

    for level in 1..=dwt_depth_ho {
        let h = coeffs.get(&(level, Orientation::H)).expect("H band present");
        dc = h_synthesis(&dc, h, wavelet_ho);
    }

    for level in (dwt_depth_ho + 1)..=(dwt_depth_ho + dwt_depth) {
        let hl = coeffs.get(&(level, Orientation::HL)).expect("HL band present");
        let lh = coeffs.get(&(level, Orientation::LH)).expect("LH band present");
        let hh = coeffs.get(&(level, Orientation::HH)).expect("HH band present");
        dc = vh_synthesis(&dc, hl, lh, hh, wavelet, wavelet_ho);
    }

    dc
}

/// Forward transform, the complement of [`idwt`]: needed only for the
/// `idwt(dwt(x)) == x` test property and for generating test pictures.
pub fn dwt(
    picture: &Band,
    dwt_depth: u32,
    dwt_depth_ho: u32,
    wavelet: &LiftingFilterParameters,
    wavelet_ho: &LiftingFilterParameters,
) -> CoeffStorage {
    let mut out = HashMap::new();
    let mut dc = picture.clone();

    for level in ((dwt_depth_ho + 1)..=(dwt_depth_ho + dwt_depth)).rev() {
        let (ll, hl, lh, hh) = vh_analysis(&dc, wavelet, wavelet_ho);
        out.insert((level, Orientation::HL), hl);
        out.insert((level, Orientation::LH), lh);
        out.insert((level, Orientation::HH), hh);
        dc = ll;
    }

    for level in (1..=dwt_depth_ho).rev() {
        let (l, h) = h_analysis(&dc, wavelet_ho);
        out.insert((level, Orientation::H), h);
        dc = l;
    }

    let dc_orientation = if dwt_depth_ho > 0 {
        Orientation::L
    } else {
        Orientation::LL
    };
    out.insert((0, dc_orientation), dc);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::constants::WaveletFilter;
    use crate::tables::lifting::LIFTING_FILTERS;

    #[test]
    fn haar_no_shift_lifting_round_trips() {
        let wavelet = LIFTING_FILTERS.get(&WaveletFilter::HaarNoShift).unwrap();
        let original = vec![3i64, -2, 7, 1, -5, 9, 0, 4];
        let mut a = original.clone();
        oned_analysis(&mut a, wavelet);
        oned_synthesis(&mut a, wavelet);
        assert_eq!(a, original);
    }

    #[test]
    fn haar_no_shift_idwt_identity_on_8x8_picture() {
        let wavelet = LIFTING_FILTERS.get(&WaveletFilter::HaarNoShift).unwrap().clone();
        let picture: Band = (0..8)
            .map(|y| (0..8).map(|x| ((y * 7 + x * 13) % 23) as i64 - 11).collect())
            .collect();

        let coeffs = dwt(&picture, 1, 2, &wavelet, &wavelet);
        let reconstructed = idwt(&coeffs, 1, 2, &wavelet, &wavelet);
        assert_eq!(reconstructed, picture);
    }

    #[test]
    fn le_gall_5_3_lifting_round_trips() {
        let wavelet = LIFTING_FILTERS.get(&WaveletFilter::LeGall5_3).unwrap();
        let original = vec![10i64, 20, -5, 0, 3, 7, -8, 2];
        let mut a = original.clone();
        oned_analysis(&mut a, wavelet);
        oned_synthesis(&mut a, wavelet);
        assert_eq!(a, original);
    }
}
