//! Lifting-filter stage definitions for each of the seven standard VC-2
//! wavelets, grounded on `vc2_conformance/tables/tables.py`'s
//! `LIFTING_FILTERS` table.

use crate::tables::constants::{LiftingFilterType, WaveletFilter};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct LiftingStage {
    pub lift_type: LiftingFilterType,
    pub scale_shift: i32,
    pub taps_len: usize,
    pub offset: i32,
    pub taps: &'static [i64],
}

#[derive(Debug, Clone)]
pub struct LiftingFilterParameters {
    pub stages: Vec<LiftingStage>,
    pub filter_bit_shift: u32,
}

fn stage(lift_type: LiftingFilterType, s: i32, l: usize, d: i32, taps: &'static [i64]) -> LiftingStage {
    LiftingStage {
        lift_type,
        scale_shift: s,
        taps_len: l,
        offset: d,
        taps,
    }
}

pub static LIFTING_FILTERS: Lazy<HashMap<WaveletFilter, LiftingFilterParameters>> = Lazy::new(|| {
    use LiftingFilterType::*;
    use WaveletFilter::*;

    let mut m = HashMap::new();

    m.insert(
        DeslauriersDubuc9_7,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 2, 2, 0, &[1, 1]),
                stage(OddAddEven, 4, 4, -1, &[-1, 9, 9, -1]),
            ],
            filter_bit_shift: 1,
        },
    );

    m.insert(
        LeGall5_3,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 2, 2, 0, &[1, 1]),
                stage(OddAddEven, 1, 2, 0, &[1, 1]),
            ],
            filter_bit_shift: 1,
        },
    );

    m.insert(
        DeslauriersDubuc13_7,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 5, 4, -1, &[-1, 9, 9, -1]),
                stage(OddAddEven, 4, 4, -1, &[-1, 9, 9, -1]),
            ],
            filter_bit_shift: 1,
        },
    );

    m.insert(
        HaarNoShift,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 1, 1, 1, &[1]),
                stage(OddAddEven, 0, 1, 0, &[1]),
            ],
            filter_bit_shift: 0,
        },
    );

    m.insert(
        HaarWithShift,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 1, 1, 1, &[1]),
                stage(OddAddEven, 0, 1, 0, &[1]),
            ],
            filter_bit_shift: 1,
        },
    );

    m.insert(
        Fidelity,
        LiftingFilterParameters {
            stages: vec![
                stage(OddAddEven, 8, 8, -3, &[-2, -10, -25, 81, 81, -25, 10, -2]),
                stage(EvenSubtractOdd, 8, 8, -3, &[-8, 21, -46, 161, 161, -46, 21, -8]),
            ],
            filter_bit_shift: 0,
        },
    );

    m.insert(
        Daubechies9_7,
        LiftingFilterParameters {
            stages: vec![
                stage(EvenSubtractOdd, 12, 2, 0, &[1817, 1817]),
                stage(OddSubtractEven, 12, 2, 0, &[3616, 3616]),
                stage(EvenAddOdd, 12, 2, 0, &[217, 217]),
                stage(OddAddEven, 12, 2, 0, &[6497, 6497]),
            ],
            filter_bit_shift: 1,
        },
    );

    m
});
