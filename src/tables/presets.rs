//! Preset tables for source-parameter defaults: frame rates, pixel aspect
//! ratios, signal ranges, colour primaries/matrices/transfer functions and
//! the base video format table they compose into.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A plain rational, since nothing in this crate's stack pulls in a
/// fractions crate and these values are only ever compared/stored, never
/// arithmetically reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl Fraction {
    const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

pub static PRESET_FRAME_RATES: Lazy<Vec<Fraction>> = Lazy::new(|| {
    vec![
        Fraction::new(0, 1), // index 0 is unused; presets are 1-indexed
        Fraction::new(24000, 1001),
        Fraction::new(24, 1),
        Fraction::new(25, 1),
        Fraction::new(30000, 1001),
        Fraction::new(30, 1),
        Fraction::new(50, 1),
        Fraction::new(60000, 1001),
        Fraction::new(60, 1),
        Fraction::new(15000, 1001),
        Fraction::new(25, 2),
        Fraction::new(48, 1),
        Fraction::new(48, 1),  // fps_48 (duplicate entry, preserved from source table)
        Fraction::new(96, 1),
        Fraction::new(100, 1),
        Fraction::new(120000, 1001),
        Fraction::new(120, 1),
    ]
});

pub static PRESET_PIXEL_ASPECT_RATIOS: Lazy<Vec<Fraction>> = Lazy::new(|| {
    vec![
        Fraction::new(0, 1),
        Fraction::new(1, 1),
        Fraction::new(10, 11),
        Fraction::new(12, 11),
        Fraction::new(40, 33),
        Fraction::new(16, 11),
        Fraction::new(4, 3),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRangeParameters {
    pub luma_offset: u32,
    pub luma_excursion: u32,
    pub color_diff_offset: u32,
    pub color_diff_excursion: u32,
}

pub static PRESET_SIGNAL_RANGES: Lazy<Vec<SignalRangeParameters>> = Lazy::new(|| {
    let p = |lo, le, co, ce| SignalRangeParameters {
        luma_offset: lo,
        luma_excursion: le,
        color_diff_offset: co,
        color_diff_excursion: ce,
    };
    vec![
        p(0, 0, 0, 0), // unused index 0
        p(0, 255, 128, 255),
        p(16, 219, 128, 224),
        p(64, 876, 512, 896),
        p(256, 3504, 2048, 3584),
        p(0, 1023, 512, 1023),
        p(0, 4095, 2048, 4095),
        p(4096, 56064, 32768, 57344),
        p(0, 65535, 32768, 65535),
    ]
});

pub static PRESET_COLOR_PRIMARIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "ITU-R BT.709",
        "ITU-R BT.601",
        "ITU-R BT.601",
        "SMPTE ST 428-1",
        "ITU-R BT.2020",
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMatrixParameters {
    pub specification: &'static str,
    pub color_matrix: &'static str,
}

pub static PRESET_COLOR_MATRICES: Lazy<Vec<ColorMatrixParameters>> = Lazy::new(|| {
    let c = |s, m| ColorMatrixParameters {
        specification: s,
        color_matrix: m,
    };
    vec![
        c("ITU-R BT.709", "HDTV"),
        c("ITU-R BT.601", "SDTV"),
        c("Reversible", "RGB"),
        c("ITU-R BT.2020", "UHDTV"),
        c("SMPTE ST 428-1", "Digital Cinema"),
    ]
});

pub static PRESET_TRANSFER_FUNCTIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "TV Gamma",
        "Extended Gamut",
        "Linear",
        "D-Cinema Transfer Function",
        "PQ",
        "Hybrid Log-Gamma",
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpecification {
    pub color_primaries_index: u32,
    pub color_matrix_index: u32,
    pub transfer_function_index: u32,
}

pub static PRESET_COLOR_SPECS: Lazy<Vec<ColorSpecification>> = Lazy::new(|| {
    let s = |p, m, t| ColorSpecification {
        color_primaries_index: p,
        color_matrix_index: m,
        transfer_function_index: t,
    };
    vec![
        s(0, 0, 0), // custom, index 0
        s(1, 1, 0),
        s(1, 1, 0),
        s(1, 1, 0),
        s(4, 3, 0),
        s(4, 3, 4),
        s(4, 3, 5),
        s(3, 4, 3),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseVideoFormatParameters {
    pub frame_width: u32,
    pub frame_height: u32,
    pub color_diff_format_index: u32,
    pub source_sampling: u32,
    pub top_field_first: bool,
    pub frame_rate_index: u32,
    pub pixel_aspect_ratio_index: u32,
    pub clean_width: u32,
    pub clean_height: u32,
    pub left_offset: u32,
    pub top_offset: u32,
    pub signal_range_index: u32,
    pub color_spec_index: u32,
}

/// The 23-entry base video format table (`BASE_VIDEO_FORMAT_PARAMETERS`),
/// indexed by [`crate::tables::constants::BaseVideoFormat`].
pub static BASE_VIDEO_FORMAT_PARAMETERS: Lazy<Vec<BaseVideoFormatParameters>> = Lazy::new(|| {
    let f = |frame_width, frame_height, cdfi, ss, tff, fri, pari, cw, ch, lo, to, sri, csi| {
        BaseVideoFormatParameters {
            frame_width,
            frame_height,
            color_diff_format_index: cdfi,
            source_sampling: ss,
            top_field_first: tff,
            frame_rate_index: fri,
            pixel_aspect_ratio_index: pari,
            clean_width: cw,
            clean_height: ch,
            left_offset: lo,
            top_offset: to,
            signal_range_index: sri,
            color_spec_index: csi,
        }
    };
    vec![
        f(640, 480, 2, 0, true, 1, 1, 640, 480, 0, 0, 1, 1),    // custom_format
        f(176, 120, 2, 0, true, 9, 2, 176, 120, 0, 0, 1, 1),    // qsif525
        f(176, 144, 2, 0, true, 3, 3, 176, 144, 0, 0, 1, 1),    // qcif
        f(352, 240, 2, 0, true, 9, 2, 352, 240, 0, 0, 1, 1),    // sif525
        f(352, 288, 2, 0, true, 3, 3, 352, 288, 0, 0, 1, 1),    // cif
        f(704, 480, 2, 0, true, 9, 2, 704, 480, 0, 0, 1, 1),    // 4sif525
        f(704, 576, 2, 0, true, 3, 3, 704, 576, 0, 0, 1, 1),    // 4cif
        f(720, 480, 1, 1, false, 8, 2, 704, 480, 8, 0, 3, 1),   // sd480i_60
        f(720, 576, 1, 1, true, 3, 3, 704, 576, 8, 0, 3, 2),    // sd576i_50
        f(1280, 720, 1, 0, true, 7, 1, 1280, 720, 0, 0, 3, 1),  // hd720p_60
        f(1280, 720, 1, 0, true, 3, 1, 1280, 720, 0, 0, 3, 2),  // hd720p_50
        f(1920, 1080, 1, 1, false, 4, 1, 1920, 1080, 0, 0, 3, 1), // hd1080i_60
        f(1920, 1080, 1, 1, true, 3, 1, 1920, 1080, 0, 0, 3, 2),  // hd1080i_50
        f(1920, 1080, 1, 0, true, 8, 1, 1920, 1080, 0, 0, 3, 1),  // hd1080p_60
        f(1920, 1080, 1, 0, true, 3, 1, 1920, 1080, 0, 0, 3, 2),  // hd1080p_50
        f(2048, 1080, 3, 0, true, 2, 1, 2048, 1080, 0, 0, 4, 3),  // dc2k
        f(4096, 2160, 3, 0, true, 2, 1, 4096, 2160, 0, 0, 4, 3),  // dc4k
        f(3840, 2160, 1, 0, true, 7, 1, 3840, 2160, 0, 0, 3, 1),  // uhdtv_4k_60
        f(3840, 2160, 1, 0, true, 3, 1, 3840, 2160, 0, 0, 3, 2),  // uhdtv_4k_50
        f(7680, 4320, 1, 0, true, 7, 1, 7680, 4320, 0, 0, 3, 1),  // uhdtv_8k_60
        f(7680, 4320, 1, 0, true, 3, 1, 7680, 4320, 0, 0, 3, 2),  // uhdtv_8k_50
        f(1920, 1080, 1, 0, true, 2, 1, 1920, 1080, 0, 0, 3, 2),  // hd1080p_24
        f(720, 486, 1, 1, false, 8, 2, 704, 480, 8, 0, 3, 1),     // sd_pro486
    ]
});
