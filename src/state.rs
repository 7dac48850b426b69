//! Decoder state: the structured record mutated in place as a stream is
//! parsed, grounded on `vc2_conformance/state.py`'s `State` field list.

use crate::error::Offset;
use crate::symbol_re::Matcher;
use crate::tables::constants::{Orientation, PictureCodingMode};
use std::collections::HashMap;

pub type Level = u32;
pub type QuantMatrix = HashMap<(Level, Orientation), u32>;
pub type Picture2D = Vec<Vec<i64>>;
/// Coefficient storage: level -> orientation -> 2D array of transform values.
pub type CoeffStorage = HashMap<(Level, Orientation), Picture2D>;

#[derive(Debug, Clone, Default)]
pub struct ParseInfo {
    pub parse_code: u8,
    pub next_parse_offset: u32,
    pub previous_parse_offset: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SliceSizeParameters {
    pub slices_x: u32,
    pub slices_y: u32,
    /// LD only.
    pub slice_bytes_numerator: u32,
    pub slice_bytes_denominator: u32,
    /// HQ only.
    pub slice_prefix_bytes: u32,
    pub slice_size_scaler: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FragmentState {
    pub fragment_data_length: u32,
    pub fragment_slice_count: u32,
    pub fragment_x_offset: u32,
    pub fragment_y_offset: u32,
    pub fragment_slices_received: u32,
    pub fragmented_picture_done: bool,
}

/// Conformance sidecars, prefixed `_` in the reference by convention.
pub struct ConformanceState {
    pub picture_coding_mode: Option<PictureCodingMode>,
    pub num_pictures_in_sequence: u32,
    pub level_sequence_matcher: Option<Matcher>,
    pub level_constrained_values: HashMap<String, crate::valueset::Value>,
    pub last_picture_number: Option<(u32, Offset)>,
    pub last_sequence_header_bytes: Option<(Vec<u8>, u64)>,
    pub last_parse_parameters_offset: Option<u64>,
}

impl Default for ConformanceState {
    fn default() -> Self {
        Self {
            picture_coding_mode: None,
            num_pictures_in_sequence: 0,
            level_sequence_matcher: None,
            level_constrained_values: HashMap::new(),
            last_picture_number: None,
            last_sequence_header_bytes: None,
            last_parse_parameters_offset: None,
        }
    }
}

pub struct DecoderState {
    pub parse_info: ParseInfo,

    pub major_version: u32,
    pub minor_version: u32,
    pub profile: u32,
    pub level: u32,

    pub frame_width: u32,
    pub frame_height: u32,
    pub top_field_first: bool,
    pub luma_width: u32,
    pub luma_height: u32,
    pub color_diff_width: u32,
    pub color_diff_height: u32,
    pub luma_depth: u32,
    pub color_diff_depth: u32,

    pub picture_number: u32,
    pub y: Picture2D,
    pub c1: Picture2D,
    pub c2: Picture2D,

    pub wavelet_index: u32,
    pub wavelet_index_ho: u32,
    pub dwt_depth: u32,
    pub dwt_depth_ho: u32,
    pub slice_params: SliceSizeParameters,

    pub quant_matrix: QuantMatrix,
    pub quantizer: QuantMatrix,

    pub y_transform: CoeffStorage,
    pub c1_transform: CoeffStorage,
    pub c2_transform: CoeffStorage,

    pub fragment: FragmentState,

    pub conformance: ConformanceState,
}

impl DecoderState {
    pub fn new() -> Self {
        Self {
            parse_info: ParseInfo::default(),
            major_version: 0,
            minor_version: 0,
            profile: 0,
            level: 0,
            frame_width: 0,
            frame_height: 0,
            top_field_first: false,
            luma_width: 0,
            luma_height: 0,
            color_diff_width: 0,
            color_diff_height: 0,
            luma_depth: 8,
            color_diff_depth: 8,
            picture_number: 0,
            y: Vec::new(),
            c1: Vec::new(),
            c2: Vec::new(),
            wavelet_index: 0,
            wavelet_index_ho: 0,
            dwt_depth: 0,
            dwt_depth_ho: 0,
            slice_params: SliceSizeParameters::default(),
            quant_matrix: QuantMatrix::new(),
            quantizer: QuantMatrix::new(),
            y_transform: CoeffStorage::new(),
            c1_transform: CoeffStorage::new(),
            c2_transform: CoeffStorage::new(),
            fragment: FragmentState::default(),
            conformance: ConformanceState::default(),
        }
    }

    /// Fields reset at each sequence-header boundary. Cross-sequence
    /// invariants (profile/level identity, the sequence-header byte
    /// buffer) are deliberately *not* reset here.
    pub fn reset_for_new_sequence_header(&mut self) {
        self.fragment = FragmentState::default();
        self.y_transform.clear();
        self.c1_transform.clear();
        self.c2_transform.clear();
    }
}

impl Default for DecoderState {
    fn default() -> Self {
        Self::new()
    }
}
