//! Error kinds for the decoder, bit I/O substrate and constraint engine.

use thiserror::Error;

/// Byte/bit position at which a value started, for diagnostics.
pub type Offset = (u64, u8);

#[derive(Debug, Clone, Error)]
pub enum Vc2Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("unexpected end of stream at byte {0}")]
    UnexpectedEndOfStream(u64),

    #[error("bad magic at byte {offset}: expected 'BBCD', got {found:?}")]
    BadMagic { offset: u64, found: [u8; 4] },

    #[error("bad parse code 0x{value:02x} at byte {offset}")]
    BadParseCode { offset: u64, value: u8 },

    #[error("bad wavelet index {value} at {offset:?}")]
    BadWaveletIndex { offset: Offset, value: u32 },

    #[error("bad horizontal-only wavelet index {value} at {offset:?}")]
    BadHOWaveletIndex { offset: Offset, value: u32 },

    #[error("bad profile {value} at {offset:?}")]
    BadProfile { offset: Offset, value: u32 },

    #[error("bad level {value} at {offset:?}")]
    BadLevel { offset: Offset, value: u32 },

    #[error("bad base video format {value} at {offset:?}")]
    BadBaseVideoFormat { offset: Offset, value: u32 },

    #[error("bad picture coding mode {value} at {offset:?}")]
    BadPictureCodingMode { offset: Offset, value: u32 },

    #[error("zero slices in coded picture (slices_x={slices_x}, slices_y={slices_y}) at {offset:?}")]
    ZeroSlicesInCodedPicture {
        offset: Offset,
        slices_x: u32,
        slices_y: u32,
    },

    #[error("slice_bytes_denominator is zero at {offset:?}")]
    SliceBytesHasZeroDenominator { offset: Offset },

    #[error("slice_size_scaler is zero at {offset:?}")]
    SliceSizeScalerIsZero { offset: Offset },

    #[error(
        "no default quantisation matrix for wavelet_index={wavelet_index}, \
         wavelet_index_ho={wavelet_index_ho}, dwt_depth={dwt_depth}, \
         dwt_depth_ho={dwt_depth_ho} at {offset:?}"
    )]
    NoQuantisationMatrixAvailable {
        offset: Offset,
        wavelet_index: u32,
        wavelet_index_ho: u32,
        dwt_depth: u32,
        dwt_depth_ho: u32,
    },

    #[error(
        "quantisation matrix value {value} for key {key:?} not allowed in level at {offset:?}; \
         allowed: {allowed}"
    )]
    QuantisationMatrixValueNotAllowedInLevel {
        offset: Offset,
        key: String,
        value: i64,
        allowed: String,
    },

    #[error("value {value} for field {key:?} not allowed in level at {offset:?}; allowed: {allowed}")]
    ValueNotAllowedInLevel {
        offset: Offset,
        key: String,
        value: i64,
        allowed: String,
    },

    #[error(
        "non-consecutive picture numbers: {prev} at {prev_offset:?} then {next} at {next_offset:?}"
    )]
    NonConsecutivePictureNumbers {
        prev: u32,
        prev_offset: Offset,
        next: u32,
        next_offset: Offset,
    },

    #[error("earliest field picture has odd picture_number {value} at {offset:?}")]
    EarliestFieldHasOddPictureNumber { offset: Offset, value: u32 },

    #[error(
        "sequence header changed mid-sequence: first at byte {first_offset}, \
         differing at byte {second_offset}"
    )]
    SequenceHeaderChangedMidSequence {
        first_offset: u64,
        second_offset: u64,
        first_bytes: Vec<u8>,
        second_bytes: Vec<u8>,
    },

    #[error("profile changed from {previous} to {current} at byte {offset}")]
    ProfileChanged {
        offset: u64,
        previous: u32,
        current: u32,
    },

    #[error("level changed from {previous} to {current} at byte {offset}")]
    LevelChanged {
        offset: u64,
        previous: u32,
        current: u32,
    },

    #[error("parse code 0x{value:02x} not allowed in sequence at byte {offset}; expected one of {expected}")]
    ParseCodeNotAllowedInSequence {
        offset: u64,
        value: u8,
        expected: String,
    },

    #[error("sequence ended without the level sequence matcher reaching an accepting state")]
    ParseCodeSequenceNotEnded { offset: u64 },

    #[error("wrote a zero bit past the end of a bounded block")]
    BoundedBlockOverflow,

    #[error("malformed constraint table / CSV: {0}")]
    MalformedConstraintTable(String),

    #[error("malformed symbolic sequence regular expression: {0}")]
    SymbolRegexSyntax(String),

    #[error("generator error: {0}")]
    Generator(String),
}

pub type Result<T> = std::result::Result<T, Vc2Error>;

impl From<std::io::Error> for Vc2Error {
    fn from(e: std::io::Error) -> Self {
        Vc2Error::Io(e.to_string())
    }
}
