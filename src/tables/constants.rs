//! Parse codes, enumerations and small fixed tables from SMPTE ST 2042-1.

use serde::{Deserialize, Serialize};

pub const PARSE_INFO_PREFIX: u32 = 0x4242_4344;
pub const PARSE_INFO_HEADER_BYTES: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseCode(pub u8);

impl ParseCode {
    pub const SEQUENCE_HEADER: ParseCode = ParseCode(0x00);
    pub const END_OF_SEQUENCE: ParseCode = ParseCode(0x10);
    pub const LOW_DELAY_PICTURE: ParseCode = ParseCode(0xC8);
    pub const HIGH_QUALITY_PICTURE: ParseCode = ParseCode(0xE8);
    pub const LOW_DELAY_PICTURE_FRAGMENT: ParseCode = ParseCode(0xCC);
    pub const HIGH_QUALITY_PICTURE_FRAGMENT: ParseCode = ParseCode(0xEC);

    pub fn is_seq_header(self) -> bool {
        self.0 == Self::SEQUENCE_HEADER.0
    }

    pub fn is_end_of_sequence(self) -> bool {
        self.0 == Self::END_OF_SEQUENCE.0
    }

    pub fn is_auxiliary_data(self) -> bool {
        self.0 & 0xF8 == 0x20
    }

    pub fn is_padding_data(self) -> bool {
        self.0 == 0x30
    }

    pub fn is_picture(self) -> bool {
        self.0 & 0x88 == 0x88
    }

    pub fn is_fragment(self) -> bool {
        self.is_picture() && self.0 & 0x0C == 0x0C
    }

    pub fn is_ld_picture(self) -> bool {
        self.is_picture() && !self.is_fragment() && self.0 & 0x20 == 0
    }

    pub fn is_hq_picture(self) -> bool {
        self.is_picture() && !self.is_fragment() && self.0 & 0x20 != 0
    }

    pub fn is_ld_fragment(self) -> bool {
        self.is_fragment() && self.0 & 0x20 == 0
    }

    pub fn is_hq_fragment(self) -> bool {
        self.is_fragment() && self.0 & 0x20 != 0
    }

    /// "Low delay"-style pictures/fragments use DC prediction.
    pub fn using_dc_prediction(self) -> bool {
        self.0 & 0x28 == 0x08
    }

    pub fn symbol_name(self) -> &'static str {
        if self.is_seq_header() {
            "sequence_header"
        } else if self.is_end_of_sequence() {
            "end_of_sequence"
        } else if self.is_auxiliary_data() {
            "auxiliary_data"
        } else if self.is_padding_data() {
            "padding_data"
        } else if self.0 == Self::LOW_DELAY_PICTURE.0 {
            "low_delay_picture"
        } else if self.0 == Self::HIGH_QUALITY_PICTURE.0 {
            "high_quality_picture"
        } else if self.0 == Self::LOW_DELAY_PICTURE_FRAGMENT.0 {
            "low_delay_picture_fragment"
        } else if self.0 == Self::HIGH_QUALITY_PICTURE_FRAGMENT.0 {
            "high_quality_picture_fragment"
        } else {
            "unknown"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    LowDelay = 0,
    HighQuality = 3,
}

impl Profile {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Profile::LowDelay),
            3 => Some(Profile::HighQuality),
            _ => None,
        }
    }

    /// Parse codes allowed by each profile, per the reference's
    /// `PROFILES` table.
    pub fn allowed_parse_codes(self) -> &'static [ParseCode] {
        match self {
            Profile::LowDelay => &[
                ParseCode::SEQUENCE_HEADER,
                ParseCode::END_OF_SEQUENCE,
                ParseCode(0x20),
                ParseCode(0x30),
                ParseCode::LOW_DELAY_PICTURE,
                ParseCode::LOW_DELAY_PICTURE_FRAGMENT,
            ],
            Profile::HighQuality => &[
                ParseCode::SEQUENCE_HEADER,
                ParseCode::END_OF_SEQUENCE,
                ParseCode(0x20),
                ParseCode(0x30),
                ParseCode::HIGH_QUALITY_PICTURE,
                ParseCode::HIGH_QUALITY_PICTURE_FRAGMENT,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureCodingMode {
    PicturesAreFrames = 0,
    PicturesAreFields = 1,
}

impl PictureCodingMode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(PictureCodingMode::PicturesAreFrames),
            1 => Some(PictureCodingMode::PicturesAreFields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorDifferenceSamplingFormat {
    Color444 = 0,
    Color422 = 1,
    Color420 = 2,
}

impl ColorDifferenceSamplingFormat {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Color444),
            1 => Some(Self::Color422),
            2 => Some(Self::Color420),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceSamplingMode {
    Progressive = 0,
    Interlaced = 1,
}

impl SourceSamplingMode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Progressive),
            1 => Some(Self::Interlaced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiftingFilterType {
    EvenAddOdd = 1,
    EvenSubtractOdd = 2,
    OddAddEven = 3,
    OddSubtractEven = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveletFilter {
    DeslauriersDubuc9_7 = 0,
    LeGall5_3 = 1,
    DeslauriersDubuc13_7 = 2,
    HaarNoShift = 3,
    HaarWithShift = 4,
    Fidelity = 5,
    Daubechies9_7 = 6,
}

impl WaveletFilter {
    pub fn from_u32(v: u32) -> Option<Self> {
        use WaveletFilter::*;
        Some(match v {
            0 => DeslauriersDubuc9_7,
            1 => LeGall5_3,
            2 => DeslauriersDubuc13_7,
            3 => HaarNoShift,
            4 => HaarWithShift,
            5 => Fidelity,
            6 => Daubechies9_7,
            _ => return None,
        })
    }
}

/// Orientation of a coefficient band within a decomposition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    L,
    H,
    LL,
    HL,
    LH,
    HH,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum BaseVideoFormat {
    CustomFormat = 0,
    Qsif525 = 1,
    Qcif = 2,
    Sif525 = 3,
    Cif = 4,
    FourSif525 = 5,
    FourCif = 6,
    Sd480i60 = 7,
    Sd576i50 = 8,
    Hd720p60 = 9,
    Hd720p50 = 10,
    Hd1080i60 = 11,
    Hd1080i50 = 12,
    Hd1080p60 = 13,
    Hd1080p50 = 14,
    Dc2k = 15,
    Dc4k = 16,
    Uhdtv4k60 = 17,
    Uhdtv4k50 = 18,
    Uhdtv8k60 = 19,
    Uhdtv8k50 = 20,
    Hd1080p24 = 21,
    SdPro486 = 22,
}

impl BaseVideoFormat {
    pub fn from_u32(v: u32) -> Option<Self> {
        use BaseVideoFormat::*;
        Some(match v {
            0 => CustomFormat,
            1 => Qsif525,
            2 => Qcif,
            3 => Sif525,
            4 => Cif,
            5 => FourSif525,
            6 => FourCif,
            7 => Sd480i60,
            8 => Sd576i50,
            9 => Hd720p60,
            10 => Hd720p50,
            11 => Hd1080i60,
            12 => Hd1080i50,
            13 => Hd1080p60,
            14 => Hd1080p50,
            15 => Dc2k,
            16 => Dc4k,
            17 => Uhdtv4k60,
            18 => Uhdtv4k50,
            19 => Uhdtv8k60,
            20 => Uhdtv8k50,
            21 => Hd1080p24,
            22 => SdPro486,
            _ => return None,
        })
    }
}
