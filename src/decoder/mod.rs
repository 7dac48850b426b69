//! Top-level parse pipeline (4.E): stream -> sequence -> data-unit
//! dispatch.

pub mod sequence_header;
pub mod slice;
pub mod transform;

use crate::bitreader::BitReader;
use crate::conformance::{assert_parse_code_in_sequence, assert_parse_code_sequence_ended};
use crate::error::{Result, Vc2Error};
use crate::picture::{finalise_component, Picture, VideoParameters};
use crate::state::DecoderState;
use crate::symbol_re::Matcher;
use crate::tables::constants::{ParseCode, Profile, PARSE_INFO_HEADER_BYTES, PARSE_INFO_PREFIX};
use crate::tables::level_constraints::LEVEL_SEQUENCE_REGEXES;
use crate::vlc::read_uint_lit;

/// Invoked synchronously once per decoded (or completed fragmented)
/// picture; the picture is borrowed for the duration of the call only.
pub trait PictureSink {
    fn picture_decoded(&mut self, picture: &Picture, video_parameters: &VideoParameters);
}

impl<F: FnMut(&Picture, &VideoParameters)> PictureSink for F {
    fn picture_decoded(&mut self, picture: &Picture, video_parameters: &VideoParameters) {
        self(picture, video_parameters)
    }
}

/// Profile/level, carried across the top-level loop in [`decode_stream`] so
/// that a later sequence's header can be checked against the first one's
/// (spec §3, §8: profile and level never change within a stream).
#[derive(Debug, Clone, Default)]
pub struct CrossSequenceState {
    profile: Option<(u32, u64)>,
    level: Option<(u32, u64)>,
}

pub struct ParseInfoHeader {
    pub code: ParseCode,
    pub next_parse_offset: u32,
    pub previous_parse_offset: u32,
}

pub fn parse_info(r: &mut BitReader) -> Result<ParseInfoHeader> {
    let offset = r.tell().0;
    let magic = read_uint_lit(r, 4) as u32;
    if magic != PARSE_INFO_PREFIX {
        return Err(Vc2Error::BadMagic {
            offset,
            found: magic.to_be_bytes(),
        });
    }
    let parse_code = read_uint_lit(r, 1) as u8;
    let next_parse_offset = read_uint_lit(r, 4) as u32;
    let previous_parse_offset = read_uint_lit(r, 4) as u32;
    Ok(ParseInfoHeader {
        code: ParseCode(parse_code),
        next_parse_offset,
        previous_parse_offset,
    })
}

fn auxiliary_data(r: &mut BitReader, next_parse_offset: u32) {
    // Content is ignored; skip straight to the next parse-info.
    let target_byte = r.tell().0 + next_parse_offset as u64 - PARSE_INFO_HEADER_BYTES as u64;
    r.seek(target_byte, 7);
}

/// Parse data units until an `end_of_sequence` marker, dispatching each by
/// parse code. Returns once the sequence has ended.
pub fn parse_sequence(
    r: &mut BitReader,
    state: &mut DecoderState,
    cross_sequence: &mut CrossSequenceState,
    sink: &mut impl PictureSink,
) -> Result<()> {
    let mut first_sequence_header: Option<(Vec<u8>, u64)> = None;

    loop {
        let unit_offset = r.tell().0;
        let header = parse_info(r)?;
        let code = header.code;
        let next_parse_offset = header.next_parse_offset;

        let profile = Profile::from_u32(state.profile).ok_or(Vc2Error::BadProfile {
            offset: (unit_offset, 7),
            value: state.profile,
        })?;
        if !profile.allowed_parse_codes().iter().any(|c| c.0 == code.0) {
            return Err(Vc2Error::ParseCodeNotAllowedInSequence {
                offset: unit_offset,
                value: code.0,
                expected: format!("{:?}", profile.allowed_parse_codes()),
            });
        }

        if let Some(matcher) = state.conformance.level_sequence_matcher.as_mut() {
            assert_parse_code_in_sequence(unit_offset, code, matcher)?;
        }

        if code.is_seq_header() {
            let header_start = r.tell();
            sequence_header::sequence_header(r, state, unit_offset)?;
            r.byte_align();
            let header_end = r.tell();
            let header_bytes = r.data()[header_start.0 as usize..header_end.0 as usize].to_vec();
            let is_first_header_of_sequence = first_sequence_header.is_none();

            match &first_sequence_header {
                None => first_sequence_header = Some((header_bytes.clone(), unit_offset)),
                Some((first_bytes, first_offset)) => {
                    if *first_bytes != header_bytes {
                        return Err(Vc2Error::SequenceHeaderChangedMidSequence {
                            first_offset: *first_offset,
                            second_offset: unit_offset,
                            first_bytes: first_bytes.clone(),
                            second_bytes: header_bytes.clone(),
                        });
                    }
                }
            }

            if is_first_header_of_sequence {
                if let Some((previous_profile, _)) = cross_sequence.profile {
                    if previous_profile != state.profile {
                        return Err(Vc2Error::ProfileChanged {
                            offset: unit_offset,
                            previous: previous_profile,
                            current: state.profile,
                        });
                    }
                }
                cross_sequence.profile = Some((state.profile, unit_offset));

                if let Some((previous_level, _)) = cross_sequence.level {
                    if previous_level != state.level {
                        return Err(Vc2Error::LevelChanged {
                            offset: unit_offset,
                            previous: previous_level,
                            current: state.level,
                        });
                    }
                }
                cross_sequence.level = Some((state.level, unit_offset));
            }

            if state.conformance.level_sequence_matcher.is_none() {
                if let Some(pattern) = LEVEL_SEQUENCE_REGEXES.get(&state.level) {
                    state.conformance.level_sequence_matcher = Some(Matcher::new(pattern)?);
                    assert_parse_code_in_sequence(
                        unit_offset,
                        code,
                        state.conformance.level_sequence_matcher.as_mut().unwrap(),
                    )?;
                }
            }
        } else if code.is_end_of_sequence() {
            if let Some(matcher) = &state.conformance.level_sequence_matcher {
                assert_parse_code_sequence_ended(unit_offset, matcher)?;
            }
            return Ok(());
        } else if code.is_auxiliary_data() || code.is_padding_data() {
            auxiliary_data(r, next_parse_offset);
        } else if code.is_picture() {
            slice::picture_parse(r, state, code, unit_offset, sink)?;
        } else {
            return Err(Vc2Error::BadParseCode {
                offset: unit_offset,
                value: code.0,
            });
        }
    }
}

/// Decode every sequence in the stream until the reader reaches true EOF.
/// Profile and level are tracked across sequences and must not change
/// (spec §3, §8); everything else in [`DecoderState`] is fresh per sequence.
pub fn decode_stream(data: &[u8], sink: &mut impl PictureSink) -> Result<()> {
    let mut r = BitReader::new(data);
    let mut cross_sequence = CrossSequenceState::default();
    while !r.is_true_eof() {
        let mut state = DecoderState::new();
        parse_sequence(&mut r, &mut state, &mut cross_sequence, sink)?;
    }
    Ok(())
}
