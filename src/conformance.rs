//! Conformance assertions (4.J) wired into the parse pipeline: small
//! checks that turn a parsed value and its context into a rich
//! [`Vc2Error`] the moment a rule is violated.

use crate::error::{Offset, Result, Vc2Error};
use crate::state::DecoderState;
use crate::symbol_re::Matcher;
use crate::tables::constants::ParseCode;
use crate::tables::level_constraints::LEVEL_CONSTRAINTS;
use crate::valueset::{Value, ValueSet};
use std::collections::BTreeMap;

pub fn assert_in(offset: Offset, key: &str, value: i64, allowed: &ValueSet) -> Result<()> {
    if allowed.contains(&Value::Int(value)) {
        Ok(())
    } else {
        Err(Vc2Error::ValueNotAllowedInLevel {
            offset,
            key: key.to_string(),
            value,
            allowed: allowed.to_string(),
        })
    }
}

pub fn assert_parse_code_in_sequence(offset: u64, code: ParseCode, matcher: &mut Matcher) -> Result<()> {
    if matcher.match_symbol(code.symbol_name()) {
        Ok(())
    } else {
        let expected: Vec<String> = matcher.valid_next_symbols().into_iter().collect();
        Err(Vc2Error::ParseCodeNotAllowedInSequence {
            offset,
            value: code.0,
            expected: expected.join(", "),
        })
    }
}

pub fn assert_parse_code_sequence_ended(offset: u64, matcher: &Matcher) -> Result<()> {
    if matcher.is_complete() {
        Ok(())
    } else {
        Err(Vc2Error::ParseCodeSequenceNotEnded { offset })
    }
}

/// Update `_level_constrained_values` with `key=value`, checking the
/// combination (including every previously-accumulated key) remains
/// allowed by the level-constraint table.
pub fn assert_level_constraint(
    state: &mut DecoderState,
    offset: Offset,
    key: &str,
    value: Value,
) -> Result<()> {
    let mut partial: BTreeMap<String, Value> = state
        .conformance
        .level_constrained_values
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    partial.insert(key.to_string(), value);

    if !LEVEL_CONSTRAINTS.is_allowed(&partial) {
        let allowed = LEVEL_CONSTRAINTS.allowed_values_for(key, &partial);
        let int_value = match value {
            Value::Int(v) => v,
            Value::Bool(b) => b as i64,
        };
        return Err(Vc2Error::ValueNotAllowedInLevel {
            offset,
            key: key.to_string(),
            value: int_value,
            allowed: allowed.to_string(),
        });
    }

    state
        .conformance
        .level_constrained_values
        .insert(key.to_string(), value);
    Ok(())
}

pub fn assert_picture_number_incremented_as_expected(
    state: &mut DecoderState,
    offset: Offset,
    picture_number: u32,
) -> Result<()> {
    if let Some((prev, prev_offset)) = state.conformance.last_picture_number {
        let expected = prev.wrapping_add(1);
        if picture_number != expected {
            return Err(Vc2Error::NonConsecutivePictureNumbers {
                prev,
                prev_offset,
                next: picture_number,
                next_offset: offset,
            });
        }
    } else if let Some(crate::tables::constants::PictureCodingMode::PicturesAreFields) =
        state.conformance.picture_coding_mode
    {
        if picture_number % 2 != 0 {
            return Err(Vc2Error::EarliestFieldHasOddPictureNumber {
                offset,
                value: picture_number,
            });
        }
    }

    state.conformance.last_picture_number = Some((picture_number, offset));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_number_wrap_is_accepted() {
        let mut state = DecoderState::new();
        assert_picture_number_incremented_as_expected(&mut state, (0, 7), u32::MAX).unwrap();
        assert_picture_number_incremented_as_expected(&mut state, (4, 7), 0).unwrap();
    }

    #[test]
    fn non_consecutive_picture_numbers_is_rejected() {
        let mut state = DecoderState::new();
        assert_picture_number_incremented_as_expected(&mut state, (0, 7), u32::MAX).unwrap();
        let err = assert_picture_number_incremented_as_expected(&mut state, (4, 7), 1).unwrap_err();
        assert!(matches!(err, Vc2Error::NonConsecutivePictureNumbers { .. }));
    }
}
