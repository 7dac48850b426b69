//! Level-constraint table and per-level sequencing regular expressions.
//!
//! The text below is a small representative table covering the fields
//! this crate's decoder actually checks, not the normative SMPTE level
//! table — see `DESIGN.md`.

use crate::tables::csv::read_constraints_from_csv;
use crate::valueset::ConstraintTable;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const LEVEL_CONSTRAINTS_CSV: &str = "\
# level,  unconstrained,  level-1-low-delay,  level-1-high-quality
level,0,1,1
profile,any,0,3
major_version,any,1-3,1-3
minor_version,any,0-2,0-2
wavelet_index,any,0-6,0-6
dwt_depth,any,0-4,0-4
slices_x,any,1-64,1-64
slices_y,any,1-64,1-64
";

pub static LEVEL_CONSTRAINTS: Lazy<ConstraintTable> =
    Lazy::new(|| read_constraints_from_csv(LEVEL_CONSTRAINTS_CSV).expect("embedded table is valid"));

/// One symbolic sequence regular expression (component D's grammar) per
/// level, governing which data-unit symbols may follow which within a
/// sequence.
pub static LEVEL_SEQUENCE_REGEXES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        0,
        "sequence_header \
         (auxiliary_data | padding_data)* \
         ((low_delay_picture | low_delay_picture_fragment+ | \
            high_quality_picture | high_quality_picture_fragment+) \
           (auxiliary_data | padding_data)*)* \
         end_of_sequence",
    );
    m.insert(
        1,
        "sequence_header \
         (low_delay_picture | low_delay_picture_fragment+)* \
         end_of_sequence",
    );
    m
});

/// A level is legal only if it has a registered sequencing grammar; levels
/// are an open-ended registry rather than a fixed enum, so this is the
/// closest thing to `Level::from_u32`.
pub fn is_known_level(level: u32) -> bool {
    LEVEL_SEQUENCE_REGEXES.contains_key(&level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_match_the_registered_grammars() {
        assert!(is_known_level(0));
        assert!(is_known_level(1));
        assert!(!is_known_level(2));
    }
}
