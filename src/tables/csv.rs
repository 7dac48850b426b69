//! Hand-rolled constraint-table CSV loader, grounded on
//! `vc2_conformance/_constraint_table.read_constraints_from_csv`.
//!
//! No CSV crate appears anywhere in the retrieval pack this crate was
//! grounded on, so this is a small RFC4180-ish parser: quoted fields may
//! contain literal commas (used for in-cell value unions), `#`-prefixed and
//! blank lines are comments, first column is the field name, every other
//! column is one allowed combination.

use crate::error::{Result, Vc2Error};
use crate::valueset::{Combination, ConstraintTable, Value, ValueSet};

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut cur));
            }
            other => cur.push(other),
        }
    }
    fields.push(cur);
    fields
}

/// Parse one cell into a value-set. `left` is the already-parsed cell to
/// the left in the same row, used to resolve a ditto mark.
fn parse_cell(raw: &str, left: Option<&ValueSet>) -> Result<ValueSet> {
    let trimmed = raw.trim();

    if trimmed == "\"" || trimmed == "ditto" {
        return left.cloned().ok_or_else(|| {
            Vc2Error::MalformedConstraintTable("ditto mark with no preceding cell".into())
        });
    }
    if trimmed.is_empty() {
        return Ok(ValueSet::empty());
    }
    if trimmed.eq_ignore_ascii_case("any") {
        return Ok(ValueSet::any());
    }

    let mut set = ValueSet::empty();
    for part in trimmed.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.eq_ignore_ascii_case("true") {
            set.add_value(Value::Bool(true));
        } else if part.eq_ignore_ascii_case("false") {
            set.add_value(Value::Bool(false));
        } else if let Some((lo, hi)) = part.split_once('-') {
            let (lo, hi) = (lo.trim(), hi.trim());
            // A leading '-' on `lo` denotes a negative bound, not a range
            // separator: e.g. "-4-4" is the range [-4, 4].
            match (lo.parse::<i64>(), hi.parse::<i64>()) {
                (Ok(lo), Ok(hi)) => set.add_range(lo, hi),
                _ => {
                    return Err(Vc2Error::MalformedConstraintTable(format!(
                        "bad range cell {raw:?}"
                    )))
                }
            }
        } else {
            let v: i64 = part.parse().map_err(|_| {
                Vc2Error::MalformedConstraintTable(format!("bad value {part:?} in cell {raw:?}"))
            })?;
            set.add_value(Value::Int(v));
        }
    }
    Ok(set)
}

pub fn read_constraints_from_csv(csv_text: &str) -> Result<ConstraintTable> {
    let mut combinations: Vec<Combination> = Vec::new();

    for line in csv_text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_csv_line(line);
        let key = fields[0].trim().to_string();
        if key.is_empty() {
            continue;
        }

        if combinations.is_empty() {
            combinations = fields[1..].iter().map(|_| Combination::new()).collect();
        } else if fields.len() - 1 != combinations.len() {
            return Err(Vc2Error::MalformedConstraintTable(format!(
                "row {key:?} has {} value columns, expected {}",
                fields.len() - 1,
                combinations.len()
            )));
        }

        let mut left: Option<ValueSet> = None;
        for (combo, raw) in combinations.iter_mut().zip(fields[1..].iter()) {
            let parsed = parse_cell(raw, left.as_ref())?;
            left = Some(parsed.clone());
            combo.insert(key.clone(), parsed);
        }
    }

    Ok(ConstraintTable::new(combinations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ditto_any_and_ranges() {
        let csv = "\
# a comment
profile,0,0,3
level,1,2-4,any
";
        let table = read_constraints_from_csv(csv).unwrap();
        assert_eq!(table.combinations.len(), 3);
        assert!(table.combinations[0]
            .get("profile")
            .unwrap()
            .contains(&Value::Int(0)));
        assert!(table.combinations[1]
            .get("level")
            .unwrap()
            .contains(&Value::Int(3)));
        assert!(table.combinations[2].get("level").unwrap().is_any());
    }
}
