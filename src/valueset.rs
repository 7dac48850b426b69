//! Value-set algebra and multi-column constraint tables, grounded on
//! `vc2_conformance/_constraint_table.py`.
//!
//! A [`ValueSet`] is a union of explicit scalar values and inclusive integer
//! ranges; a [`ConstraintTable`] is a list of field->value-set combinations,
//! queried with [`ConstraintTable::filter`], [`ConstraintTable::is_allowed`]
//! and [`ConstraintTable::allowed_values_for`].

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// A union of explicit values and inclusive integer ranges, or the special
/// wildcard that contains everything (`any` in the CSV syntax).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    values: Vec<Value>,
    ranges: Vec<(i64, i64)>,
    any: bool,
}

impl ValueSet {
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            ranges: Vec::new(),
            any: false,
        }
    }

    pub fn any() -> Self {
        Self {
            values: Vec::new(),
            ranges: Vec::new(),
            any: true,
        }
    }

    pub fn is_any(&self) -> bool {
        self.any
    }

    pub fn single(v: impl Into<Value>) -> Self {
        let mut s = Self::empty();
        s.add_value(v.into());
        s
    }

    /// Adds a single explicit value, deduplicating.
    ///
    /// # Panics
    /// Panics if called on the `any` wildcard: mutating `any` has no
    /// sensible meaning, matching the source's `AttributeError`.
    pub fn add_value(&mut self, value: Value) {
        assert!(!self.any, "cannot add a value to the `any` wildcard");
        if !self.contains(&value) {
            self.values.push(value);
        }
    }

    /// Adds an inclusive `[lower, upper]` integer range, merging with any
    /// overlapping or adjacent existing ranges and absorbing any single
    /// values the new range encloses.
    pub fn add_range(&mut self, lower: i64, upper: i64) {
        assert!(!self.any, "cannot add a range to the `any` wildcard");
        let (mut lo, mut hi) = (lower, upper);
        let mut merged = Vec::new();
        for &(rlo, rhi) in &self.ranges {
            if rhi + 1 < lo || rlo > hi + 1 {
                merged.push((rlo, rhi));
            } else {
                lo = lo.min(rlo);
                hi = hi.max(rhi);
            }
        }
        merged.push((lo, hi));
        merged.sort();
        self.ranges = merged;

        self.values.retain(|v| match v {
            Value::Int(i) => !(lo <= *i && *i <= hi),
            Value::Bool(_) => true,
        });
    }

    pub fn contains(&self, value: &Value) -> bool {
        if self.any {
            return true;
        }
        if self.values.contains(value) {
            return true;
        }
        if let Value::Int(i) = value {
            return self.ranges.iter().any(|&(lo, hi)| lo <= *i && *i <= hi);
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        !self.any && self.values.is_empty() && self.ranges.is_empty()
    }

    pub fn is_disjoint(&self, other: &ValueSet) -> bool {
        if self.any || other.any {
            return false;
        }
        self.iter_values().all(|v| !other.contains(&v))
    }

    /// Union with `other`. If either side is `any`, the result is `any`.
    pub fn union(&self, other: &ValueSet) -> ValueSet {
        if self.any || other.any {
            return ValueSet::any();
        }
        let mut out = self.clone();
        for &(lo, hi) in &other.ranges {
            out.add_range(lo, hi);
        }
        for v in &other.values {
            if !out.contains(v) {
                out.add_value(*v);
            }
        }
        out
    }

    /// Enumerate all explicitly-representable values (ranges expanded).
    /// # Panics
    /// Panics on the `any` wildcard, which cannot be enumerated.
    pub fn iter_values(&self) -> impl Iterator<Item = Value> + '_ {
        assert!(!self.any, "cannot enumerate the `any` wildcard");
        let ranged = self
            .ranges
            .iter()
            .flat_map(|&(lo, hi)| (lo..=hi).map(Value::Int));
        self.values.iter().copied().chain(ranged)
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.any {
            return write!(f, "any");
        }
        let mut parts: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        parts.extend(self.ranges.iter().map(|(lo, hi)| format!("{lo}-{hi}")));
        write!(f, "{}", parts.join(", "))
    }
}

/// One allowed field-combination: a sparse map of field name to value-set.
/// Fields absent from a combination are unconstrained by it.
pub type Combination = BTreeMap<String, ValueSet>;

pub struct ConstraintTable {
    pub combinations: Vec<Combination>,
}

impl ConstraintTable {
    pub fn new(combinations: Vec<Combination>) -> Self {
        Self { combinations }
    }

    /// Keep only combinations consistent with every field given in `partial`
    /// (a combination with no overlapping fields at all still matches: an
    /// empty constraint is a catch-all).
    pub fn filter(&self, partial: &BTreeMap<String, Value>) -> Vec<&Combination> {
        self.combinations
            .iter()
            .filter(|combo| {
                partial.iter().all(|(key, value)| {
                    combo.get(key).map(|vs| vs.contains(value)).unwrap_or(true)
                })
            })
            .collect()
    }

    pub fn is_allowed(&self, partial: &BTreeMap<String, Value>) -> bool {
        !self.filter(partial).is_empty()
    }

    /// Union of `key`'s value-sets across the combinations consistent with
    /// `partial`. An `any` wildcard in the result may be substituted by the
    /// caller with a concrete enumeration.
    pub fn allowed_values_for(&self, key: &str, partial: &BTreeMap<String, Value>) -> ValueSet {
        let mut out = ValueSet::empty();
        for combo in self.filter(partial) {
            if let Some(vs) = combo.get(key) {
                out = out.union(vs);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_merges_adjacent_and_overlapping() {
        let mut s = ValueSet::empty();
        s.add_range(1, 3);
        s.add_range(4, 6);
        s.add_range(10, 12);
        s.add_range(6, 11);
        assert!(s.contains(&Value::Int(1)));
        assert!(s.contains(&Value::Int(12)));
        assert!(!s.contains(&Value::Int(13)));
    }

    #[test]
    fn range_absorbs_enclosed_single_value() {
        let mut s = ValueSet::empty();
        s.add_value(Value::Int(5));
        s.add_range(1, 10);
        assert!(s.contains(&Value::Int(5)));
    }

    #[test]
    fn any_contains_everything() {
        let any = ValueSet::any();
        assert!(any.contains(&Value::Int(i64::MIN)));
        assert!(any.contains(&Value::Bool(true)));
    }

    #[test]
    fn constraint_table_filters_and_unions() {
        let mut c1 = Combination::new();
        c1.insert("profile".into(), ValueSet::single(0i64));
        c1.insert("level".into(), ValueSet::single(1i64));

        let mut c2 = Combination::new();
        c2.insert("profile".into(), ValueSet::single(0i64));
        c2.insert("level".into(), ValueSet::single(2i64));

        let table = ConstraintTable::new(vec![c1, c2]);

        let mut partial = BTreeMap::new();
        partial.insert("profile".to_string(), Value::Int(0));

        let allowed = table.allowed_values_for("level", &partial);
        assert!(allowed.contains(&Value::Int(1)));
        assert!(allowed.contains(&Value::Int(2)));
        assert!(!allowed.contains(&Value::Int(3)));
    }
}
