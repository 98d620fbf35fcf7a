//! Capability bits and per-cell capability sets
//!
//! Capabilities are bitmask constants with a canonical name table, evaluated
//! in O(1). Each matrix cell carries a fixed `schema` mask (which capability
//! names exist for that cell at all) next to the `granted` mask; mutations
//! are masked by the schema, so setting a name the cell does not know is a
//! silent no-op.

use serde::{Deserialize, Serialize};

// Capability bit constants
pub const OWNER: u64 = 1;
pub const EDIT: u64 = 1 << 1;
pub const READ: u64 = 1 << 2;
pub const SUBMIT: u64 = 1 << 3;
pub const SEND: u64 = 1 << 4;
pub const ACCEPT: u64 = 1 << 5;
pub const REVIEW: u64 = 1 << 6;
pub const CONSIDER_REVIEWS: u64 = 1 << 7;

/// Every capability bit in the system
pub const ALL_CAPS: u64 =
    OWNER | EDIT | READ | SUBMIT | SEND | ACCEPT | REVIEW | CONSIDER_REVIEWS;

// Capability name mappings, in canonical order
const CAPS: &[(&str, u64)] = &[
    ("Owner", OWNER),
    ("Edit", EDIT),
    ("Read", READ),
    ("Submit", SUBMIT),
    ("Send", SEND),
    ("Accept", ACCEPT),
    ("Review", REVIEW),
    ("Consider_Reviews", CONSIDER_REVIEWS),
];

/// Convert a capability mask to capability names, in canonical order
pub fn caps_to_names(mask: u64) -> Vec<&'static str> {
    CAPS.iter()
        .filter(|(_, b)| mask & b == *b)
        .map(|(n, _)| *n)
        .collect()
}

/// Convert a list of capability names to a mask (unknown names ignored)
pub fn names_to_caps(names: &[&str]) -> u64 {
    names
        .iter()
        .filter_map(|n| CAPS.iter().find(|(k, _)| k == n).map(|(_, v)| v))
        .fold(0, |a, b| a | b)
}

/// Look up the bit for a single capability name
pub fn cap_bit(name: &str) -> Option<u64> {
    CAPS.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

/// All capability names known to the system, in canonical order
pub fn capability_names() -> Vec<&'static str> {
    CAPS.iter().map(|(n, _)| *n).collect()
}

/// The capability set for one (subject, object) cell.
///
/// `schema` is fixed at construction and never changes; `granted` is always
/// a subset of `schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    schema: u64,
    granted: u64,
}

impl CapabilitySet {
    /// New set with the given schema, nothing granted
    #[inline]
    pub fn new(schema: u64) -> Self {
        CapabilitySet { schema, granted: 0 }
    }

    /// New set with the given schema, everything granted
    #[inline]
    pub fn with_all(schema: u64) -> Self {
        CapabilitySet { schema, granted: schema }
    }

    /// The schema mask for this cell
    #[inline]
    pub fn schema(&self) -> u64 {
        self.schema
    }

    /// The granted mask for this cell
    #[inline]
    pub fn granted(&self) -> u64 {
        self.granted
    }

    /// Check if every bit in `bits` is granted
    #[inline]
    pub fn has(&self, bits: u64) -> bool {
        self.granted & bits == bits
    }

    /// Check if every bit in `bits` exists in this cell's schema
    #[inline]
    pub fn schema_has(&self, bits: u64) -> bool {
        self.schema & bits == bits
    }

    /// Check a capability by name (false for unknown or un-schema'd names)
    pub fn has_access(&self, name: &str) -> bool {
        cap_bit(name).is_some_and(|b| self.has(b))
    }

    /// Set bits to `value`, masked by the schema; bits outside the schema
    /// are left untouched
    #[inline]
    pub fn set(&mut self, bits: u64, value: bool) {
        let bits = bits & self.schema;
        if value {
            self.granted |= bits;
        } else {
            self.granted &= !bits;
        }
    }

    /// Set a capability by name; no-op for unknown or un-schema'd names
    pub fn set_access(&mut self, name: &str, value: bool) {
        if let Some(b) = cap_bit(name) {
            self.set(b, value);
        }
    }

    /// Grant every capability in the schema
    #[inline]
    pub fn grant_all(&mut self) {
        self.granted = self.schema;
    }

    /// Revoke every capability
    #[inline]
    pub fn revoke_all(&mut self) {
        self.granted = 0;
    }

    /// Union the other set's granted capabilities into this one, limited to
    /// this cell's schema. Only ever adds access.
    #[inline]
    pub fn overlay_from(&mut self, other: &CapabilitySet) {
        self.granted |= other.granted & self.schema;
    }

    /// Granted capability names in canonical order, joined by `/`.
    /// Empty string when nothing is granted.
    pub fn describe(&self) -> String {
        caps_to_names(self.granted).join("/")
    }

    /// Every schema capability name in canonical order, joined by `/`
    pub fn describe_schema(&self) -> String {
        caps_to_names(self.schema).join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_outside_schema_is_noop() {
        let mut c = CapabilitySet::new(READ | REVIEW);
        c.set(OWNER, true);
        c.set_access("Submit", true);
        assert_eq!(c.granted(), 0);
        c.set(READ, true);
        assert!(c.has(READ));
        assert!(!c.has_access("Owner"));
    }

    #[test]
    fn overlay_only_adds_within_schema() {
        let mut c = CapabilitySet::new(READ | ACCEPT | REVIEW);
        c.set(READ, true);
        let donor = CapabilitySet::with_all(ALL_CAPS);
        c.overlay_from(&donor);
        assert_eq!(c.granted(), READ | ACCEPT | REVIEW);

        // overlaying an empty donor never removes
        c.overlay_from(&CapabilitySet::new(ALL_CAPS));
        assert_eq!(c.granted(), READ | ACCEPT | REVIEW);
    }

    #[test]
    fn describe_is_canonical_order() {
        let mut c = CapabilitySet::new(ALL_CAPS);
        c.set(CONSIDER_REVIEWS, true);
        c.set(OWNER, true);
        c.set(READ, true);
        assert_eq!(c.describe(), "Owner/Read/Consider_Reviews");
        assert_eq!(CapabilitySet::new(ALL_CAPS).describe(), "");
    }

    #[test]
    fn name_round_trip() {
        let mask = names_to_caps(&["Owner", "Send", "Bogus"]);
        assert_eq!(mask, OWNER | SEND);
        assert_eq!(caps_to_names(mask), vec!["Owner", "Send"]);
    }
}
