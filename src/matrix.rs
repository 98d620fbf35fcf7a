//! The access matrix: subjects x objects grid of capability cells
//!
//! Backed by parallel per-subject rows, one cell per existing object. Rows
//! and columns grow lazily: a new subject gets a cell per existing object,
//! a new object gets a cell per existing subject. Nothing is ever deleted
//! and a subject's role never changes, so indexes are stable.

use serde::Serialize;

use crate::caps::{cap_bit, CapabilitySet};
use crate::policy::ADMINISTRATOR;

/// The subject x object capability grid plus subject->role tracking
#[derive(Debug, Clone, Default)]
pub struct AccessMatrix {
    subjects: Vec<String>,
    roles: Vec<String>,
    objects: Vec<String>,
    /// cells[subject_index][object_index]
    cells: Vec<Vec<CapabilitySet>>,
}

/// One subject's row of a matrix snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub subject: String,
    pub role: String,
    /// Granted-capability descriptions, one per object in snapshot order
    pub cells: Vec<String>,
}

/// A display-ready, point-in-time view of the matrix
#[derive(Debug, Clone, Serialize)]
pub struct MatrixSnapshot {
    pub objects: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl AccessMatrix {
    /// New empty matrix
    pub fn new() -> Self {
        AccessMatrix::default()
    }

    #[inline]
    fn subject_index(&self, subject: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s == subject)
    }

    #[inline]
    fn object_index(&self, object: &str) -> Option<usize> {
        self.objects.iter().position(|o| o == object)
    }

    /// Check if a subject is enrolled
    pub fn subject_exists(&self, subject: &str) -> bool {
        self.subject_index(subject).is_some()
    }

    /// Check if a manuscript exists
    pub fn object_exists(&self, object: &str) -> bool {
        self.object_index(object).is_some()
    }

    /// The role of a subject, if enrolled
    pub fn role_of(&self, subject: &str) -> Option<&str> {
        self.subject_index(subject).map(|i| self.roles[i].as_str())
    }

    /// Number of enrolled subjects
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Manuscript names in creation order
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    /// (subject, role) pairs in enrollment order
    pub fn subjects_and_roles(&self) -> Vec<(String, String)> {
        self.subjects
            .iter()
            .cloned()
            .zip(self.roles.iter().cloned())
            .collect()
    }

    /// Append a subject with a pre-built row (one cell per existing object).
    /// The caller guarantees the name is fresh and the row length matches.
    pub(crate) fn push_subject(&mut self, name: &str, role: &str, row: Vec<CapabilitySet>) {
        debug_assert_eq!(row.len(), self.objects.len());
        self.subjects.push(name.to_string());
        self.roles.push(role.to_string());
        self.cells.push(row);
    }

    /// Append an object with a pre-built column (one cell per existing
    /// subject, in enrollment order). The caller guarantees the name is
    /// fresh and the column length matches.
    pub(crate) fn push_object(&mut self, name: &str, column: Vec<CapabilitySet>) {
        debug_assert_eq!(column.len(), self.subjects.len());
        self.objects.push(name.to_string());
        for (row, cell) in self.cells.iter_mut().zip(column) {
            row.push(cell);
        }
    }

    /// Read access to one cell
    pub fn cell(&self, object: &str, subject: &str) -> Option<&CapabilitySet> {
        let s = self.subject_index(subject)?;
        let o = self.object_index(object)?;
        Some(&self.cells[s][o])
    }

    /// Mutable access to one cell, engine-internal only
    pub(crate) fn cell_mut(&mut self, object: &str, subject: &str) -> Option<&mut CapabilitySet> {
        let s = self.subject_index(subject)?;
        let o = self.object_index(object)?;
        Some(&mut self.cells[s][o])
    }

    /// Check a capability by bit mask. False when either side is missing.
    /// Administrators satisfy any capability known to the cell's schema,
    /// regardless of stored flags.
    pub fn check(&self, object: &str, subject: &str, bits: u64) -> bool {
        let (Some(s), Some(o)) = (self.subject_index(subject), self.object_index(object)) else {
            return false;
        };
        let cell = &self.cells[s][o];
        if self.roles[s] == ADMINISTRATOR {
            return cell.schema_has(bits);
        }
        cell.has(bits)
    }

    /// Check a capability by name. Unknown names are false.
    pub fn has_capability(&self, object: &str, subject: &str, name: &str) -> bool {
        cap_bit(name).is_some_and(|b| self.check(object, subject, b))
    }

    /// Point-in-time snapshot for display
    pub fn snapshot(&self) -> MatrixSnapshot {
        MatrixSnapshot {
            objects: self.objects.clone(),
            rows: self
                .subjects
                .iter()
                .enumerate()
                .map(|(i, subject)| MatrixRow {
                    subject: subject.clone(),
                    role: self.roles[i].clone(),
                    cells: self.cells[i].iter().map(|c| c.describe()).collect(),
                })
                .collect(),
        }
    }

    /// Every row's cell for one object, engine-internal. Yields
    /// (subject, role, cell) in enrollment order.
    pub(crate) fn column_mut<'a>(
        &'a mut self,
        object: &str,
    ) -> Option<impl Iterator<Item = (&'a str, &'a str, &'a mut CapabilitySet)> + 'a> {
        let o = self.object_index(object)?;
        Some(
            self.subjects
                .iter()
                .zip(self.roles.iter())
                .zip(self.cells.iter_mut())
                .map(move |((s, r), row)| (s.as_str(), r.as_str(), &mut row[o])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{ALL_CAPS, OWNER, READ};

    fn matrix_with(role: &str) -> AccessMatrix {
        let mut m = AccessMatrix::new();
        m.push_subject("ann", role, vec![]);
        m.push_object("M1", vec![CapabilitySet::new(OWNER | READ)]);
        m
    }

    #[test]
    fn missing_pairs_are_false() {
        let m = matrix_with("Author");
        assert!(!m.has_capability("M1", "ghost", "Read"));
        assert!(!m.has_capability("M9", "ann", "Read"));
        assert!(m.cell("M1", "ghost").is_none());
    }

    #[test]
    fn admin_bypass_ignores_stored_flags() {
        let mut m = AccessMatrix::new();
        m.push_subject("root", ADMINISTRATOR, vec![]);
        // all-false cell, full schema
        m.push_object("M1", vec![CapabilitySet::new(ALL_CAPS)]);
        assert!(m.has_capability("M1", "root", "Owner"));
        assert!(m.has_capability("M1", "root", "Consider_Reviews"));
        // still false for names the cell's schema does not know
        assert!(!m.has_capability("M1", "root", "Publish"));
    }

    #[test]
    fn non_admin_needs_stored_flag() {
        let mut m = matrix_with("Author");
        assert!(!m.has_capability("M1", "ann", "Read"));
        m.cell_mut("M1", "ann").unwrap().set(READ, true);
        assert!(m.has_capability("M1", "ann", "Read"));
    }

    #[test]
    fn snapshot_orders_follow_insertion() {
        let mut m = AccessMatrix::new();
        m.push_subject("b", "Reviewer", vec![]);
        m.push_subject("a", "Author", vec![]);
        m.push_object("M2", vec![CapabilitySet::new(READ); 2]);
        m.push_object("M1", vec![CapabilitySet::new(READ); 2]);
        let snap = m.snapshot();
        assert_eq!(snap.objects, vec!["M2", "M1"]);
        assert_eq!(snap.rows[0].subject, "b");
        assert_eq!(snap.rows[1].subject, "a");
        assert_eq!(snap.rows[0].cells.len(), 2);
    }
}
