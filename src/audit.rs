//! Append-only audit log of access requests
//!
//! Every request against the engine - permitted, denied, or malformed -
//! appends exactly one entry, so the log is a complete request history.
//! Entries are immutable once appended and iterate in insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One logged request: who asked for what, the outcome, and the effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The subject the request was attributed to (may be empty for
    /// requests that never resolved a subject)
    pub subject: String,
    /// The requested action name, e.g. "Edit" or "Consider_Reviews"
    pub action: String,
    /// Whether the request was granted
    pub permitted: bool,
    /// Free-text effect notes, in the order they happened
    pub effects: Vec<String>,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "User \"{}\" requested \"{}\". The request was {}",
            self.subject,
            self.action,
            if self.permitted { "granted" } else { "denied" }
        )?;
        for effect in &self.effects {
            writeln!(f, "{effect}")?;
        }
        Ok(())
    }
}

/// Append-only, process-lifetime request log
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// New empty log
    pub fn new() -> Self {
        AuditLog::default()
    }

    pub(crate) fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    /// Entries whose subject matches exactly, in insertion order
    pub fn by_subject<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a AuditEntry> {
        self.entries.iter().filter(move |e| e.subject == subject)
    }

    /// Entries with the given outcome, in insertion order
    pub fn by_permitted(&self, permitted: bool) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(move |e| e.permitted == permitted)
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
