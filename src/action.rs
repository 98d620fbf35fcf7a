//! Closed enumeration of workflow actions
//!
//! An external dispatcher parses raw commands into `Action` values and
//! applies them; the match in `Acm::apply` is exhaustive, so adding an
//! action is a compile-visible change. The decision rides along as a raw
//! string so malformed decisions still reach the engine and get audited.

use serde::{Deserialize, Serialize};

use crate::engine::Acm;
use crate::error::Result;

/// One workflow request with its typed arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    AddSubject { subject: String, role: String },
    CreateObject { object: String, subject: String },
    Edit { object: String, subject: String },
    Read { object: String, subject: String },
    Submit { object: String, subject: String },
    Send { object: String, sender: String, target: String },
    Accept { object: String, subject: String },
    Review { object: String, subject: String },
    ConsiderReviews { object: String, subject: String, decision: String },
}

impl Acm {
    /// Apply one action to the system
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::AddSubject { subject, role } => self.add_subject(subject, role),
            Action::CreateObject { object, subject } => self.create_object(object, subject),
            Action::Edit { object, subject } => self.edit(object, subject),
            Action::Read { object, subject } => self.read(object, subject),
            Action::Submit { object, subject } => self.submit(object, subject),
            Action::Send { object, sender, target } => self.send(object, sender, target),
            Action::Accept { object, subject } => self.accept(object, subject),
            Action::Review { object, subject } => self.review(object, subject),
            Action::ConsiderReviews { object, subject, decision } => {
                self.consider_reviews(object, subject, decision)
            }
        }
    }
}
