//! Role policy table and workflow decisions
//!
//! The policy table maps each role name to a template capability set: the
//! schema a fresh cell gets for that role plus its default grants. It is
//! built once and injected into the engine, never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::caps::{
    CapabilitySet, ACCEPT, ALL_CAPS, CONSIDER_REVIEWS, EDIT, OWNER, READ, REVIEW, SEND, SUBMIT,
};
use crate::error::AcmError;

// Role names
pub const AUTHOR: &str = "Author";
pub const EDITOR: &str = "Editor";
pub const ASSOCIATE_EDITOR: &str = "Associate_Editor";
pub const REVIEWER: &str = "Reviewer";
pub const ADMINISTRATOR: &str = "Administrator";
pub const AUTHOR_ASSOCIATE_EDITOR: &str = "Author/Associate_Editor";
pub const AUTHOR_REVIEWER: &str = "Author/Reviewer";

/// Maps role names to their template capability sets.
///
/// Immutable after construction; the engine takes it as a constructor
/// argument so policy variants are values, not subtypes.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    roles: Vec<(String, CapabilitySet)>,
}

impl RolePolicy {
    /// Build a policy from (role name, template) pairs
    pub fn new(roles: Vec<(String, CapabilitySet)>) -> Self {
        RolePolicy { roles }
    }

    /// The fixed editorial-workflow policy table
    pub fn editorial() -> Self {
        let entry = |name: &str, tpl: CapabilitySet| (name.to_string(), tpl);
        RolePolicy {
            roles: vec![
                entry(AUTHOR, CapabilitySet::new(OWNER | EDIT | READ | SUBMIT)),
                entry(EDITOR, CapabilitySet::new(READ | SEND | REVIEW | CONSIDER_REVIEWS)),
                entry(
                    ASSOCIATE_EDITOR,
                    CapabilitySet::new(READ | SEND | ACCEPT | REVIEW | CONSIDER_REVIEWS),
                ),
                entry(REVIEWER, CapabilitySet::new(READ | ACCEPT | REVIEW)),
                entry(ADMINISTRATOR, CapabilitySet::with_all(ALL_CAPS)),
                entry(AUTHOR_ASSOCIATE_EDITOR, CapabilitySet::new(ALL_CAPS)),
                entry(
                    AUTHOR_REVIEWER,
                    CapabilitySet::new(OWNER | EDIT | READ | SUBMIT | ACCEPT | REVIEW),
                ),
            ],
        }
    }

    /// Template capability set for a role
    pub fn template(&self, role: &str) -> Option<&CapabilitySet> {
        self.roles.iter().find(|(n, _)| n == role).map(|(_, t)| t)
    }

    /// Check if a role exists in the table
    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|(n, _)| n == role)
    }

    /// Role names in table order
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|(n, _)| n.as_str())
    }

    /// The full capability schema of a role, joined by `/`
    pub fn describe(&self, role: &str) -> Option<String> {
        self.template(role).map(|t| t.describe_schema())
    }

    /// A fully-granted copy of a role's template, used as an overlay source
    /// when a workflow step confers that role's access
    pub(crate) fn granted_template(&self, role: &str) -> Option<CapabilitySet> {
        self.template(role).map(|t| CapabilitySet::with_all(t.schema()))
    }
}

/// Roles that gain Associate_Editor access when accepting an invitation
pub fn is_editor_family(role: &str) -> bool {
    matches!(role, ASSOCIATE_EDITOR | AUTHOR_ASSOCIATE_EDITOR | ADMINISTRATOR)
}

/// Roles that gain Reviewer access when accepting an invitation
pub fn is_reviewer_family(role: &str) -> bool {
    matches!(role, REVIEWER | AUTHOR_REVIEWER | ADMINISTRATOR)
}

/// Roles that may be invited to a manuscript. Administrators are not
/// invitable; they already hold full access to every object.
pub fn is_invitable(role: &str) -> bool {
    matches!(
        role,
        REVIEWER | AUTHOR_REVIEWER | ASSOCIATE_EDITOR | AUTHOR_ASSOCIATE_EDITOR
    )
}

/// The enumerated outcomes a Consider_Reviews action may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    AcceptMinor,
    AcceptMajor,
    Reject,
    Report,
}

impl Decision {
    /// Canonical wire spelling of the decision
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "Accept",
            Decision::AcceptMinor => "Accept_Minor",
            Decision::AcceptMajor => "Accept_Major",
            Decision::Reject => "Reject",
            Decision::Report => "Report",
        }
    }
}

impl FromStr for Decision {
    type Err = AcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accept" => Ok(Decision::Accept),
            "Accept_Minor" => Ok(Decision::AcceptMinor),
            "Accept_Major" => Ok(Decision::AcceptMajor),
            "Reject" => Ok(Decision::Reject),
            "Report" => Ok(Decision::Report),
            other => Err(AcmError::InvalidDecision(other.to_string())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
