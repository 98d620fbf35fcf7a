//! capmat - capability-based access control matrix for editorial workflows
//!
//! Subjects (users) and objects (manuscripts) meet in a matrix of
//! capability cells; workflow actions (create, edit, read, submit, invite,
//! accept, review, decide) check and mutate those cells under a role
//! policy, and every request lands in an append-only audit log.
//!
//! ```
//! use capmat::Acm;
//!
//! let mut acm = Acm::editorial();
//! acm.add_subject("alice", "Author").unwrap();
//! acm.add_subject("root", "Administrator").unwrap();
//! acm.create_object("M1", "alice").unwrap();
//!
//! assert!(acm.has_capability("M1", "alice", "Owner"));
//! assert!(acm.has_capability("M1", "root", "Read"));
//! assert_eq!(acm.audit().len(), 3);
//! ```

mod action;
mod audit;
mod caps;
mod engine;
mod error;
mod matrix;
mod policy;

pub use action::Action;
pub use audit::{AuditEntry, AuditLog};
pub use caps::{
    cap_bit, capability_names, caps_to_names, names_to_caps, CapabilitySet, ACCEPT, ALL_CAPS,
    CONSIDER_REVIEWS, EDIT, OWNER, READ, REVIEW, SEND, SUBMIT,
};
pub use engine::Acm;
pub use error::{AcmError, Result};
pub use policy::{
    is_editor_family, is_invitable, is_reviewer_family, Decision, RolePolicy, ADMINISTRATOR,
    ASSOCIATE_EDITOR, AUTHOR, AUTHOR_ASSOCIATE_EDITOR, AUTHOR_REVIEWER, EDITOR, REVIEWER,
};
