//! The workflow engine: one aggregate owning policy, matrix, and log
//!
//! Every action handler follows the same shape: resolve the target cell(s),
//! check the required capability, mutate on success, and append exactly one
//! audit entry either way. Handlers are check-then-act and must not be
//! interleaved for the same pair; `Acm` is a plain value, so a concurrent
//! adaptation wraps one instance in one exclusive lock.

use tracing::{debug, info};

use crate::audit::{AuditEntry, AuditLog};
use crate::caps::{
    capability_names, CapabilitySet, ACCEPT, CONSIDER_REVIEWS, EDIT, OWNER, READ, REVIEW, SEND,
    SUBMIT,
};
use crate::error::{AcmError, Result};
use crate::matrix::{AccessMatrix, MatrixSnapshot};
use crate::policy::{
    is_editor_family, is_invitable, is_reviewer_family, Decision, RolePolicy, ADMINISTRATOR,
    ASSOCIATE_EDITOR, AUTHOR, EDITOR, REVIEWER,
};

/// The access-control system: role policy + access matrix + audit log.
///
/// The policy variant is a constructor argument; there is no global state.
#[derive(Debug, Clone)]
pub struct Acm {
    policy: RolePolicy,
    matrix: AccessMatrix,
    log: AuditLog,
}

impl Acm {
    /// New system with the given role policy
    pub fn new(policy: RolePolicy) -> Self {
        Acm { policy, matrix: AccessMatrix::new(), log: AuditLog::new() }
    }

    /// New system with the editorial-workflow policy
    pub fn editorial() -> Self {
        Acm::new(RolePolicy::editorial())
    }

    // ========================================================================
    // Workflow actions
    // ========================================================================

    /// Enroll a subject with a role. Creates one cell per existing
    /// manuscript from the role's default template.
    pub fn add_subject(&mut self, name: &str, role: &str) -> Result<()> {
        let mut effects = vec![format!("subject to add: {name}"), format!("role to give: {role}")];

        if self.matrix.subject_exists(name) {
            return Err(self.deny(name, "Add", effects, AcmError::DuplicateSubject(name.into())));
        }
        let Some(template) = self.policy.template(role) else {
            return Err(self.deny(name, "Add", effects, AcmError::UnknownRole(role.into())));
        };

        let row = vec![template.clone(); self.matrix.objects().len()];
        self.matrix.push_subject(name, role, row);
        effects.push(format!("enrolled {name} as {role}"));
        self.record(name, "Add", true, effects);
        Ok(())
    }

    /// Create a manuscript owned by `creator`. The creator's role must be
    /// able to own manuscripts; every enrolled subject gets a cell.
    pub fn create_object(&mut self, object: &str, creator: &str) -> Result<()> {
        let mut effects = Vec::new();

        if self.matrix.object_exists(object) {
            let err = AcmError::DuplicateObject(object.into());
            return Err(self.deny(creator, "Create", effects, err));
        }
        if !self.matrix.subject_exists(creator) {
            return Err(self.deny(creator, "Create", effects, AcmError::no_subject(creator)));
        }

        let creator_role = self.matrix.role_of(creator).unwrap_or_default().to_string();
        let creator_template = self
            .policy
            .template(&creator_role)
            .cloned()
            .unwrap_or_else(|| CapabilitySet::new(0));
        if !creator_template.schema_has(OWNER) {
            let err = AcmError::RoleNotPermitted {
                role: creator_role,
                attempted: "create a manuscript",
            };
            return Err(self.deny(creator, "Create", effects, err));
        }

        effects.push(format!("{creator} created manuscript: {object}"));
        let mut column = Vec::with_capacity(self.matrix.subject_count());
        for (subject, role) in self.matrix.subjects_and_roles() {
            if subject == creator {
                let mut cell = creator_template.clone();
                cell.set(OWNER | EDIT | READ | SUBMIT, true);
                effects.push(format!("gave subject \"{subject}\" owner access to \"{object}\""));
                column.push(cell);
            } else if role == ADMINISTRATOR {
                effects
                    .push(format!("gave administrator \"{subject}\" full access to \"{object}\""));
                column.push(
                    self.policy
                        .granted_template(ADMINISTRATOR)
                        .unwrap_or_else(|| CapabilitySet::new(0)),
                );
            } else {
                column.push(
                    self.policy.template(&role).cloned().unwrap_or_else(|| CapabilitySet::new(0)),
                );
            }
        }
        self.matrix.push_object(object, column);
        self.record(creator, "Create", true, effects);
        Ok(())
    }

    /// Edit a manuscript. Requires `Edit`; no mutation beyond logging.
    pub fn edit(&mut self, object: &str, subject: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Edit", effects, e));
        }
        if let Err(e) = self.require_cap(object, subject, EDIT, "Edit") {
            return Err(self.deny(subject, "Edit", effects, e));
        }
        effects.push(format!("{subject} edited manuscript: {object}"));
        self.record(subject, "Edit", true, effects);
        Ok(())
    }

    /// Read a manuscript. Requires `Read`; no mutation beyond logging.
    pub fn read(&mut self, object: &str, subject: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Read", effects, e));
        }
        if let Err(e) = self.require_cap(object, subject, READ, "Read") {
            return Err(self.deny(subject, "Read", effects, e));
        }
        effects.push(format!("{subject} read manuscript: {object}"));
        self.record(subject, "Read", true, effects);
        Ok(())
    }

    /// Submit a manuscript for consideration. Requires `Submit`. Every
    /// subject whose role is Editor gains the Editor capabilities on this
    /// manuscript, with `Consider_Reviews` held back until a review lands.
    pub fn submit(&mut self, object: &str, subject: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Submit", effects, e));
        }
        if let Err(e) = self.require_cap(object, subject, SUBMIT, "Submit") {
            return Err(self.deny(subject, "Submit", effects, e));
        }

        effects.push(format!("{subject} submitted: {object}"));
        if let Some(editor_caps) = self.policy.granted_template(EDITOR) {
            if let Some(column) = self.matrix.column_mut(object) {
                for (name, role, cell) in column {
                    if role == EDITOR {
                        cell.overlay_from(&editor_caps);
                        // a decision requires a prior review
                        cell.set(CONSIDER_REVIEWS, false);
                        effects.push(format!("gave {name}: {}", cell.describe()));
                    }
                }
            }
        }
        self.record(subject, "Submit", true, effects);
        Ok(())
    }

    /// Invite `target` to a manuscript. The target's role must be
    /// invitable and the sender must hold `Send`; the target gains
    /// `Accept`.
    pub fn send(&mut self, object: &str, sender: &str, target: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, sender) {
            return Err(self.deny(sender, "Send", effects, e));
        }
        if !self.matrix.subject_exists(target) {
            return Err(self.deny(sender, "Send", effects, AcmError::no_subject(target)));
        }

        let target_role = self.matrix.role_of(target).unwrap_or_default().to_string();
        if !is_invitable(&target_role) {
            let err = AcmError::RoleNotPermitted {
                role: target_role,
                attempted: "accept manuscript invitations",
            };
            return Err(self.deny(sender, "Send", effects, err));
        }

        // A sender whose cell schema has no Send at all cannot invite by
        // role; one whose flag is merely unset is denied by capability.
        let sender_can_send = self.matrix.cell(object, sender).is_some_and(|c| c.schema_has(SEND));
        if !sender_can_send {
            let err = AcmError::RoleNotPermitted {
                role: self.matrix.role_of(sender).unwrap_or_default().to_string(),
                attempted: "invite reviewers",
            };
            return Err(self.deny(sender, "Send", effects, err));
        }
        if let Err(e) = self.require_cap(object, sender, SEND, "Send") {
            return Err(self.deny(sender, "Send", effects, e));
        }

        if let Some(cell) = self.matrix.cell_mut(object, target) {
            cell.set(ACCEPT, true);
        }
        effects.push(format!("gave {target} Accept"));
        self.record(sender, "Send", true, effects);
        Ok(())
    }

    /// Accept an invitation. Requires `Accept`. Editor-family roles gain
    /// Associate_Editor access, reviewer-family roles gain Reviewer access;
    /// the invitation is then consumed.
    pub fn accept(&mut self, object: &str, subject: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Accept", effects, e));
        }
        if let Err(e) = self.require_cap(object, subject, ACCEPT, "Accept") {
            return Err(self.deny(subject, "Accept", effects, e));
        }

        let role = self.matrix.role_of(subject).unwrap_or_default().to_string();
        if role == ADMINISTRATOR {
            effects.push(format!("administrator {subject} accepted; access unchanged"));
            self.record(subject, "Accept", true, effects);
            return Ok(());
        }

        let overlay = if is_editor_family(&role) {
            self.policy.granted_template(ASSOCIATE_EDITOR)
        } else if is_reviewer_family(&role) {
            self.policy.granted_template(REVIEWER)
        } else {
            None
        };
        if let Some(cell) = self.matrix.cell_mut(object, subject) {
            if let Some(caps) = overlay {
                cell.overlay_from(&caps);
            }
            // invitation is single-use
            cell.set(ACCEPT, false);
            effects.push(format!("removed {subject} Accept"));
            effects.push(format!("gave {subject}: {}", cell.describe()));
        }
        self.record(subject, "Accept", true, effects);
        Ok(())
    }

    /// Review a manuscript. Requires `Review`. A subject reviews at most
    /// once: `Review` and `Send` are consumed, `Consider_Reviews` opens up,
    /// and non-owners lose `Read`.
    pub fn review(&mut self, object: &str, subject: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Review", effects, e));
        }
        if let Err(e) = self.require_cap(object, subject, REVIEW, "Review") {
            return Err(self.deny(subject, "Review", effects, e));
        }

        if self.matrix.role_of(subject) == Some(ADMINISTRATOR) {
            effects.push(format!("administrator {subject} reviewed; access unchanged"));
            self.record(subject, "Review", true, effects);
            return Ok(());
        }

        if let Some(cell) = self.matrix.cell_mut(object, subject) {
            cell.set(REVIEW, false);
            cell.set(SEND, false);
            cell.set(CONSIDER_REVIEWS, true);
            if !cell.has(OWNER) {
                cell.set(READ, false);
            }
            effects.push(format!("removed {subject} Review"));
            effects.push(format!("now {subject}: {}", cell.describe()));
        }
        self.record(subject, "Review", true, effects);
        Ok(())
    }

    /// Record the final decision on a manuscript. Requires
    /// `Consider_Reviews` and a decision from the enumerated option set.
    /// All access is revoked afterwards unless the subject owns the
    /// manuscript, in which case the author capabilities remain.
    pub fn consider_reviews(&mut self, object: &str, subject: &str, decision: &str) -> Result<()> {
        let mut effects = Vec::new();
        if let Err(e) = self.require_pair(object, subject) {
            return Err(self.deny(subject, "Consider_Reviews", effects, e));
        }
        let decision: Decision = match decision.parse() {
            Ok(d) => d,
            Err(e) => return Err(self.deny(subject, "Consider_Reviews", effects, e)),
        };
        if let Err(e) = self.require_cap(object, subject, CONSIDER_REVIEWS, "Consider_Reviews") {
            return Err(self.deny(subject, "Consider_Reviews", effects, e));
        }

        effects.push(format!("{subject} decided {decision} for {object}"));
        if self.matrix.role_of(subject) == Some(ADMINISTRATOR) {
            self.record(subject, "Consider_Reviews", true, effects);
            return Ok(());
        }

        let author_caps = self.policy.granted_template(AUTHOR);
        if let Some(cell) = self.matrix.cell_mut(object, subject) {
            effects.push(format!("removed {subject}: {}", cell.describe()));
            cell.revoke_all();
            cell.set(OWNER, true);
            if cell.has(OWNER) {
                // the owner keeps author access after the decision
                if let Some(caps) = author_caps {
                    cell.overlay_from(&caps);
                }
                effects.push(format!("gave {subject}: {}", cell.describe()));
            }
        }
        self.record(subject, "Consider_Reviews", true, effects);
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Check a capability by name. Pure read; false when either side is
    /// missing or the name is unknown to the cell's schema.
    pub fn has_capability(&self, object: &str, subject: &str, capability: &str) -> bool {
        self.matrix.has_capability(object, subject, capability)
    }

    /// The role of a subject, if enrolled
    pub fn role_of(&self, subject: &str) -> Option<&str> {
        self.matrix.role_of(subject)
    }

    /// One capability cell, read-only
    pub fn cell(&self, object: &str, subject: &str) -> Option<&CapabilitySet> {
        self.matrix.cell(object, subject)
    }

    /// Display-ready snapshot of the whole matrix
    pub fn snapshot(&self) -> MatrixSnapshot {
        self.matrix.snapshot()
    }

    /// (subject, role) pairs in enrollment order
    pub fn subjects_and_roles(&self) -> Vec<(String, String)> {
        self.matrix.subjects_and_roles()
    }

    /// The complete request log
    pub fn audit(&self) -> &AuditLog {
        &self.log
    }

    /// Log entries for one subject, in insertion order
    pub fn audit_by_subject<'a>(&'a self, subject: &'a str) -> Vec<&'a AuditEntry> {
        self.log.by_subject(subject).collect()
    }

    /// Log entries with one outcome, in insertion order
    pub fn audit_by_permitted(&self, permitted: bool) -> Vec<&AuditEntry> {
        self.log.by_permitted(permitted).collect()
    }

    /// The capability schema of a role, joined by `/`
    pub fn describe_role(&self, role: &str) -> Option<String> {
        self.policy.describe(role)
    }

    /// Role names in policy-table order
    pub fn role_names(&self) -> Vec<&str> {
        self.policy.role_names().collect()
    }

    /// Every capability name in the system, in canonical order
    pub fn capability_names(&self) -> Vec<&'static str> {
        capability_names()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Require object and subject to exist (object first, like a cell lookup)
    fn require_pair(&self, object: &str, subject: &str) -> Result<()> {
        if !self.matrix.object_exists(object) {
            return Err(AcmError::no_object(object));
        }
        if !self.matrix.subject_exists(subject) {
            return Err(AcmError::no_subject(subject));
        }
        Ok(())
    }

    /// Require a capability on the current stored cell
    fn require_cap(
        &self,
        object: &str,
        subject: &str,
        bits: u64,
        name: &'static str,
    ) -> Result<()> {
        if self.matrix.check(object, subject, bits) {
            Ok(())
        } else {
            Err(AcmError::CapabilityDenied {
                subject: subject.to_string(),
                capability: name,
                object: object.to_string(),
            })
        }
    }

    /// Append the one audit entry for a request
    fn record(&mut self, subject: &str, action: &str, permitted: bool, effects: Vec<String>) {
        if permitted {
            info!(subject = %subject, action = %action, "request granted");
        }
        self.log.append(AuditEntry {
            subject: subject.to_string(),
            action: action.to_string(),
            permitted,
            effects,
        });
    }

    /// Log a denial and hand the error back to the caller
    fn deny(
        &mut self,
        subject: &str,
        action: &str,
        mut effects: Vec<String>,
        err: AcmError,
    ) -> AcmError {
        debug!(subject = %subject, action = %action, error = %err, "request denied");
        effects.push(err.to_string());
        self.record(subject, action, false, effects);
        err
    }
}

impl Default for Acm {
    fn default() -> Self {
        Acm::editorial()
    }
}
