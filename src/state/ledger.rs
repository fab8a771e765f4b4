//! The submission ledger.
//!
//! Same shape as the board update logic: pure functions over the
//! whole document, last-write-wins per roll number, silent no-ops for
//! rejected actions. The lock gates student-initiated writes only;
//! CR verbs are lock-exempt by construction.

use chrono::{DateTime, Utc};

use crate::types::{Submission, SubmissionLedger};

#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Student insert-or-replace, stamped by the coordinator.
    Submit {
        roll_no: String,
        name: String,
        link: String,
        at: DateTime<Utc>,
    },
    /// Student deleting their own entry.
    RemoveOwn { roll_no: String },
    /// CR delete, lock-exempt.
    RemoveByRoll { roll_no: String },
    /// CR global switch over student-initiated edits.
    ToggleLock,
    /// CR compound row edit: rename the roster record and upsert or
    /// delete the submission depending on whether the link is blank.
    EditEntry {
        roll_no: String,
        new_name: String,
        new_link: String,
        at: DateTime<Utc>,
    },
}

impl SubmissionLedger {
    pub fn apply(&self, action: &LedgerAction) -> SubmissionLedger {
        match action {
            LedgerAction::Submit {
                roll_no,
                name,
                link,
                at,
            } => self.submit(roll_no, name, link, *at),
            LedgerAction::RemoveOwn { roll_no } => {
                if self.is_locked {
                    self.clone()
                } else {
                    self.remove(roll_no)
                }
            }
            LedgerAction::RemoveByRoll { roll_no } => self.remove(roll_no),
            LedgerAction::ToggleLock => {
                let mut next = self.clone();
                next.is_locked = !next.is_locked;
                next
            }
            LedgerAction::EditEntry {
                roll_no,
                new_name,
                new_link,
                at,
            } => self.edit_entry(roll_no, new_name, new_link, *at),
        }
    }

    fn submit(&self, roll_no: &str, name: &str, link: &str, at: DateTime<Utc>) -> SubmissionLedger {
        let link = link.trim();
        if self.is_locked || link.is_empty() || roll_no.trim().is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        next.submissions.retain(|s| s.student_roll_no != roll_no);
        next.submissions.push(Submission {
            student_roll_no: roll_no.to_string(),
            student_name: name.to_string(),
            video_link: link.to_string(),
            submitted_at: at.to_rfc3339(),
        });
        next
    }

    fn remove(&self, roll_no: &str) -> SubmissionLedger {
        let mut next = self.clone();
        next.submissions.retain(|s| s.student_roll_no != roll_no);
        next
    }

    fn edit_entry(
        &self,
        roll_no: &str,
        new_name: &str,
        new_link: &str,
        at: DateTime<Utc>,
    ) -> SubmissionLedger {
        if self.student(roll_no).is_none() {
            return self.clone();
        }
        let new_name = new_name.trim();
        let new_link = new_link.trim();

        let mut next = self.clone();
        if !new_name.is_empty() {
            for s in &mut next.student_list {
                if s.roll_no == roll_no {
                    s.name = new_name.to_string();
                }
            }
        }
        next.submissions.retain(|s| s.student_roll_no != roll_no);
        if !new_link.is_empty() {
            let name = next
                .student(roll_no)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            next.submissions.push(Submission {
                student_roll_no: roll_no.to_string(),
                student_name: name,
                video_link: new_link.to_string(),
                submitted_at: at.to_rfc3339(),
            });
        }
        next
    }
}
