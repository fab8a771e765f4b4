use serde::{Deserialize, Serialize};

use crate::types::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Student login, validated against the roster.
    StudentLogin {
        student_id: String,
        name: String,
        roll_no: String,
    },
    /// CR login, gated by the daily password.
    CrLogin {
        student_id: String,
        name: String,
        password: String,
    },
    /// A click on a word card. Claim, toggle off, or swap depending on
    /// what the actor currently holds.
    WordClick {
        word_id: WordId,
    },
    /// Student inserting or replacing their own video link.
    SubmitLink {
        video_link: String,
    },
    /// Student deleting their own submission.
    RemoveSubmission,
    // CR-only messages
    CrRenameWord {
        word_id: WordId,
        new_text: String,
    },
    CrReleaseWord {
        word_id: WordId,
    },
    /// Force-assign a word to a student, releasing whatever they held.
    CrAssignWord {
        word_id: WordId,
        student_id: String,
        name: String,
        roll_no: String,
    },
    CrAddWord {
        text: String,
        category: String,
    },
    CrAddCategory {
        name: String,
    },
    CrRenameCategory {
        old_name: String,
        new_name: String,
    },
    /// Flip the global submission lock.
    CrToggleLock,
    /// Delete any student's submission, lock-exempt.
    CrRemoveSubmission {
        roll_no: String,
    },
    /// Compound row edit: roster rename + submission upsert/delete.
    CrEditStudentRow {
        roll_no: String,
        new_name: String,
        new_link: String,
    },
    /// Request the submission report for client-side download.
    CrExportCsv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame on every connection: protocol id plus the full
    /// shared document, so the client renders without a second round
    /// trip.
    Welcome {
        protocol: String,
        server_now: String,
        words: Vec<Word>,
        categories: Vec<String>,
        submissions: Vec<Submission>,
        student_list: Vec<StudentRecord>,
        is_locked: bool,
    },
    /// Successful login; the client holds this for the session.
    LoginOk {
        session: Session,
    },
    /// Wholesale replacement of the word-catalog document.
    BoardUpdate {
        words: Vec<Word>,
        categories: Vec<String>,
    },
    /// Wholesale replacement of the submission-portal document.
    LedgerUpdate {
        submissions: Vec<Submission>,
        student_list: Vec<StudentRecord>,
        is_locked: bool,
    },
    /// Periodic submitted/total counts for the progress bar.
    SubmissionProgress {
        submitted: usize,
        total: usize,
        seq: u64,
    },
    /// CSV payload for the CR's client-side file save.
    CsvExport {
        filename: String,
        content: String,
    },
    Error {
        code: String,
        msg: String,
    },
}
