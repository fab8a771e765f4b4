//! Student message handlers
//!
//! Logins and the student-reachable mutations. Validation here is
//! advisory (spelled-out errors for the UI); the pure state updates
//! remain the authority on what actually changes.

use crate::auth;
use crate::protocol::ServerMessage;
use crate::state::{AppState, BoardAction, LedgerAction};
use crate::types::{Role, Session};
use std::sync::Arc;

pub async fn handle_student_login(
    state: &Arc<AppState>,
    student_id: String,
    name: String,
    roll_no: String,
) -> Option<ServerMessage> {
    let student_id = student_id.trim().to_string();
    let name = name.trim().to_string();
    let roll_no = roll_no.trim().to_string();

    if student_id.is_empty() || name.is_empty() || roll_no.is_empty() {
        return Some(ServerMessage::Error {
            code: "MISSING_FIELDS".to_string(),
            msg: "Student ID, full name, and roll number are required".to_string(),
        });
    }

    let ledger = state.ledger().await;
    if !auth::roster_match(&ledger.student_list, &roll_no, &name) {
        return Some(ServerMessage::Error {
            code: "INVALID_ROSTER".to_string(),
            msg: "Invalid name or roll number. Please check the class list".to_string(),
        });
    }

    tracing::info!("student login: roll {}", roll_no);
    Some(ServerMessage::LoginOk {
        session: Session {
            id: student_id,
            name,
            roll_no,
            role: Role::Student,
        },
    })
}

/// A click on a word card: claim, toggle off, or swap. Clicks on a
/// word held by someone else fall through as silent no-ops — the
/// client already renders those cards disabled.
pub async fn handle_word_click(
    state: &Arc<AppState>,
    session: &Session,
    word_id: i64,
) -> Option<ServerMessage> {
    if state.board().await.word(word_id).is_none() {
        return Some(ServerMessage::Error {
            code: "WORD_NOT_FOUND".to_string(),
            msg: format!("No word with id {word_id}"),
        });
    }

    state
        .apply_board(BoardAction::WordClick {
            word_id,
            actor: session.claimant(),
        })
        .await;
    // Every viewer, including this one, gets the new document via the
    // update broadcast.
    None
}

pub async fn handle_submit_link(
    state: &Arc<AppState>,
    session: &Session,
    video_link: String,
) -> Option<ServerMessage> {
    let video_link = video_link.trim().to_string();
    if video_link.is_empty() {
        return Some(ServerMessage::Error {
            code: "MISSING_FIELDS".to_string(),
            msg: "A video link is required".to_string(),
        });
    }

    if state.ledger().await.is_locked {
        return Some(ServerMessage::Error {
            code: "SUBMISSIONS_LOCKED".to_string(),
            msg: "Submissions are locked by the CR".to_string(),
        });
    }

    state
        .apply_ledger(LedgerAction::Submit {
            roll_no: session.roll_no.clone(),
            name: session.name.clone(),
            link: video_link,
            at: chrono::Utc::now(),
        })
        .await;
    None
}

pub async fn handle_remove_submission(
    state: &Arc<AppState>,
    session: &Session,
) -> Option<ServerMessage> {
    if state.ledger().await.is_locked {
        return Some(ServerMessage::Error {
            code: "SUBMISSIONS_LOCKED".to_string(),
            msg: "Submissions are locked by the CR".to_string(),
        });
    }

    state
        .apply_ledger(LedgerAction::RemoveOwn {
            roll_no: session.roll_no.clone(),
        })
        .await;
    None
}
