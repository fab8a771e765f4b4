//! CR message handlers
//!
//! The management verbs behind the `check_cr!` gate: catalog edits,
//! forced claim changes, the submission lock, roster row edits, and
//! the CSV report.

use crate::auth;
use crate::protocol::ServerMessage;
use crate::state::{submissions_csv, AppState, BoardAction, LedgerAction};
use crate::types::{Claimant, Role, Session};
use std::sync::Arc;

pub async fn handle_cr_login(
    state: &Arc<AppState>,
    student_id: String,
    name: String,
    password: String,
) -> Option<ServerMessage> {
    let student_id = student_id.trim().to_string();
    let name = name.trim().to_string();

    if student_id.is_empty() || name.is_empty() || password.trim().is_empty() {
        return Some(ServerMessage::Error {
            code: "MISSING_FIELDS".to_string(),
            msg: "Name, student ID, and password are required".to_string(),
        });
    }

    if !state.auth.validate(password.trim()) {
        tracing::warn!("rejected CR login for '{}'", name);
        return Some(ServerMessage::Error {
            code: "BAD_PASSWORD".to_string(),
            msg: "Incorrect password".to_string(),
        });
    }

    let ledger = state.ledger().await;
    let roll_no = auth::cr_roll_no(&ledger.student_list, &name);

    tracing::info!("CR login: {} (roll {})", name, roll_no);
    Some(ServerMessage::LoginOk {
        session: Session {
            id: student_id,
            name,
            roll_no,
            role: Role::Cr,
        },
    })
}

pub async fn handle_rename_word(
    state: &Arc<AppState>,
    word_id: i64,
    new_text: String,
) -> Option<ServerMessage> {
    if new_text.trim().is_empty() {
        return Some(ServerMessage::Error {
            code: "MISSING_FIELDS".to_string(),
            msg: "The new word text is required".to_string(),
        });
    }
    state
        .apply_board(BoardAction::Rename { word_id, new_text })
        .await;
    None
}

pub async fn handle_release_word(state: &Arc<AppState>, word_id: i64) -> Option<ServerMessage> {
    state.apply_board(BoardAction::Release { word_id }).await;
    None
}

pub async fn handle_assign_word(
    state: &Arc<AppState>,
    word_id: i64,
    student_id: String,
    name: String,
    roll_no: String,
) -> Option<ServerMessage> {
    if student_id.trim().is_empty() || name.trim().is_empty() {
        return Some(ServerMessage::Error {
            code: "MISSING_FIELDS".to_string(),
            msg: "Assignment needs the student's ID and name".to_string(),
        });
    }

    state
        .apply_board(BoardAction::Assign {
            word_id,
            claimant: Claimant {
                id: student_id.trim().to_string(),
                name: name.trim().to_string(),
                roll_no: roll_no.trim().to_string(),
            },
        })
        .await;
    None
}

pub async fn handle_add_word(
    state: &Arc<AppState>,
    text: String,
    category: String,
) -> Option<ServerMessage> {
    let changed = state.apply_board(BoardAction::AddWord { text, category }).await;
    if !changed {
        return Some(ServerMessage::Error {
            code: "INVALID_WORD".to_string(),
            msg: "Words need a non-empty text and an existing category".to_string(),
        });
    }
    None
}

pub async fn handle_add_category(state: &Arc<AppState>, name: String) -> Option<ServerMessage> {
    let changed = state.apply_board(BoardAction::AddCategory { name }).await;
    if !changed {
        return Some(ServerMessage::Error {
            code: "INVALID_CATEGORY".to_string(),
            msg: "Category names must be non-empty and unique".to_string(),
        });
    }
    None
}

pub async fn handle_rename_category(
    state: &Arc<AppState>,
    old_name: String,
    new_name: String,
) -> Option<ServerMessage> {
    state
        .apply_board(BoardAction::RenameCategory {
            old: old_name,
            new: new_name,
        })
        .await;
    None
}

pub async fn handle_toggle_lock(state: &Arc<AppState>) -> Option<ServerMessage> {
    state.apply_ledger(LedgerAction::ToggleLock).await;
    let locked = state.ledger().await.is_locked;
    tracing::info!("submission lock toggled: {}", locked);
    None
}

pub async fn handle_remove_submission(
    state: &Arc<AppState>,
    roll_no: String,
) -> Option<ServerMessage> {
    state
        .apply_ledger(LedgerAction::RemoveByRoll { roll_no })
        .await;
    None
}

pub async fn handle_edit_student_row(
    state: &Arc<AppState>,
    roll_no: String,
    new_name: String,
    new_link: String,
) -> Option<ServerMessage> {
    if state.ledger().await.student(&roll_no).is_none() {
        return Some(ServerMessage::Error {
            code: "UNKNOWN_ROLL".to_string(),
            msg: format!("No roster entry for roll number {roll_no}"),
        });
    }

    state
        .apply_ledger(LedgerAction::EditEntry {
            roll_no,
            new_name,
            new_link,
            at: chrono::Utc::now(),
        })
        .await;
    None
}

pub async fn handle_export_csv(state: &Arc<AppState>) -> Option<ServerMessage> {
    let ledger = state.ledger().await;
    let content = submissions_csv(&ledger);
    let filename = format!(
        "submissions-{}.csv",
        chrono::Local::now().format("%Y-%m-%d")
    );
    tracing::info!(
        "CSV export requested ({} roster rows, {} submissions)",
        ledger.student_list.len(),
        ledger.submissions.len()
    );
    Some(ServerMessage::CsvExport { filename, content })
}
