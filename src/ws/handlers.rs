//! WebSocket message dispatch
//!
//! Authorization is checked here, then dispatched to role-specific
//! handler modules. The state machines below stay silent on rejected
//! actions; anything a client should hear about is answered here as an
//! `Error { code, msg }`.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Role, Session};
use std::sync::Arc;

use super::{cr, student};

/// Macro to check CR authorization and return early if unauthorized
macro_rules! check_cr {
    ($session:expr, $action:expr) => {
        match $session {
            Some(s) if s.role == Role::Cr => {}
            _ => {
                return Some(ServerMessage::Error {
                    code: "UNAUTHORIZED".to_string(),
                    msg: format!("Only the CR can {}", $action),
                })
            }
        }
    };
}

/// Macro to require any logged-in session
macro_rules! check_session {
    ($session:expr, $action:expr) => {
        match $session {
            Some(s) => s,
            None => {
                return Some(ServerMessage::Error {
                    code: "NOT_LOGGED_IN".to_string(),
                    msg: format!("Log in before you {}", $action),
                })
            }
        }
    };
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    session: Option<&Session>,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Logins
        ClientMessage::StudentLogin {
            student_id,
            name,
            roll_no,
        } => student::handle_student_login(state, student_id, name, roll_no).await,

        ClientMessage::CrLogin {
            student_id,
            name,
            password,
        } => cr::handle_cr_login(state, student_id, name, password).await,

        // Word claims (students and the CR's own card clicks)
        ClientMessage::WordClick { word_id } => {
            let session = check_session!(session, "claim a word");
            student::handle_word_click(state, session, word_id).await
        }

        // Submission portal, student side
        ClientMessage::SubmitLink { video_link } => {
            let session = check_session!(session, "submit a link");
            student::handle_submit_link(state, session, video_link).await
        }

        ClientMessage::RemoveSubmission => {
            let session = check_session!(session, "remove your submission");
            student::handle_remove_submission(state, session).await
        }

        // CR-only commands (authorization checked before dispatch)
        ClientMessage::CrRenameWord { word_id, new_text } => {
            check_cr!(session, "rename words");
            cr::handle_rename_word(state, word_id, new_text).await
        }

        ClientMessage::CrReleaseWord { word_id } => {
            check_cr!(session, "release words");
            cr::handle_release_word(state, word_id).await
        }

        ClientMessage::CrAssignWord {
            word_id,
            student_id,
            name,
            roll_no,
        } => {
            check_cr!(session, "assign words");
            cr::handle_assign_word(state, word_id, student_id, name, roll_no).await
        }

        ClientMessage::CrAddWord { text, category } => {
            check_cr!(session, "add words");
            cr::handle_add_word(state, text, category).await
        }

        ClientMessage::CrAddCategory { name } => {
            check_cr!(session, "add categories");
            cr::handle_add_category(state, name).await
        }

        ClientMessage::CrRenameCategory { old_name, new_name } => {
            check_cr!(session, "rename categories");
            cr::handle_rename_category(state, old_name, new_name).await
        }

        ClientMessage::CrToggleLock => {
            check_cr!(session, "toggle the submission lock");
            cr::handle_toggle_lock(state).await
        }

        ClientMessage::CrRemoveSubmission { roll_no } => {
            check_cr!(session, "remove submissions");
            cr::handle_remove_submission(state, roll_no).await
        }

        ClientMessage::CrEditStudentRow {
            roll_no,
            new_name,
            new_link,
        } => {
            check_cr!(session, "edit student rows");
            cr::handle_edit_student_row(state, roll_no, new_name, new_link).await
        }

        ClientMessage::CrExportCsv => {
            check_cr!(session, "export submissions");
            cr::handle_export_csv(state).await
        }
    }
}
