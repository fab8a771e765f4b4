mod board;
mod export;
mod ledger;

pub use board::BoardAction;
pub use export::{submissions_csv, BoardExport, EXPORT_SCHEMA_VERSION};
pub use ledger::LedgerAction;

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::auth::CrAuthConfig;
use crate::protocol::ServerMessage;
use crate::types::{SubmissionLedger, WordBoard};

/// Shared application state.
///
/// The coordinator owns both documents. Every mutation takes the write
/// guard, applies a pure update, and swaps the snapshot only when it
/// actually changed — rejected actions never produce a write or a
/// broadcast. Clients receive whole-document replacements, never
/// partial diffs.
#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<WordBoard>>,
    ledger: Arc<RwLock<SubmissionLedger>>,
    /// Broadcast channel for pushing document updates to all clients
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub auth: CrAuthConfig,
}

impl AppState {
    pub fn new(board: WordBoard, ledger: SubmissionLedger, auth: CrAuthConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            board: Arc::new(RwLock::new(board)),
            ledger: Arc::new(RwLock::new(ledger)),
            broadcast: tx,
            auth,
        }
    }

    /// Current catalog snapshot.
    pub async fn board(&self) -> WordBoard {
        self.board.read().await.clone()
    }

    /// Current ledger snapshot.
    pub async fn ledger(&self) -> SubmissionLedger {
        self.ledger.read().await.clone()
    }

    /// Apply a board action. Returns whether the document changed.
    pub async fn apply_board(&self, action: BoardAction) -> bool {
        let changed = {
            let mut board = self.board.write().await;
            let next = board.apply(&action);
            if next == *board {
                false
            } else {
                *board = next;
                true
            }
        };
        if changed {
            tracing::debug!(?action, "word board updated");
            self.broadcast_board().await;
        }
        changed
    }

    /// Apply a ledger action. Returns whether the document changed.
    pub async fn apply_ledger(&self, action: LedgerAction) -> bool {
        let changed = {
            let mut ledger = self.ledger.write().await;
            let next = ledger.apply(&action);
            if next == *ledger {
                false
            } else {
                *ledger = next;
                true
            }
        };
        if changed {
            tracing::debug!(?action, "submission ledger updated");
            self.broadcast_ledger().await;
        }
        changed
    }

    /// Push the full catalog document to every client.
    pub async fn broadcast_board(&self) {
        let board = self.board().await;
        self.broadcast_to_all(ServerMessage::BoardUpdate {
            words: board.words,
            categories: board.categories,
        });
    }

    /// Push the full ledger document to every client.
    pub async fn broadcast_ledger(&self) {
        let ledger = self.ledger().await;
        self.broadcast_to_all(ServerMessage::LedgerUpdate {
            submissions: ledger.submissions,
            student_list: ledger.student_list,
            is_locked: ledger.is_locked,
        });
    }

    /// Send to all connected clients. No receivers is fine.
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }

    /// Snapshot both documents for backup.
    pub async fn export_state(&self) -> BoardExport {
        BoardExport::new(self.board().await, self.ledger().await)
    }

    /// Validate and restore a snapshot, replacing both documents and
    /// re-broadcasting them.
    pub async fn import_state(&self, export: BoardExport) -> Result<(), String> {
        export.validate()?;

        {
            let mut board = self.board.write().await;
            *board = export.board;
        }
        {
            let mut ledger = self.ledger.write().await;
            *ledger = export.ledger;
        }
        tracing::info!("state imported from snapshot ({})", export.exported_at);
        self.broadcast_board().await;
        self.broadcast_ledger().await;
        Ok(())
    }

    /// (submitted, roster size) for the progress broadcast.
    pub async fn submission_progress(&self) -> (usize, usize) {
        let ledger = self.ledger.read().await;
        (ledger.submissions.len(), ledger.student_list.len())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            crate::seed::initial_board(),
            crate::seed::initial_ledger(crate::seed::builtin_roster()),
            CrAuthConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Claimant;

    fn actor() -> Claimant {
        Claimant {
            id: "s1".to_string(),
            name: "Asha Rao".to_string(),
            roll_no: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_apply_board_broadcasts_on_change() {
        let state = AppState::default();
        let mut rx = state.broadcast.subscribe();

        let changed = state
            .apply_board(BoardAction::WordClick {
                word_id: 1,
                actor: actor(),
            })
            .await;
        assert!(changed);

        match rx.recv().await {
            Ok(ServerMessage::BoardUpdate { words, .. }) => {
                assert!(words
                    .iter()
                    .any(|w| w.taken_by.as_ref().is_some_and(|c| c.id == "s1")));
            }
            other => panic!("Expected BoardUpdate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_action_writes_and_broadcasts_nothing() {
        let state = AppState::default();
        let mut rx = state.broadcast.subscribe();

        // Assign with a blank name is rejected by the state machine.
        let changed = state
            .apply_board(BoardAction::Assign {
                word_id: 1,
                claimant: Claimant {
                    id: "s1".to_string(),
                    name: String::new(),
                    roll_no: "1".to_string(),
                },
            })
            .await;
        assert!(!changed);
        assert!(rx.try_recv().is_err());
        assert!(state.board().await.word(1).unwrap().is_available());
    }

    #[tokio::test]
    async fn test_import_replaces_documents() {
        let state = AppState::default();
        let mut export = state.export_state().await;
        export.ledger.is_locked = true;

        state.import_state(export).await.expect("import should pass");
        assert!(state.ledger().await.is_locked);
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_snapshot() {
        let state = AppState::default();
        let mut export = state.export_state().await;
        export.schema_version = EXPORT_SCHEMA_VERSION + 1;

        assert!(state.import_state(export).await.is_err());
        assert!(!state.ledger().await.is_locked);
    }
}
