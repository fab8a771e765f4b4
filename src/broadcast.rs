use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that pushes submitted/total counts for the
/// dashboard progress bar whenever they change.
pub fn spawn_progress_broadcaster(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut seq = 0u64;
        let mut last = None;

        loop {
            tokio::time::sleep(Duration::from_millis(2000)).await;

            let (submitted, total) = state.submission_progress().await;
            if last == Some((submitted, total)) {
                continue;
            }
            last = Some((submitted, total));

            seq += 1;
            let msg = ServerMessage::SubmissionProgress {
                submitted,
                total,
                seq,
            };

            // Ignore send errors (no receivers connected is fine)
            let _ = state.broadcast.send(msg);
        }
    });
}
