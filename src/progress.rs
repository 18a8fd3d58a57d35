//! Observer seam between the import state machine and whatever renders it.
//! The controller emits snapshots; rendering is a pure function of the
//! latest snapshot and lives outside this crate's core.

/// Lifecycle of one import session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Polling,
    Completed,
    Failed,
    Aborted,
}

impl SessionState {
    /// Terminal states have no outgoing transitions; only a brand-new
    /// session leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Aborted
        )
    }
}

/// What the UI gets after every state change or poll. Each snapshot
/// supersedes the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub state: SessionState,
    /// Completion percentage, None when indeterminate.
    pub percent: Option<u8>,
    /// (processed, total) when the last status carried both.
    pub counts: Option<(u64, u64)>,
    pub message: String,
}

pub trait StatusObserver: Send + Sync {
    fn on_update(&self, snapshot: &ProgressSnapshot);
}

/// Forward snapshots into a channel; handy for CLIs and tests that want to
/// consume updates as a stream. A closed receiver drops updates silently.
impl StatusObserver for tokio::sync::mpsc::UnboundedSender<ProgressSnapshot> {
    fn on_update(&self, snapshot: &ProgressSnapshot) {
        let _ = self.send(snapshot.clone());
    }
}
