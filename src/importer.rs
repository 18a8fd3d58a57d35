use crate::api::ImportBackend;
use crate::errors::ClientError;
use crate::models::{ImportForm, JobStatus, TaskHandle, TaskStatus};
use crate::progress::{ProgressSnapshot, SessionState, StatusObserver};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// One live polling session. Owns the spawned poll task; dropping the
/// session aborts the task, so a session can never outlive its owner.
struct PollSession {
    handle: TaskHandle,
    task: JoinHandle<()>,
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Import task controller.
///
/// Drives one import session at a time through
/// Idle -> Starting -> Polling -> {Completed | Failed | Aborted}
/// and reports every step to the observer as a `ProgressSnapshot`.
/// Starting a new import while a session is still polling aborts the old
/// poll task before the new start request goes out; sessions supersede,
/// they never queue.
pub struct ImportController {
    backend: Arc<dyn ImportBackend>,
    observer: Arc<dyn StatusObserver>,
    poll_interval: Duration,
    session: Option<PollSession>,
}

impl ImportController {
    pub fn new(backend: Arc<dyn ImportBackend>, observer: Arc<dyn StatusObserver>) -> Self {
        Self {
            backend,
            observer,
            poll_interval: DEFAULT_POLL_INTERVAL,
            session: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// True while a poll task for some handle is still live.
    pub fn is_polling(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| !s.task.is_finished())
            .unwrap_or(false)
    }

    /// The handle of the current session, if any (live or terminal).
    pub fn current_task(&self) -> Option<&TaskHandle> {
        self.session.as_ref().map(|s| &s.handle)
    }

    /// Abort the current polling session, if one is still live.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            let was_live = !session.task.is_finished();
            let handle = session.handle.clone();
            drop(session);
            if was_live {
                debug!("aborted polling session for task {}", handle);
                emit(
                    self.observer.as_ref(),
                    SessionState::Aborted,
                    None,
                    None,
                    "import cancelled: superseded by a new request",
                );
            }
        }
    }

    /// Validate the form and start an import session.
    ///
    /// An invalid import mode never reaches the network: the controller
    /// stays as it was (any prior session keeps polling) and the validation
    /// message is surfaced. On a successful start the returned handle is
    /// also owned by the new session's poll task.
    pub async fn start_import(&mut self, form: ImportForm) -> Result<TaskHandle, ClientError> {
        let request = match form.validate() {
            Ok(r) => r,
            Err(e) => {
                warn!("rejected import request: {}", e);
                emit(
                    self.observer.as_ref(),
                    SessionState::Idle,
                    None,
                    None,
                    e.to_string(),
                );
                return Err(e);
            }
        };

        // Supersession point: the old timer must be gone before the new
        // start request is issued.
        self.cancel();

        emit(
            self.observer.as_ref(),
            SessionState::Starting,
            Some(0),
            None,
            "starting import task...",
        );

        let handle = match self.backend.start_import(&request).await {
            Ok(h) => h,
            Err(e) => {
                warn!("import start failed: {}", e);
                emit(
                    self.observer.as_ref(),
                    SessionState::Failed,
                    None,
                    None,
                    format!("failed to start import task: {}", e),
                );
                return Err(e);
            }
        };
        info!("import task {} started", handle);

        emit(
            self.observer.as_ref(),
            SessionState::Polling,
            Some(0),
            None,
            "import task started, waiting for first status update...",
        );

        let task = tokio::spawn(poll_loop(
            self.backend.clone(),
            self.observer.clone(),
            handle.clone(),
            self.poll_interval,
        ));
        self.session = Some(PollSession {
            handle: handle.clone(),
            task,
        });
        Ok(handle)
    }
}

/// Poll the status endpoint on a fixed cadence until a terminal state.
///
/// Polls are issued strictly one at a time: the next tick waits for the
/// in-flight request to finish, so a slow response can never be applied
/// after a newer one.
async fn poll_loop(
    backend: Arc<dyn ImportBackend>,
    observer: Arc<dyn StatusObserver>,
    handle: TaskHandle,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval fires immediately; consume the first tick so the first poll
    // happens one interval after the task started.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match backend.import_status(&handle).await {
            Ok(status) => {
                if apply_status(observer.as_ref(), &handle, &status) {
                    return;
                }
            }
            Err(ClientError::Request { status, message }) => {
                warn!("status check for task {} failed: HTTP {}", handle, status);
                emit(
                    observer.as_ref(),
                    SessionState::Failed,
                    None,
                    None,
                    format!("status check failed (HTTP {}): {}", status, message),
                );
                return;
            }
            Err(ClientError::Parse(e)) => {
                warn!("unparseable status response for task {}: {}", handle, e);
                emit(
                    observer.as_ref(),
                    SessionState::Failed,
                    None,
                    None,
                    format!("could not parse status response: {}", e),
                );
                return;
            }
            Err(e) => {
                warn!("status poll for task {} failed: {}", handle, e);
                emit(
                    observer.as_ref(),
                    SessionState::Failed,
                    None,
                    None,
                    format!("status poll failed: {}", e),
                );
                return;
            }
        }
    }
}

/// Translate one status snapshot into an observer update. Returns true when
/// the session reached a terminal state and polling must stop.
fn apply_status(observer: &dyn StatusObserver, handle: &TaskHandle, status: &TaskStatus) -> bool {
    match status.status {
        JobStatus::Completed => {
            info!("import task {} completed", handle);
            // Force 100% whatever the last counts said.
            let counts = status.total.map(|t| (t, t));
            emit(
                observer,
                SessionState::Completed,
                Some(100),
                counts,
                "import completed successfully",
            );
            true
        }
        JobStatus::Failed => {
            let reason = status.message.as_deref().unwrap_or("unknown reason");
            warn!("import task {} failed: {}", handle, reason);
            emit(
                observer,
                SessionState::Failed,
                None,
                status.counts(),
                format!("import failed: {}", reason),
            );
            true
        }
        JobStatus::Pending | JobStatus::Running => {
            let message = status
                .message
                .clone()
                .unwrap_or_else(|| "updating...".to_string());
            emit(
                observer,
                SessionState::Polling,
                status.percent(),
                status.counts(),
                message,
            );
            false
        }
    }
}

fn emit(
    observer: &dyn StatusObserver,
    state: SessionState,
    percent: Option<u8>,
    counts: Option<(u64, u64)>,
    message: impl Into<String>,
) {
    observer.on_update(&ProgressSnapshot {
        state,
        percent,
        counts,
        message: message.into(),
    });
}
