//! Per-browser UI state: the reservation workflow and one-shot notices.

use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration as StdDuration, Instant};

use crate::config::AppConfig;
use crate::models::reservation::{ReservationAck, ReservationForm};
use crate::services::gateway::{ErrorCategory, Gateway, RemoteError};
use crate::services::reservation_flow::{
    restaurant_now, ReservationWorkflow, SubmissionStatus, SubmitOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Success,
    Error,
}

/// Message shown once on the next admin page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: NoticeTone,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { tone: NoticeTone::Success, text: text.into() }
    }

    /// Error notice, rendered as `Error: <message>`.
    pub fn error(message: impl AsRef<str>) -> Self {
        Self {
            tone: NoticeTone::Error,
            text: format!("Error: {}", message.as_ref()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub reservation: ReservationWorkflow,
    pub notice: Option<Notice>,
    last_seen: Instant,
}

/// All live browser sessions, keyed by session id.
///
/// The lock is only held for synchronous state changes, never across a
/// backend call. Sessions left alone for longer than the idle limit are
/// dropped by [`SessionRegistry::prune_idle`].
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    display_window: Duration,
    timezone: Tz,
    idle_limit: StdDuration,
}

impl SessionRegistry {
    pub fn new(display_window: Duration, timezone: Tz, idle_limit: StdDuration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            display_window,
            timezone,
            idle_limit,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.status_display(), config.restaurant_tz, config.session_idle())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restaurant wall clock.
    pub fn now(&self) -> NaiveDateTime {
        restaurant_now(self.timezone)
    }

    fn new_session(&self, now: NaiveDateTime) -> Session {
        Session {
            reservation: ReservationWorkflow::new(now, self.timezone, self.display_window),
            notice: None,
            last_seen: Instant::now(),
        }
    }

    /// Session for `session_id`, created if missing and marked as just used.
    fn touch<'a>(
        &self,
        sessions: &'a mut HashMap<String, Session>,
        session_id: &str,
        now: NaiveDateTime,
    ) -> &'a mut Session {
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| self.new_session(now));
        session.last_seen = Instant::now();
        session
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the session's workflow for rendering. A browser without
    /// a session gets a fresh one, which is not stored.
    pub fn reservation(&self, session_id: &str) -> ReservationWorkflow {
        let now = self.now();
        let mut sessions = self.lock();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.last_seen = Instant::now();
                session.reservation.tick(now);
                session.reservation.clone()
            }
            None => ReservationWorkflow::new(now, self.timezone, self.display_window),
        }
    }

    pub fn set_notice(&self, session_id: &str, notice: Notice) {
        let now = self.now();
        let mut sessions = self.lock();
        self.touch(&mut sessions, session_id, now).notice = Some(notice);
    }

    pub fn take_notice(&self, session_id: &str) -> Option<Notice> {
        self.lock()
            .get_mut(session_id)
            .and_then(|session| session.notice.take())
    }

    /// Drop sessions unused for longer than the idle limit as of `now`.
    /// A session with a submission in flight is kept. Returns how many went.
    pub fn prune_idle(&self, now: Instant) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.reservation.is_submitting()
                || now.saturating_duration_since(session.last_seen) < self.idle_limit
        });
        before - sessions.len()
    }

    /// Apply a posted reservation form and submit it.
    ///
    /// A second submit from the same browser while one is in flight is
    /// ignored. The backend call and its completion run on their own task,
    /// so the session settles even when the caller is dropped mid-request.
    pub async fn submit_reservation(
        self: &Arc<Self>,
        session_id: &str,
        form: &ReservationForm,
        gateway: Arc<dyn Gateway>,
    ) -> SubmitOutcome {
        let outcome = {
            let now = self.now();
            let mut sessions = self.lock();
            let session = self.touch(&mut sessions, session_id, now);
            session.reservation.tick(now);
            session.reservation.apply_form(form, now);
            session.reservation.begin_submit(now)
        };

        let payload = match &outcome {
            SubmitOutcome::Ignored => {
                record_submission("ignored");
                return outcome;
            }
            SubmitOutcome::Invalid => {
                record_submission("invalid");
                return outcome;
            }
            SubmitOutcome::Ready(payload) => payload.clone(),
        };

        let registry = Arc::clone(self);
        let id = session_id.to_string();
        let task = tokio::spawn(async move {
            let result = gateway.create_reservation(&payload).await;
            registry.complete_submit(&id, result);
        });

        if let Err(err) = task.await {
            tracing::error!(error = %err, "Reservation submit task failed");
            self.complete_submit(session_id, Err(RemoteError::new(ErrorCategory::ServerError, None)));
        }
        outcome
    }

    fn complete_submit(&self, session_id: &str, result: Result<ReservationAck, RemoteError>) {
        let now = self.now();
        let mut sessions = self.lock();
        let Some(session) = sessions.get_mut(session_id) else {
            return;
        };
        if !session.reservation.is_submitting() {
            return;
        }
        session.reservation.complete_submit(result, now);
        let label = match session.reservation.status() {
            SubmissionStatus::Succeeded => "succeeded",
            _ => "failed",
        };
        record_submission(label);
    }
}

fn record_submission(outcome: &'static str) {
    metrics::counter!("reservation_submissions_total", "outcome" => outcome).increment(1);
    tracing::info!(outcome, "Reservation form submitted");
}
