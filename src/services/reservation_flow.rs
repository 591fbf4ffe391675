//! Reservation submission workflow.
//!
//! Owns the visitor's draft, the field error map and the submission status.
//! A submit is split in two halves around the backend call so that callers
//! can release their locks while the request is in flight:
//! [`ReservationWorkflow::begin_submit`] validates and hands out the payload,
//! [`ReservationWorkflow::complete_submit`] applies the backend's answer.

use chrono::{Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::models::reservation::{
    Field, ReservationAck, ReservationDraft, ReservationForm, ReservationPayload,
};
use crate::services::gateway::{Gateway, RemoteError};
use crate::services::validation::{self, FieldErrorMap};
use strum::IntoEnumIterator;

/// Shown when the backend fails without saying why.
pub const SUBMIT_FALLBACK: &str = "Server Error. Please try again.";

/// Shown when the backend answers 2xx without confirming the booking.
pub const UNCONFIRMED: &str = "Unknown error.";

/// Banner text for a submit blocked by field errors.
pub const FIX_FIELDS: &str = "Please correct the highlighted fields.";

/// Default number of seconds `Succeeded`/`Failed` stay on screen.
pub const STATUS_DISPLAY_SECS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    /// Only observable inside `begin_submit`.
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_display_state(&self) -> bool {
        matches!(self, SubmissionStatus::Succeeded | SubmissionStatus::Failed(_))
    }
}

/// What `begin_submit` decided.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission is already in flight; nothing changed.
    Ignored,
    /// Validation failed; the error map is populated and no call should be made.
    Invalid,
    /// Send this payload, then report back through `complete_submit`.
    Ready(ReservationPayload),
}

/// Wall clock at the restaurant. Drafts, the past-date rule and the
/// submitted instant are all read against it.
pub fn restaurant_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

#[derive(Debug, Clone)]
pub struct ReservationWorkflow {
    draft: ReservationDraft,
    errors: FieldErrorMap,
    status: SubmissionStatus,
    status_since: NaiveDateTime,
    display_window: Duration,
    timezone: Tz,
}

impl ReservationWorkflow {
    /// Idle workflow with a fresh draft for `now`'s date.
    pub fn new(now: NaiveDateTime, timezone: Tz, display_window: Duration) -> Self {
        Self::with_draft(ReservationDraft::fresh(now.date()), now, timezone, display_window)
    }

    pub fn with_draft(
        draft: ReservationDraft,
        now: NaiveDateTime,
        timezone: Tz,
        display_window: Duration,
    ) -> Self {
        Self {
            draft,
            errors: FieldErrorMap::new(),
            status: SubmissionStatus::Idle,
            status_since: now,
            display_window,
            timezone,
        }
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrorMap {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    fn set_status(&mut self, status: SubmissionStatus, now: NaiveDateTime) {
        self.status = status;
        self.status_since = now;
    }

    /// Change one field. Clears that field's error only.
    ///
    /// Returns `false` (and changes nothing) while a submission is in flight.
    pub fn edit(&mut self, field: Field, raw: &str, now: NaiveDateTime) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.draft.set(field, raw);
        self.errors.clear_field(field);
        if self.status.is_display_state() {
            self.set_status(SubmissionStatus::Idle, now);
        }
        true
    }

    /// Apply a posted form, editing only the fields whose value changed.
    pub fn apply_form(&mut self, form: &ReservationForm, now: NaiveDateTime) -> bool {
        if self.is_submitting() {
            return false;
        }
        for field in Field::iter() {
            let posted = form.value(field);
            if posted != self.draft.input_value(field) {
                self.edit(field, posted, now);
            }
        }
        true
    }

    /// Revert a success/failure banner to idle once it has been shown long enough.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if self.status.is_display_state() && now - self.status_since >= self.display_window {
            self.set_status(SubmissionStatus::Idle, now);
        }
    }

    /// First half of a submit: validate and, when valid, move to `Submitting`.
    pub fn begin_submit(&mut self, now: NaiveDateTime) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Ignored;
        }

        self.set_status(SubmissionStatus::Validating, now);
        self.errors = validation::validate(&self.draft, now);

        let payload = if self.errors.is_empty() {
            ReservationPayload::from_draft(&self.draft, self.timezone)
        } else {
            None
        };

        match payload {
            Some(payload) => {
                self.set_status(SubmissionStatus::Submitting, now);
                SubmitOutcome::Ready(payload)
            }
            None => {
                self.set_status(SubmissionStatus::Failed(FIX_FIELDS.to_string()), now);
                SubmitOutcome::Invalid
            }
        }
    }

    /// Second half of a submit: apply the backend's answer.
    ///
    /// Ignored unless a submission is in flight.
    pub fn complete_submit(&mut self, result: Result<ReservationAck, RemoteError>, now: NaiveDateTime) {
        if !self.is_submitting() {
            return;
        }

        match result {
            Ok(ack) if ack.success => {
                self.errors.clear();
                self.draft = ReservationDraft::fresh(now.date());
                self.set_status(SubmissionStatus::Succeeded, now);
            }
            Ok(_) => {
                tracing::warn!("Reservation not confirmed by backend");
                self.set_status(SubmissionStatus::Failed(UNCONFIRMED.to_string()), now);
            }
            Err(err) => {
                tracing::warn!(category = %err.category, error = %err, "Reservation error");
                self.set_status(SubmissionStatus::Failed(err.message_or(SUBMIT_FALLBACK)), now);
            }
        }
    }

    /// Full submit against `gateway`, for callers that own the workflow outright.
    pub async fn submit<G>(&mut self, gateway: &G, now: NaiveDateTime) -> SubmitOutcome
    where
        G: Gateway + ?Sized,
    {
        let outcome = self.begin_submit(now);
        if let SubmitOutcome::Ready(payload) = &outcome {
            let result = gateway.create_reservation(payload).await;
            self.complete_submit(result, now);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::ErrorCategory;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn window() -> Duration {
        Duration::seconds(STATUS_DISPLAY_SECS)
    }

    fn filled() -> ReservationWorkflow {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        flow.edit(Field::Name, "Luca", noon());
        flow.edit(Field::Email, "luca@example.com", noon());
        flow
    }

    #[test]
    fn test_starts_idle_with_defaults() {
        let flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        assert_eq!(flow.status(), &SubmissionStatus::Idle);
        assert_eq!(flow.draft().guests, Some(2));
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_invalid_submit_fails_without_payload() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        assert_eq!(flow.begin_submit(noon()), SubmitOutcome::Invalid);
        assert_eq!(flow.status(), &SubmissionStatus::Failed(FIX_FIELDS.to_string()));
        assert!(flow.errors().contains(Field::Name));
        assert!(flow.errors().contains(Field::Email));
    }

    #[test]
    fn test_failed_reverts_after_display_window() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        flow.begin_submit(noon());

        flow.tick(noon() + Duration::seconds(2));
        assert!(matches!(flow.status(), SubmissionStatus::Failed(_)));

        flow.tick(noon() + Duration::seconds(3));
        assert_eq!(flow.status(), &SubmissionStatus::Idle);
        // Field errors outlive the banner.
        assert!(flow.errors().contains(Field::Name));
    }

    #[test]
    fn test_edit_clears_only_that_field() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        flow.begin_submit(noon());

        flow.edit(Field::Name, "M", noon());
        assert!(!flow.errors().contains(Field::Name));
        assert!(flow.errors().contains(Field::Email));
        assert_eq!(flow.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn test_edit_with_invalid_value_still_clears_until_resubmit() {
        let mut flow = filled();
        flow.edit(Field::Guests, "30", noon());
        flow.begin_submit(noon());
        assert!(flow.errors().contains(Field::Guests));

        flow.edit(Field::Guests, "40", noon());
        assert!(!flow.errors().contains(Field::Guests));
    }

    #[test]
    fn test_payload_instant_is_read_in_workflow_zone() {
        let mut flow = filled();
        match flow.begin_submit(noon()) {
            // 20:00 CEST
            SubmitOutcome::Ready(payload) => {
                assert_eq!(payload.date.to_rfc3339(), "2026-10-19T18:00:00+00:00")
            }
            other => panic!("expected a payload, got {other:?}"),
        }
    }

    #[test]
    fn test_submitting_blocks_edits_and_resubmits() {
        let mut flow = filled();
        assert!(matches!(flow.begin_submit(noon()), SubmitOutcome::Ready(_)));
        assert!(flow.is_submitting());

        assert_eq!(flow.begin_submit(noon()), SubmitOutcome::Ignored);
        assert!(!flow.edit(Field::Name, "Other", noon()));
        assert_eq!(flow.draft().name, "Luca");
    }

    #[test]
    fn test_success_resets_draft() {
        let mut flow = filled();
        flow.begin_submit(noon());
        flow.complete_submit(Ok(ReservationAck { success: true }), noon());

        assert_eq!(flow.status(), &SubmissionStatus::Succeeded);
        assert_eq!(flow.draft(), &ReservationDraft::fresh(noon().date()));
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_unconfirmed_ack_is_failure() {
        let mut flow = filled();
        flow.begin_submit(noon());
        flow.complete_submit(Ok(ReservationAck { success: false }), noon());
        assert_eq!(flow.status(), &SubmissionStatus::Failed(UNCONFIRMED.to_string()));
        assert_eq!(flow.draft().name, "Luca");
    }

    #[test]
    fn test_remote_failure_keeps_draft() {
        let mut flow = filled();
        flow.begin_submit(noon());
        let err = RemoteError::new(ErrorCategory::NetworkError, None);
        flow.complete_submit(Err(err), noon());

        assert_eq!(flow.status(), &SubmissionStatus::Failed(SUBMIT_FALLBACK.to_string()));
        assert_eq!(flow.draft().email, "luca@example.com");
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_completion_without_submit_is_ignored() {
        let mut flow = filled();
        flow.complete_submit(Ok(ReservationAck { success: true }), noon());
        assert_eq!(flow.status(), &SubmissionStatus::Idle);
        assert_eq!(flow.draft().name, "Luca");
    }

    #[test]
    fn test_apply_form_touches_changed_fields_only() {
        let mut flow = ReservationWorkflow::new(noon(), chrono_tz::Europe::Rome, window());
        flow.begin_submit(noon());
        assert!(flow.errors().contains(Field::Email));

        let form = ReservationForm {
            name: "Sofia".to_string(),
            email: String::new(),
            phone: String::new(),
            date_time: flow.draft().input_value(Field::DateTime),
            guests: "2".to_string(),
            message: String::new(),
        };
        flow.apply_form(&form, noon());

        assert_eq!(flow.draft().name, "Sofia");
        assert!(!flow.errors().contains(Field::Name));
        assert!(flow.errors().contains(Field::Email));
    }
}
