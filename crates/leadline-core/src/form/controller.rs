//! Lead form controller: owns one form instance and its submission lifecycle.
//!
//! Status moves `Idle -> Submitting -> Submitted -> Idle`. Delivery to the
//! intake and the post-success reset timer both run as spawned tokio tasks
//! that report back over an MPSC channel; the owner drains the channel with
//! `poll_events` on its UI tick or awaits the next event with `settle`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{validate, FieldErrors, LeadField, LeadFormState, SubmissionStatus};
use crate::intake::{Intake, IntakeError, LeadRecord};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for controller events. At most a delivery result and a reset
/// are outstanding per cycle.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// How long the thank-you state stays up before the form clears.
pub const DEFAULT_RESET_DELAY_MS: u64 = 5000;

/// Default upper bound on a single delivery.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

pub const SUBMIT_FAILED_MESSAGE: &str =
    "Something went wrong sending your request. Please try again or call us directly.";

// ============================================================================
// Types
// ============================================================================

/// Timing knobs for one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    pub reset_delay: Duration,
    /// `None` waits on the intake indefinitely
    pub submit_timeout: Option<Duration>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_millis(DEFAULT_RESET_DELAY_MS),
            submit_timeout: Some(Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS)),
        }
    }
}

/// Why a submit press did not start a delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please correct the highlighted fields")]
    Invalid(FieldErrors),

    /// Honeypot was filled. The intake is never called.
    #[error("Submission rejected as spam")]
    SpamDetected,

    #[error("Submit ignored while {0:?}")]
    InFlight(SubmissionStatus),
}

/// Messages sent from background tasks back to the controller.
///
/// Each carries the cycle generation it belongs to so results from a cycle
/// that was reset or torn down are ignored.
#[derive(Debug)]
pub enum FormEvent {
    Delivered { generation: u64 },
    Failed { generation: u64, error: IntakeError },
    ResetElapsed { generation: u64 },
}

/// Visible change produced by applying a `FormEvent`.
#[derive(Debug)]
pub enum FormUpdate {
    /// The intake recorded the lead; the thank-you state is showing
    Submitted,
    /// The intake failed; the general retry message is set and input kept
    Failed(IntakeError),
    /// The thank-you state timed out and the form is empty again
    Reset,
}

// ============================================================================
// Controller
// ============================================================================

pub struct LeadFormController {
    state: LeadFormState,
    errors: FieldErrors,
    status: SubmissionStatus,
    source_page: String,
    intake: Arc<dyn Intake>,
    settings: FormSettings,

    /// Bumped on every submit and manual reset
    generation: u64,

    events_tx: mpsc::Sender<FormEvent>,
    events_rx: mpsc::Receiver<FormEvent>,
    reset_task: Option<JoinHandle<()>>,
}

impl LeadFormController {
    pub fn new(intake: Arc<dyn Intake>, source_page: impl Into<String>, settings: FormSettings) -> Self {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            state: LeadFormState::default(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
            source_page: source_page.into(),
            intake,
            settings,
            generation: 0,
            events_tx,
            events_rx,
            reset_task: None,
        }
    }

    pub fn state(&self) -> &LeadFormState {
        &self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn source_page(&self) -> &str {
        &self.source_page
    }

    pub fn intake_name(&self) -> &'static str {
        self.intake.name()
    }

    pub fn can_submit(&self) -> bool {
        self.status.can_submit()
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Store a value the user typed. Phone input is formatted as it is
    /// stored. Clears the error for this field only; no validation runs.
    pub fn update_field(&mut self, field: LeadField, raw: &str) {
        self.state.set(field, raw);
        self.errors.clear_field(field);
    }

    /// Clear the form back to its initial state, cancelling a pending reset.
    /// A delivery still in flight is left to finish but its result is ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.cancel_reset_task();
        self.clear_form();
    }

    fn clear_form(&mut self) {
        self.state = LeadFormState::default();
        self.errors.clear();
        self.status = SubmissionStatus::Idle;
    }

    fn cancel_reset_task(&mut self) {
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate and, if clean, start delivering the lead.
    ///
    /// Ignored unless the form is `Idle`, so repeated presses while a
    /// delivery is in flight never reach the intake twice. Must be called
    /// from within a tokio runtime.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        if !self.status.can_submit() {
            debug!(status = ?self.status, "Ignoring submit while busy");
            return Err(SubmitError::InFlight(self.status));
        }

        self.errors = validate(&self.state);

        if !self.state.honeypot.is_empty() {
            info!(source_page = %self.source_page, "Discarding submission caught by honeypot");
            return Err(SubmitError::SpamDetected);
        }

        if !self.errors.is_empty() {
            debug!(fields = self.errors.field_count(), "Lead form failed validation");
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        self.generation += 1;
        let generation = self.generation;
        let lead = LeadRecord::from_form(&self.state, &self.source_page, Utc::now());
        let intake = Arc::clone(&self.intake);
        let timeout = self.settings.submit_timeout;
        let tx = self.events_tx.clone();

        self.status = SubmissionStatus::Submitting;
        info!(source_page = %self.source_page, intake = intake.name(), "Submitting lead");

        tokio::spawn(async move {
            let event = match deliver_with_timeout(intake.as_ref(), &lead, timeout).await {
                Ok(()) => FormEvent::Delivered { generation },
                Err(error) => FormEvent::Failed { generation, error },
            };
            send_event(&tx, event).await;
        });

        Ok(())
    }

    /// Whether an event is still expected for the current cycle
    pub fn has_pending_work(&self) -> bool {
        self.status == SubmissionStatus::Submitting || self.reset_task.is_some()
    }

    /// Wait for the next event belonging to the current cycle and apply it.
    /// Returns `None` straight away when nothing is outstanding.
    pub async fn settle(&mut self) -> Option<FormUpdate> {
        while self.has_pending_work() {
            let event = self.events_rx.recv().await?;
            if let Some(update) = self.apply_event(event) {
                return Some(update);
            }
        }
        None
    }

    /// Apply every event that has already arrived, without waiting.
    pub fn poll_events(&mut self) -> Vec<FormUpdate> {
        // Collect first to avoid holding the receiver borrow while applying
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        events
            .into_iter()
            .filter_map(|event| self.apply_event(event))
            .collect()
    }

    fn apply_event(&mut self, event: FormEvent) -> Option<FormUpdate> {
        match event {
            FormEvent::Delivered { generation } if generation == self.generation => {
                info!(source_page = %self.source_page, "Lead delivered");
                self.status = SubmissionStatus::Submitted;
                self.schedule_reset();
                Some(FormUpdate::Submitted)
            }
            FormEvent::Failed { generation, error } if generation == self.generation => {
                warn!(error = %error, intake = self.intake.name(), "Lead delivery failed");
                self.errors.set_general(SUBMIT_FAILED_MESSAGE);
                self.status = SubmissionStatus::Idle;
                Some(FormUpdate::Failed(error))
            }
            FormEvent::ResetElapsed { generation } if generation == self.generation => {
                self.reset_task = None;
                self.clear_form();
                debug!("Thank-you state elapsed, form cleared");
                Some(FormUpdate::Reset)
            }
            stale => {
                debug!(?stale, current = self.generation, "Ignoring event from an earlier cycle");
                None
            }
        }
    }

    fn schedule_reset(&mut self) {
        self.cancel_reset_task();

        let generation = self.generation;
        let delay = self.settings.reset_delay;
        let tx = self.events_tx.clone();

        self.reset_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            send_event(&tx, FormEvent::ResetElapsed { generation }).await;
        }));
    }
}

impl Drop for LeadFormController {
    fn drop(&mut self) {
        self.cancel_reset_task();
    }
}

async fn deliver_with_timeout(
    intake: &dyn Intake,
    lead: &LeadRecord,
    timeout: Option<Duration>,
) -> Result<(), IntakeError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, intake.deliver(lead))
            .await
            .map_err(|_| IntakeError::Timeout(limit))?,
        None => intake.deliver(lead).await,
    }
}

/// Send an event back to the controller. The receiver is gone once the
/// controller is dropped, which is expected on teardown.
async fn send_event(tx: &mpsc::Sender<FormEvent>, event: FormEvent) {
    if let Err(e) = tx.send(event).await {
        debug!(event = ?e.0, "Form controller gone, dropping event");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SPAM_DETECTED_MESSAGE;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    // -------------------------------------------------------------------------
    // Fake intakes
    // -------------------------------------------------------------------------

    enum Behavior {
        Succeed,
        Fail,
        Hang,
    }

    struct FakeIntake {
        behavior: Behavior,
        delay: Duration,
        calls: AtomicUsize,
        leads: Mutex<Vec<LeadRecord>>,
    }

    impl FakeIntake {
        fn new(behavior: Behavior, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                delay,
                calls: AtomicUsize::new(0),
                leads: Mutex::new(Vec::new()),
            })
        }

        fn ok() -> Arc<Self> {
            Self::new(Behavior::Succeed, Duration::from_millis(800))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_lead(&self) -> Option<LeadRecord> {
            self.leads.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Intake for FakeIntake {
        async fn deliver(&self, lead: &LeadRecord) -> Result<(), IntakeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.leads.lock().unwrap().push(lead.clone());
            tokio::time::sleep(self.delay).await;
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(IntakeError::ServerError("down for maintenance".to_string())),
                Behavior::Hang => {
                    std::future::pending::<()>().await;
                    Ok(())
                }
            }
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn fill_valid(form: &mut LeadFormController) {
        form.update_field(LeadField::Name, "Jordan Reyes");
        form.update_field(LeadField::Address, "412 Oak Ln, Charlotte, NC 28202");
        form.update_field(LeadField::Phone, "9803167792");
        form.update_field(LeadField::Email, "jordan@example.com");
        form.update_field(LeadField::Details, "Two-story house, gutters and windows");
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_field_formats_phone() {
        let mut form = LeadFormController::new(FakeIntake::ok(), "/", FormSettings::default());
        form.update_field(LeadField::Phone, "98031");
        assert_eq!(form.state().phone, "(980) 31");
        form.update_field(LeadField::Phone, "(980) 3167792");
        assert_eq!(form.state().phone, "(980) 316-7792");
    }

    #[tokio::test]
    async fn test_update_field_clears_only_that_error() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());

        let err = form.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ref errors) if errors.field_count() == 3));
        assert_eq!(form.status(), SubmissionStatus::Idle);

        form.update_field(LeadField::Name, "J");

        assert!(!form.errors().contains(LeadField::Name));
        assert!(form.errors().contains(LeadField::Phone));
        assert!(form.errors().contains(LeadField::Email));
        assert_eq!(intake.calls(), 0);
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_successful_submit_then_reset() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/gallery", FormSettings::default());
        fill_valid(&mut form);

        assert_eq!(form.status(), SubmissionStatus::Idle);
        form.submit().unwrap();
        assert_eq!(form.status(), SubmissionStatus::Submitting);

        assert!(matches!(form.settle().await, Some(FormUpdate::Submitted)));
        assert_eq!(form.status(), SubmissionStatus::Submitted);
        // Values stay visible behind the thank-you message until the reset fires
        assert_eq!(form.state().name, "Jordan Reyes");

        let submitted_at = Instant::now();
        assert!(matches!(form.settle().await, Some(FormUpdate::Reset)));
        assert!(submitted_at.elapsed() >= Duration::from_millis(DEFAULT_RESET_DELAY_MS));

        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert!(form.state().is_empty());
        assert!(form.errors().is_empty());
        assert!(!form.has_pending_work());
        assert!(form.settle().await.is_none());

        assert_eq!(intake.calls(), 1);
        let lead = intake.last_lead().unwrap();
        assert_eq!(lead.source_page, "/gallery");
        assert_eq!(lead.phone, "(980) 316-7792");
        assert_eq!(lead.address, "412 Oak Ln, Charlotte, NC 28202");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submit_keeps_input() {
        let intake = FakeIntake::new(Behavior::Fail, Duration::from_millis(300));
        let mut form = LeadFormController::new(intake.clone(), "/contact", FormSettings::default());
        fill_valid(&mut form);
        let entered = form.state().clone();

        form.submit().unwrap();
        assert_eq!(form.status(), SubmissionStatus::Submitting);

        let update = form.settle().await;
        assert!(matches!(update, Some(FormUpdate::Failed(IntakeError::ServerError(_)))));
        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert_eq!(form.errors().general(), Some(SUBMIT_FAILED_MESSAGE));
        assert_eq!(form.errors().field_count(), 0);
        assert_eq!(form.state(), &entered);
        assert!(!form.has_pending_work());

        // Manual retry goes back to the intake, and the stale general error is recomputed away
        form.submit().unwrap();
        assert!(form.errors().is_empty());
        assert!(matches!(form.settle().await, Some(FormUpdate::Failed(_))));
        assert_eq!(intake.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_is_ignored() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);

        form.submit().unwrap();
        assert_eq!(
            form.submit(),
            Err(SubmitError::InFlight(SubmissionStatus::Submitting))
        );
        assert_eq!(
            form.submit(),
            Err(SubmitError::InFlight(SubmissionStatus::Submitting))
        );

        assert!(matches!(form.settle().await, Some(FormUpdate::Submitted)));
        assert_eq!(
            form.submit(),
            Err(SubmitError::InFlight(SubmissionStatus::Submitted))
        );

        assert!(matches!(form.settle().await, Some(FormUpdate::Reset)));
        assert_eq!(intake.calls(), 1);
    }

    #[tokio::test]
    async fn test_spam_never_reaches_intake() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);
        form.update_field(LeadField::Honeypot, "https://cheap-pills.example");

        assert_eq!(form.submit(), Err(SubmitError::SpamDetected));
        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert_eq!(form.errors().general(), Some(SPAM_DETECTED_MESSAGE));
        assert_eq!(form.errors().field_count(), 0);
        assert!(!form.has_pending_work());
        assert_eq!(intake.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_intake_times_out() {
        let intake = FakeIntake::new(Behavior::Hang, Duration::ZERO);
        let settings = FormSettings {
            submit_timeout: Some(Duration::from_secs(10)),
            ..FormSettings::default()
        };
        let mut form = LeadFormController::new(intake.clone(), "/", settings);
        fill_valid(&mut form);

        form.submit().unwrap();
        let update = form.settle().await;

        assert!(matches!(
            update,
            Some(FormUpdate::Failed(IntakeError::Timeout(limit))) if limit == Duration::from_secs(10)
        ));
        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert_eq!(form.state().name, "Jordan Reyes");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_timeout_keeps_precision() {
        let intake = FakeIntake::new(Behavior::Hang, Duration::ZERO);
        let settings = FormSettings {
            submit_timeout: Some(Duration::from_millis(250)),
            ..FormSettings::default()
        };
        let mut form = LeadFormController::new(intake, "/", settings);
        fill_valid(&mut form);

        form.submit().unwrap();
        match form.settle().await {
            Some(FormUpdate::Failed(error)) => {
                assert!(matches!(error, IntakeError::Timeout(limit) if limit == Duration::from_millis(250)));
                assert_eq!(error.to_string(), "Timed out after 250ms");
            }
            other => panic!("expected a timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_intake_receives_trimmed_email() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);
        form.update_field(LeadField::Email, " a@b.co ");

        form.submit().unwrap();
        assert!(matches!(form.settle().await, Some(FormUpdate::Submitted)));

        let email = intake.last_lead().unwrap().email;
        assert_eq!(email, "a@b.co");
        assert!(crate::form::validation::is_valid_email(&email));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_during_delivery_do_not_change_lead() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);

        form.submit().unwrap();
        form.update_field(LeadField::Name, "Someone Else");
        form.settle().await;

        assert_eq!(intake.last_lead().unwrap().name, "Jordan Reyes");
    }

    // -------------------------------------------------------------------------
    // Reset and teardown
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_manual_reset_discards_in_flight_result() {
        let intake = FakeIntake::new(Behavior::Succeed, Duration::from_secs(2));
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);

        form.submit().unwrap();
        form.reset();
        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert!(form.settle().await.is_none());

        fill_valid(&mut form);
        form.submit().unwrap();
        // The first delivery finishes first but belongs to the abandoned cycle
        assert!(matches!(form.settle().await, Some(FormUpdate::Submitted)));
        assert_eq!(form.status(), SubmissionStatus::Submitted);
        assert_eq!(intake.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_reset_cancels_pending_reset() {
        let mut form = LeadFormController::new(FakeIntake::ok(), "/", FormSettings::default());
        fill_valid(&mut form);
        form.submit().unwrap();
        form.settle().await;
        assert!(form.has_pending_work());

        form.reset();
        assert!(!form.has_pending_work());

        form.update_field(LeadField::Name, "Typing again");
        tokio::time::sleep(Duration::from_millis(DEFAULT_RESET_DELAY_MS * 2)).await;
        assert!(form.poll_events().is_empty());
        assert_eq!(form.state().name, "Typing again");
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_events_is_non_blocking() {
        let mut form = LeadFormController::new(FakeIntake::ok(), "/", FormSettings::default());
        fill_valid(&mut form);
        form.submit().unwrap();

        assert!(form.poll_events().is_empty());
        assert_eq!(form.status(), SubmissionStatus::Submitting);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let updates = form.poll_events();
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], FormUpdate::Submitted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_while_submitting_is_harmless() {
        let intake = FakeIntake::ok();
        let mut form = LeadFormController::new(intake.clone(), "/", FormSettings::default());
        fill_valid(&mut form);
        form.submit().unwrap();
        drop(form);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(intake.calls(), 1);
    }
}
