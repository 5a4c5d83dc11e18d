//! Application state management for the Leadline intake desk.
//!
//! This module contains the `App` struct that owns the configuration, one
//! lead form controller, and the UI state around it (focus, overlays, status
//! line).

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use leadline_core::form::{phone_digits, MAX_FORMATTED_PHONE_LENGTH, PHONE_DIGITS};
use leadline_core::{
    Config, FormUpdate, Intake, LeadField, LeadFormController, SubmissionStatus, SubmitError,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the name input.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for the address input. Street, city, state, and zip fit easily.
const MAX_ADDRESS_LENGTH: usize = 200;

/// Maximum length for the email input (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for project details typed at the desk.
const MAX_DETAILS_LENGTH: usize = 2000;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which control on the form has focus. The honeypot is never focusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Name,
    Address,
    Phone,
    Email,
    Details,
    Submit,
}

impl FormFocus {
    /// The form field behind this control, if it is a text input
    pub fn field(&self) -> Option<LeadField> {
        match self {
            FormFocus::Name => Some(LeadField::Name),
            FormFocus::Address => Some(LeadField::Address),
            FormFocus::Phone => Some(LeadField::Phone),
            FormFocus::Email => Some(LeadField::Email),
            FormFocus::Details => Some(LeadField::Details),
            FormFocus::Submit => None,
        }
    }

    pub fn from_field(field: LeadField) -> Option<Self> {
        match field {
            LeadField::Name => Some(FormFocus::Name),
            LeadField::Address => Some(FormFocus::Address),
            LeadField::Phone => Some(FormFocus::Phone),
            LeadField::Email => Some(FormFocus::Email),
            LeadField::Details => Some(FormFocus::Details),
            LeadField::Honeypot => None,
        }
    }

    /// Get the next control (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Address,
            FormFocus::Address => FormFocus::Phone,
            FormFocus::Phone => FormFocus::Email,
            FormFocus::Email => FormFocus::Details,
            FormFocus::Details => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Name,
        }
    }

    /// Get the previous control (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Submit,
            FormFocus::Address => FormFocus::Name,
            FormFocus::Phone => FormFocus::Address,
            FormFocus::Email => FormFocus::Phone,
            FormFocus::Details => FormFocus::Email,
            FormFocus::Submit => FormFocus::Details,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub form: LeadFormController,

    // UI State
    pub state: AppState,
    pub focus: FormFocus,
    pub status_message: Option<String>,

    /// Leads delivered since startup
    pub leads_delivered: usize,
}

impl App {
    /// Create the app with the intake named in the config
    pub fn new(config: Config) -> Result<Self> {
        let intake = config.build_intake()?;
        Ok(Self::with_intake(config, intake))
    }

    pub fn with_intake(config: Config, intake: Arc<dyn Intake>) -> Self {
        let source_page = config.resolved_source_page();
        let form = LeadFormController::new(intake, source_page, config.form_settings());
        debug!(source_page = %form.source_page(), intake = form.intake_name(), "Form created");

        Self {
            config,
            form,
            state: AppState::Normal,
            focus: FormFocus::Name,
            status_message: None,
            leads_delivered: 0,
        }
    }

    /// Inputs are locked while a lead is sending or the thank-you is up
    pub fn is_editable(&self) -> bool {
        self.form.status() == SubmissionStatus::Idle
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Type one character into the focused field
    pub fn type_char(&mut self, c: char) {
        if !self.is_editable() {
            return;
        }
        let Some(field) = self.focus.field() else {
            return;
        };

        let current = self.form.state().get(field);
        if !can_add_char(field, current, c) {
            return;
        }

        let mut value = current.to_string();
        value.push(c);
        self.form.update_field(field, &value);
    }

    /// Delete the last character of the focused field.
    /// Phone input deletes the last digit so the mask never gets in the way.
    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        let Some(field) = self.focus.field() else {
            return;
        };

        let mut value = match field {
            LeadField::Phone => phone_digits(self.form.state().get(field)),
            _ => self.form.state().get(field).to_string(),
        };
        value.pop();
        self.form.update_field(field, &value);
    }

    pub fn clear_focused_field(&mut self) {
        if !self.is_editable() {
            return;
        }
        if let Some(field) = self.focus.field() {
            self.form.update_field(field, "");
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Press the submit button
    pub fn submit(&mut self) {
        match self.form.submit() {
            Ok(()) => {
                self.status_message = Some("Sending...".to_string());
            }
            Err(SubmitError::Invalid(errors)) => {
                if let Some(focus) = errors.fields().find_map(|(field, _)| FormFocus::from_field(field)) {
                    self.focus = focus;
                }
                self.status_message = Some(format!(
                    "Please fix {} highlighted field{}",
                    errors.field_count(),
                    if errors.field_count() == 1 { "" } else { "s" }
                ));
            }
            Err(SubmitError::SpamDetected) => {
                self.status_message = None;
            }
            Err(SubmitError::InFlight(status)) => {
                debug!(?status, "Submit pressed while busy");
            }
        }
    }

    /// Check for completed background work and update the status line
    pub fn check_background_tasks(&mut self) {
        for update in self.form.poll_events() {
            match update {
                FormUpdate::Submitted => {
                    self.leads_delivered += 1;
                    info!(total = self.leads_delivered, "Lead captured");
                    self.status_message = Some("Lead sent".to_string());
                }
                FormUpdate::Failed(error) => {
                    self.status_message = Some(format!("Send failed: {}", error));
                }
                FormUpdate::Reset => {
                    self.focus = FormFocus::Name;
                    self.status_message = None;
                }
            }
        }
    }

    /// Start over with an empty form
    pub fn new_lead(&mut self) {
        self.form.reset();
        self.focus = FormFocus::Name;
        self.status_message = None;
    }
}

// ============================================================================
// Input helpers
// ============================================================================

fn max_length(field: LeadField) -> usize {
    match field {
        LeadField::Name => MAX_NAME_LENGTH,
        LeadField::Address => MAX_ADDRESS_LENGTH,
        LeadField::Phone => MAX_FORMATTED_PHONE_LENGTH,
        LeadField::Email => MAX_EMAIL_LENGTH,
        LeadField::Details => MAX_DETAILS_LENGTH,
        LeadField::Honeypot => 0,
    }
}

/// Check if a character should be accepted into a field's current value
pub fn can_add_char(field: LeadField, current: &str, c: char) -> bool {
    if c.is_control() {
        return false;
    }
    match field {
        LeadField::Phone => c.is_ascii_digit() && phone_digits(current).len() < PHONE_DIGITS,
        LeadField::Email => !c.is_whitespace() && current.chars().count() < max_length(field),
        _ => current.chars().count() < max_length(field),
    }
}

// ============================================================================
// Tests
// ============================================================================
