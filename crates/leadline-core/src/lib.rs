//! Leadline core library.
//!
//! Lead capture for a home-services website: form state, phone formatting,
//! validation with a honeypot spam check, and the submission lifecycle
//! against an injected intake collaborator. Also carries the site's static
//! tables (routes, services, pricing, contact deep links) and the review
//! redirect rule.
//!
//! Front ends (the `leadline` TUI, a web handler) own a
//! `LeadFormController` per form instance and feed it user edits.

pub mod config;
pub mod form;
pub mod intake;
pub mod review;
pub mod site;

pub use config::{Config, IntakeConfig};
pub use form::{
    format_phone_number, validate, FieldErrors, FormSettings, FormUpdate, LeadField,
    LeadFormController, LeadFormState, SubmissionStatus, SubmitError,
};
pub use intake::{Intake, IntakeError, LeadRecord};
