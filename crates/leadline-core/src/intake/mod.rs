//! Intake collaborators that durably record a submitted lead.
//!
//! The form controller only knows the `Intake` trait. Implementations:
//! - `LogIntake`: simulated delay, then logs the lead (the stand-in the site ships with)
//! - `HttpIntake`: POSTs the lead as JSON to a CRM or webhook endpoint
//! - `OutboxIntake`: appends the lead to a local JSON Lines file

pub mod error;
pub mod http;
pub mod log;
pub mod outbox;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::form::LeadFormState;

pub use error::IntakeError;
pub use http::HttpIntake;
pub use log::LogIntake;
pub use outbox::OutboxIntake;

/// A lead as handed to the intake collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LeadRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub details: String,
    /// Path of the page the form was submitted from
    pub source_page: String,
    /// RFC 3339 UTC, millisecond precision
    pub timestamp: String,
}

impl LeadRecord {
    /// Package form values for delivery. The honeypot is never forwarded.
    /// The email is trimmed to the same value validation checked.
    pub fn from_form(state: &LeadFormState, source_page: &str, at: DateTime<Utc>) -> Self {
        Self {
            name: state.name.clone(),
            address: state.address.clone(),
            phone: state.phone.clone(),
            email: state.email.trim().to_string(),
            details: state.details.clone(),
            source_page: source_page.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Records a submitted lead somewhere durable.
#[async_trait]
pub trait Intake: Send + Sync {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), IntakeError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
