//! Lead capture form: field state, validation, and submission lifecycle.
//!
//! This module provides:
//! - `LeadFormState`: the values a visitor has typed into one form
//! - `validate`: synchronous validation producing `FieldErrors`
//! - `format_phone_number`: progressive `(XXX) XXX-XXXX` formatting
//! - `LeadFormController`: owns one form instance and drives submission
//!   through an injected `Intake`
//!
//! Each form instance owns its state exclusively. Nothing here is shared
//! between instances.

pub mod controller;
pub mod phone;
pub mod validation;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use controller::{
    FormEvent, FormSettings, FormUpdate, LeadFormController, SubmitError, SUBMIT_FAILED_MESSAGE,
};
pub use phone::{format_phone_number, phone_digits, MAX_FORMATTED_PHONE_LENGTH, PHONE_DIGITS};
pub use validation::{validate, SPAM_DETECTED_MESSAGE};

// ============================================================================
// Fields
// ============================================================================

/// The fields of a lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Address,
    Phone,
    Email,
    Details,
    /// Hidden field that only bots fill in
    Honeypot,
}

impl LeadField {
    pub const ALL: [LeadField; 6] = [
        LeadField::Name,
        LeadField::Address,
        LeadField::Phone,
        LeadField::Email,
        LeadField::Details,
        LeadField::Honeypot,
    ];

    /// Key used on the wire and in HTML `name` attributes.
    pub fn key(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Address => "address",
            LeadField::Phone => "phone",
            LeadField::Email => "email",
            LeadField::Details => "details",
            LeadField::Honeypot => "honeypot",
        }
    }

    /// Get the display label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            LeadField::Name => "Name",
            LeadField::Address => "Address",
            LeadField::Phone => "Phone",
            LeadField::Email => "Email",
            LeadField::Details => "Project Details",
            LeadField::Honeypot => "Website",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, LeadField::Name | LeadField::Phone | LeadField::Email)
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for LeadField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

// ============================================================================
// Form State
// ============================================================================

/// Values entered into one lead form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFormState {
    pub name: String,
    pub address: String,
    /// Stored formatted as `(XXX) XXX-XXXX`
    pub phone: String,
    pub email: String,
    pub details: String,
    pub honeypot: String,
}

impl LeadFormState {
    /// Store a raw value for a field. The phone field is formatted on the way in.
    pub fn set(&mut self, field: LeadField, raw: &str) {
        match field {
            LeadField::Name => self.name = raw.to_string(),
            LeadField::Address => self.address = raw.to_string(),
            LeadField::Phone => self.phone = format_phone_number(raw),
            LeadField::Email => self.email = raw.to_string(),
            LeadField::Details => self.details = raw.to_string(),
            LeadField::Honeypot => self.honeypot = raw.to_string(),
        }
    }

    pub fn get(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Address => &self.address,
            LeadField::Phone => &self.phone,
            LeadField::Email => &self.email,
            LeadField::Details => &self.details,
            LeadField::Honeypot => &self.honeypot,
        }
    }

    /// Normalized phone: digits only. Valid when exactly ten long.
    pub fn phone_digits(&self) -> String {
        phone_digits(&self.phone)
    }

    pub fn is_empty(&self) -> bool {
        LeadField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Validation messages keyed by field, plus an optional form-level message.
///
/// Recomputed on every validation pass and never merged across submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    fields: BTreeMap<LeadField, String>,
    general: Option<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general_only(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }

    pub fn insert(&mut self, field: LeadField, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: LeadField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: LeadField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Remove one field's message, leaving the rest alone.
    pub fn clear_field(&mut self, field: LeadField) {
        self.fields.remove(&field);
    }

    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn set_general(&mut self, message: impl Into<String>) {
        self.general = Some(message.into());
    }

    /// Fields with a message, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (LeadField, &str)> {
        self.fields.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }
}

// ============================================================================
// Submission Status
// ============================================================================

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
}

impl SubmissionStatus {
    /// Whether the submit control should accept a press.
    pub fn can_submit(&self) -> bool {
        matches!(self, SubmissionStatus::Idle)
    }
}
