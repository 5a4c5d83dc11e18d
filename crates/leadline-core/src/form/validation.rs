use std::sync::LazyLock;

use regex::Regex;

use super::{FieldErrors, LeadField, LeadFormState, PHONE_DIGITS};

/// Shape check only: something@something.something with no whitespace.
/// Deliberately permissive; exotic but valid addresses may be rejected.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s]+$").unwrap());

pub const SPAM_DETECTED_MESSAGE: &str = "Spam detected";

const NAME_REQUIRED: &str = "Name is required";
const PHONE_REQUIRED: &str = "Phone number is required";
const PHONE_INVALID: &str = "Please enter a valid 10-digit phone number";
const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Please enter a valid email address";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a form, returning only the fields that failed.
///
/// A filled honeypot short-circuits everything else: the result holds only
/// the general spam message so a bot learns nothing about which fields it
/// got right.
pub fn validate(state: &LeadFormState) -> FieldErrors {
    if !state.honeypot.is_empty() {
        return FieldErrors::general_only(SPAM_DETECTED_MESSAGE);
    }

    let mut errors = FieldErrors::new();

    if state.name.trim().is_empty() {
        errors.insert(LeadField::Name, NAME_REQUIRED);
    }

    let digits = state.phone_digits();
    if digits.is_empty() {
        errors.insert(LeadField::Phone, PHONE_REQUIRED);
    } else if digits.len() != PHONE_DIGITS {
        errors.insert(LeadField::Phone, PHONE_INVALID);
    }

    let email = state.email.trim();
    if email.is_empty() {
        errors.insert(LeadField::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.insert(LeadField::Email, EMAIL_INVALID);
    }

    errors
}
