use std::borrow::Cow;

use validator::ValidationError;

pub const CONTACT_NUMBER_MIN_DIGITS: usize = 8;
pub const CONTACT_NUMBER_MAX_DIGITS: usize = 15;

pub fn validate_required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Contact numbers are digits only, no spaces or separators.
pub fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Donor Contact Number is required")));
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("contact_number_not_digits")
            .with_message(Cow::Borrowed("Donor Contact Number must contain only numbers")));
    }

    let len = value.len();
    if !(CONTACT_NUMBER_MIN_DIGITS..=CONTACT_NUMBER_MAX_DIGITS).contains(&len) {
        return Err(ValidationError::new("contact_number_length")
            .with_message(Cow::Borrowed("Donor Contact Number must be between 8 and 15 digits")));
    }

    Ok(())
}
