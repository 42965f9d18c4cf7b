//! Field-level submission checks.
//!
//! These run before a job exists; a rejected payload never reaches the
//! delivery engine.

use herald_common::error::AppError;
use herald_common::types::SubmissionPayload;

const MAX_TEXT_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 50;
const MAX_MESSAGE_LEN: usize = 5000;

pub fn submission(payload: &SubmissionPayload) -> Result<(), AppError> {
    require_text("first_name", &payload.first_name, MAX_TEXT_LEN)?;
    require_text("last_name", &payload.last_name, MAX_TEXT_LEN)?;
    require_text("listing_id", &payload.listing_id, MAX_TEXT_LEN)?;
    require_text("listing_name", &payload.listing_name, MAX_TEXT_LEN)?;

    if !looks_like_email(&payload.email) {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    if let Some(phone) = payload.phone.as_deref() {
        if phone.len() > MAX_PHONE_LEN {
            return Err(AppError::Validation(format!(
                "phone must be at most {} characters",
                MAX_PHONE_LEN
            )));
        }
    }

    if let Some(message) = payload.message.as_deref() {
        if message.len() > MAX_MESSAGE_LEN {
            return Err(AppError::Validation(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }
    }

    for service in &payload.selected_services {
        if service.name.trim().is_empty() || service.name.len() > MAX_TEXT_LEN {
            return Err(AppError::Validation(
                "Each selected service needs a name of at most 255 characters".to_string(),
            ));
        }
        if !service.price.is_finite() || service.price < 0.0 {
            return Err(AppError::Validation(
                "Service prices must be non-negative numbers".to_string(),
            ));
        }
    }

    Ok(())
}

fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> SubmissionPayload {
        SubmissionPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            message: None,
            listing_id: "listing-1".to_string(),
            listing_name: "Studio".to_string(),
            selected_services: vec![],
        }
    }

    #[test]
    fn test_accepts_valid_payload() {
        assert!(submission(&valid_payload()).is_ok());
    }

    #[test]
    fn test_rejects_blank_first_name() {
        let mut payload = valid_payload();
        payload.first_name = "   ".to_string();
        assert!(submission(&payload).is_err());
    }

    #[test]
    fn test_rejects_malformed_email() {
        for bad in ["", "not-an-email", "missing@domain", "@example.com"] {
            let mut payload = valid_payload();
            payload.email = bad.to_string();
            assert!(submission(&payload).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_rejects_oversized_message() {
        let mut payload = valid_payload();
        payload.message = Some("x".repeat(MAX_MESSAGE_LEN + 1));
        assert!(submission(&payload).is_err());
    }

    #[test]
    fn test_rejects_negative_service_price() {
        let mut payload = valid_payload();
        payload.selected_services = vec![herald_common::types::ServiceSelection {
            name: "Consultation".to_string(),
            price: -1.0,
        }];
        assert!(submission(&payload).is_err());
    }
}
