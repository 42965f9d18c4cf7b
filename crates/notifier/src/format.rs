//! Plain-text email body formatting for submission notifications.

use herald_common::types::DeliveryJob;

/// Render the notification body for a form submission.
pub fn submission_body(job: &DeliveryJob) -> String {
    let p = &job.payload;

    let mut body = String::from("A new submission has been received:\n\n");

    body.push_str("CONTACT INFORMATION:\n");
    body.push_str(&format!("- Name: {} {}\n", p.first_name, p.last_name));
    body.push_str(&format!("- Email: {}\n", p.email));
    body.push_str(&format!(
        "- Phone: {}\n",
        p.phone.as_deref().unwrap_or("(not provided)")
    ));
    body.push('\n');

    body.push_str("LISTING INFORMATION:\n");
    body.push_str(&format!("- Listing ID: {}\n", p.listing_id));
    body.push_str(&format!("- Listing Name: {}\n", p.listing_name));
    body.push('\n');

    if !p.selected_services.is_empty() {
        body.push_str("SELECTED SERVICES:\n");
        let mut total = 0.0;
        for (index, service) in p.selected_services.iter().enumerate() {
            total += service.price;
            body.push_str(&format!(
                "{}. {} - ${:.2}\n",
                index + 1,
                service.name,
                service.price
            ));
        }
        body.push_str(&format!("\nTotal Estimate: ${:.2}\n", total));
        body.push('\n');
    }

    if let Some(message) = p.message.as_deref() {
        body.push_str("MESSAGE:\n");
        body.push_str(message);
        body.push_str("\n\n");
    }

    body.push_str("---\n");
    body.push_str(&format!("Job ID: {}\n", job.id));
    body.push_str(&format!(
        "Submitted: {} UTC\n",
        job.created_at.format("%Y-%m-%d %H:%M:%S")
    ));

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use herald_common::types::{JobStatus, ServiceSelection, SubmissionPayload};
    use uuid::Uuid;

    fn make_job(payload: SubmissionPayload) -> DeliveryJob {
        DeliveryJob {
            id: Uuid::new_v4(),
            payload,
            status: JobStatus::Pending,
            retry_count: 0,
            created_at: Utc.with_ymd_and_hms(2025, 8, 1, 12, 30, 0).unwrap(),
            last_retry_at: None,
            error_message: None,
            environment: "production".to_string(),
        }
    }

    fn make_payload() -> SubmissionPayload {
        SubmissionPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            message: None,
            listing_id: "listing-17".to_string(),
            listing_name: "Northside Studio".to_string(),
            selected_services: vec![],
        }
    }

    #[test]
    fn test_body_contains_contact_and_listing() {
        let job = make_job(make_payload());
        let body = submission_body(&job);

        assert!(body.contains("- Name: Ada Lovelace"));
        assert!(body.contains("- Email: ada@example.com"));
        assert!(body.contains("- Phone: (not provided)"));
        assert!(body.contains("- Listing ID: listing-17"));
        assert!(body.contains("- Listing Name: Northside Studio"));
    }

    #[test]
    fn test_body_services_are_numbered_and_totaled() {
        let mut payload = make_payload();
        payload.selected_services = vec![
            ServiceSelection {
                name: "Consultation".to_string(),
                price: 150.0,
            },
            ServiceSelection {
                name: "Follow-up".to_string(),
                price: 75.5,
            },
        ];
        let body = submission_body(&make_job(payload));

        assert!(body.contains("1. Consultation - $150.00"));
        assert!(body.contains("2. Follow-up - $75.50"));
        assert!(body.contains("Total Estimate: $225.50"));
    }

    #[test]
    fn test_body_omits_empty_sections() {
        let body = submission_body(&make_job(make_payload()));
        assert!(!body.contains("SELECTED SERVICES"));
        assert!(!body.contains("MESSAGE:"));
    }

    #[test]
    fn test_body_footer_has_id_and_timestamp() {
        let job = make_job(make_payload());
        let body = submission_body(&job);

        assert!(body.contains(&format!("Job ID: {}", job.id)));
        assert!(body.contains("Submitted: 2025-08-01 12:30:00 UTC"));
    }

    #[test]
    fn test_body_includes_message_when_present() {
        let mut payload = make_payload();
        payload.message = Some("Please call after 5pm.".to_string());
        let body = submission_body(&make_job(payload));
        assert!(body.contains("MESSAGE:\nPlease call after 5pm."));
    }
}
