//! Retry eligibility schedule.
//!
//! Thresholds are cumulative minutes since the job was *created*, not since
//! the last attempt. Anchoring to creation caps total time-to-resolution:
//! whatever the attempt spacing, a job is `sent` or `failed` within 24 hours
//! of submission.

use chrono::{DateTime, Utc};

/// Ceiling on recorded delivery attempts. At this many failures a job is
/// `failed` for good and leaves the eligibility window.
pub const MAX_ATTEMPTS: i32 = 6;

/// Minimum minutes since creation before the next attempt, for a job with
/// `retry_count` recorded failures. `None` means the job is at or past the
/// attempt ceiling and never eligible again.
pub fn threshold_minutes(retry_count: i32) -> Option<i64> {
    match retry_count {
        0 | 1 => Some(5),
        2 => Some(30),
        3 => Some(120),
        4 => Some(720),
        5 => Some(1440),
        _ => None,
    }
}

/// Whether a job is retry-eligible at `now`.
pub fn is_eligible(retry_count: i32, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match threshold_minutes(retry_count) {
        Some(minutes) => now.signed_duration_since(created_at).num_minutes() >= minutes,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_schedule_table() {
        assert_eq!(threshold_minutes(0), Some(5));
        assert_eq!(threshold_minutes(1), Some(5));
        assert_eq!(threshold_minutes(2), Some(30));
        assert_eq!(threshold_minutes(3), Some(120));
        assert_eq!(threshold_minutes(4), Some(720));
        assert_eq!(threshold_minutes(5), Some(1440));
        assert_eq!(threshold_minutes(6), None);
        assert_eq!(threshold_minutes(42), None);
    }

    #[test]
    fn test_gating_around_threshold() {
        let created = Utc::now();
        // retry_count 2 → 30 minute threshold
        assert!(!is_eligible(2, created, created + Duration::minutes(29)));
        assert!(is_eligible(2, created, created + Duration::minutes(30)));
        assert!(is_eligible(2, created, created + Duration::minutes(31)));
    }

    #[test]
    fn test_fresh_job_waits_five_minutes() {
        let created = Utc::now();
        assert!(!is_eligible(0, created, created));
        assert!(!is_eligible(0, created, created + Duration::minutes(4)));
        assert!(is_eligible(0, created, created + Duration::minutes(5)));
    }

    #[test]
    fn test_ceiling_is_never_eligible() {
        let created = Utc::now();
        assert!(!is_eligible(MAX_ATTEMPTS, created, created + Duration::days(365)));
    }

    #[test]
    fn test_last_window_opens_at_24_hours() {
        let created = Utc::now();
        assert!(!is_eligible(5, created, created + Duration::hours(23)));
        assert!(is_eligible(5, created, created + Duration::hours(24)));
    }
}
