use crate::schema::appointments;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub service_id: u64,
    pub scheduled_at: NaiveDateTime,
    pub is_online: bool,
    pub checked_in: bool,
    pub blood_pressure: Option<String>,
    pub symptoms: String,
    pub notes: String,
    pub request_lab_sample: bool,
    pub status: String,
}

#[derive(Insertable)]
#[table_name = "appointments"]
pub struct NewAppointment {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub service_id: u64,
    pub scheduled_at: NaiveDateTime,
    pub is_online: bool,
    pub checked_in: bool,
    pub blood_pressure: Option<String>,
    pub symptoms: String,
    pub notes: String,
    pub request_lab_sample: bool,
    pub status: String,
}

pub const APPOINT_STATUS_SCHEDULED: &str = "SCHEDULED";
pub const APPOINT_STATUS_CHECKED_IN: &str = "CHECKED_IN";
pub const APPOINT_STATUS_UNDER_REVIEW: &str = "UNDER_REVIEW";
pub const APPOINT_STATUS_COMPLETED: &str = "COMPLETED";
pub const APPOINT_STATUS_CANCELLED: &str = "CANCELLED";

/// COMPLETED and CANCELLED accept no further transitions.
pub fn is_terminal(status: &str) -> bool {
    status == APPOINT_STATUS_COMPLETED || status == APPOINT_STATUS_CANCELLED
}

/// Review entry states. Online encounters have no front desk, so they may
/// enter review straight from SCHEDULED; on-site ones must be checked in.
pub fn can_enter_review(status: &str, is_online: bool) -> bool {
    match status {
        APPOINT_STATUS_CHECKED_IN => true,
        APPOINT_STATUS_SCHEDULED => is_online,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(is_terminal(APPOINT_STATUS_COMPLETED));
        assert!(is_terminal(APPOINT_STATUS_CANCELLED));
        assert!(!is_terminal(APPOINT_STATUS_SCHEDULED));
        assert!(!is_terminal(APPOINT_STATUS_CHECKED_IN));
        assert!(!is_terminal(APPOINT_STATUS_UNDER_REVIEW));
    }

    #[test]
    fn review_entry_requires_check_in_on_site() {
        assert!(can_enter_review(APPOINT_STATUS_CHECKED_IN, false));
        assert!(!can_enter_review(APPOINT_STATUS_SCHEDULED, false));
        assert!(!can_enter_review(APPOINT_STATUS_COMPLETED, false));
    }

    #[test]
    fn review_entry_skips_check_in_online() {
        assert!(can_enter_review(APPOINT_STATUS_SCHEDULED, true));
        assert!(can_enter_review(APPOINT_STATUS_CHECKED_IN, true));
        assert!(!can_enter_review(APPOINT_STATUS_CANCELLED, true));
    }
}
