use crate::schema::treatment_plans;
use chrono::NaiveDate;

#[derive(Queryable)]
pub struct TreatmentPlan {
    pub id: u64,
    pub appointment_id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
}

#[derive(Insertable)]
#[table_name = "treatment_plans"]
pub struct NewTreatmentPlan {
    pub appointment_id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
}

pub const PLAN_STATUS_ACTIVE: &str = "ACTIVE";
pub const PLAN_STATUS_PAUSED: &str = "PAUSED";
pub const PLAN_STATUS_COMPLETED: &str = "COMPLETED";
pub const PLAN_STATUS_DISCONTINUED: &str = "DISCONTINUED";

pub fn is_terminal(status: &str) -> bool {
    status == PLAN_STATUS_COMPLETED || status == PLAN_STATUS_DISCONTINUED
}

/// Legal edges: ACTIVE<->PAUSED, and either of the two into a terminal
/// state. Terminal plans accept nothing.
pub fn can_transition(from: &str, to: &str) -> bool {
    match (from, to) {
        (PLAN_STATUS_ACTIVE, PLAN_STATUS_PAUSED) => true,
        (PLAN_STATUS_PAUSED, PLAN_STATUS_ACTIVE) => true,
        (PLAN_STATUS_ACTIVE, PLAN_STATUS_COMPLETED) => true,
        (PLAN_STATUS_PAUSED, PLAN_STATUS_COMPLETED) => true,
        (PLAN_STATUS_ACTIVE, PLAN_STATUS_DISCONTINUED) => true,
        (PLAN_STATUS_PAUSED, PLAN_STATUS_DISCONTINUED) => true,
        _ => false,
    }
}

pub fn is_known_status(status: &str) -> bool {
    matches!(
        status,
        PLAN_STATUS_ACTIVE | PLAN_STATUS_PAUSED | PLAN_STATUS_COMPLETED | PLAN_STATUS_DISCONTINUED
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume() {
        assert!(can_transition(PLAN_STATUS_ACTIVE, PLAN_STATUS_PAUSED));
        assert!(can_transition(PLAN_STATUS_PAUSED, PLAN_STATUS_ACTIVE));
    }

    #[test]
    fn into_terminal() {
        assert!(can_transition(PLAN_STATUS_ACTIVE, PLAN_STATUS_COMPLETED));
        assert!(can_transition(PLAN_STATUS_PAUSED, PLAN_STATUS_DISCONTINUED));
    }

    #[test]
    fn out_of_terminal_rejected() {
        assert!(!can_transition(PLAN_STATUS_COMPLETED, PLAN_STATUS_ACTIVE));
        assert!(!can_transition(PLAN_STATUS_DISCONTINUED, PLAN_STATUS_COMPLETED));
        assert!(!can_transition(PLAN_STATUS_COMPLETED, PLAN_STATUS_DISCONTINUED));
    }

    #[test]
    fn self_edge_rejected() {
        assert!(!can_transition(PLAN_STATUS_ACTIVE, PLAN_STATUS_ACTIVE));
        assert!(!can_transition(PLAN_STATUS_PAUSED, PLAN_STATUS_PAUSED));
    }
}
