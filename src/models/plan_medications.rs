use crate::schema::plan_medications;
use chrono::NaiveDate;

#[derive(Queryable)]
pub struct PlanMedication {
    pub id: u64,
    pub plan_id: u64,
    pub medication_id: u64,
    pub dosage: String,
    pub frequency: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: String,
    pub instructions: String,
}

#[derive(Insertable)]
#[table_name = "plan_medications"]
pub struct NewPlanMedication {
    pub plan_id: u64,
    pub medication_id: u64,
    pub dosage: String,
    pub frequency: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: String,
    pub instructions: String,
}

pub const FREQ_ONCE_DAILY: &str = "ONCE_DAILY";
pub const FREQ_TWICE_DAILY: &str = "TWICE_DAILY";
pub const FREQ_THREE_TIMES_DAILY: &str = "THREE_TIMES_DAILY";
pub const FREQ_FOUR_TIMES_DAILY: &str = "FOUR_TIMES_DAILY";
pub const FREQ_EVERY_OTHER_DAY: &str = "EVERY_OTHER_DAY";
pub const FREQ_WEEKLY: &str = "WEEKLY";
pub const FREQ_MONTHLY: &str = "MONTHLY";

pub fn is_known_frequency(frequency: &str) -> bool {
    matches!(
        frequency,
        FREQ_ONCE_DAILY
            | FREQ_TWICE_DAILY
            | FREQ_THREE_TIMES_DAILY
            | FREQ_FOUR_TIMES_DAILY
            | FREQ_EVERY_OTHER_DAY
            | FREQ_WEEKLY
            | FREQ_MONTHLY
    )
}

/// Default dosing slots per frequency. Non-daily frequencies get a single
/// morning slot; the editor refines those afterwards.
pub fn default_schedule_slots(frequency: &str) -> Option<&'static [&'static str]> {
    match frequency {
        FREQ_ONCE_DAILY => Some(&["08:00"]),
        FREQ_TWICE_DAILY => Some(&["08:00", "20:00"]),
        FREQ_THREE_TIMES_DAILY => Some(&["08:00", "14:00", "20:00"]),
        FREQ_FOUR_TIMES_DAILY => Some(&["06:00", "12:00", "18:00", "00:00"]),
        FREQ_EVERY_OTHER_DAY | FREQ_WEEKLY | FREQ_MONTHLY => Some(&["08:00"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_frequencies_map_to_fixed_slots() {
        assert_eq!(default_schedule_slots(FREQ_ONCE_DAILY), Some(&["08:00"][..]));
        assert_eq!(
            default_schedule_slots(FREQ_TWICE_DAILY),
            Some(&["08:00", "20:00"][..])
        );
        assert_eq!(
            default_schedule_slots(FREQ_THREE_TIMES_DAILY),
            Some(&["08:00", "14:00", "20:00"][..])
        );
        assert_eq!(
            default_schedule_slots(FREQ_FOUR_TIMES_DAILY),
            Some(&["06:00", "12:00", "18:00", "00:00"][..])
        );
    }

    #[test]
    fn sparse_frequencies_get_one_slot() {
        assert_eq!(default_schedule_slots(FREQ_WEEKLY), Some(&["08:00"][..]));
        assert_eq!(default_schedule_slots(FREQ_MONTHLY), Some(&["08:00"][..]));
        assert_eq!(
            default_schedule_slots(FREQ_EVERY_OTHER_DAY),
            Some(&["08:00"][..])
        );
    }

    #[test]
    fn unknown_frequency() {
        assert!(!is_known_frequency("HOURLY"));
        assert_eq!(default_schedule_slots("HOURLY"), None);
    }
}
