use crate::errors::ServiceError;
use crate::schema::medication_schedules;
use chrono::NaiveTime;

#[derive(Queryable)]
pub struct MedicationSchedule {
    pub id: u64,
    pub medication_id: u64,
    pub time_of_day: String,
    pub dosage_amount: String,
    pub days_of_week: String,
    pub notes: String,
}

#[derive(Insertable)]
#[table_name = "medication_schedules"]
pub struct NewMedicationSchedule {
    pub medication_id: u64,
    pub time_of_day: String,
    pub dosage_amount: String,
    pub days_of_week: String,
    pub notes: String,
}

#[derive(AsChangeset, Default)]
#[table_name = "medication_schedules"]
pub struct UpdateMedicationSchedule {
    pub time_of_day: Option<String>,
    pub dosage_amount: Option<String>,
    pub days_of_week: Option<String>,
    pub notes: Option<String>,
}

pub const DAYS_OF_WEEK: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Days are stored as a CSV subset of MON..SUN; the empty string means
/// every day.
pub fn validate_days_of_week(days: &str) -> Result<(), ServiceError> {
    if days.is_empty() {
        return Ok(());
    }

    let mut seen = Vec::new();
    for day in days.split(',') {
        if !DAYS_OF_WEEK.contains(&day) {
            return Err(ServiceError::validation(format!(
                "unknown day of week '{}'",
                day
            )));
        }
        if seen.contains(&day) {
            return Err(ServiceError::validation(format!(
                "duplicate day of week '{}'",
                day
            )));
        }
        seen.push(day);
    }
    Ok(())
}

pub fn validate_time_of_day(time: &str) -> Result<(), ServiceError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| ServiceError::validation(format!("invalid time_of_day '{}'", time)))
}

pub fn format_days_of_week(days: &str) -> String {
    if days.is_empty() {
        "Every day".to_string()
    } else {
        days.split(',').collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_days_means_every_day() {
        assert!(validate_days_of_week("").is_ok());
        assert_eq!(format_days_of_week(""), "Every day");
    }

    #[test]
    fn subset_accepted() {
        assert!(validate_days_of_week("MON").is_ok());
        assert!(validate_days_of_week("MON,WED,FRI").is_ok());
        assert!(validate_days_of_week("MON,TUE,WED,THU,FRI,SAT,SUN").is_ok());
    }

    #[test]
    fn unknown_and_duplicate_days_rejected() {
        assert!(validate_days_of_week("MONDAY").is_err());
        assert!(validate_days_of_week("MON,MON").is_err());
        assert!(validate_days_of_week("MON,,WED").is_err());
    }

    #[test]
    fn time_of_day_format() {
        assert!(validate_time_of_day("08:00").is_ok());
        assert!(validate_time_of_day("23:59").is_ok());
        assert!(validate_time_of_day("24:00").is_err());
        assert!(validate_time_of_day("8am").is_err());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format_days_of_week("MON,WED"), "MON, WED");
    }
}
