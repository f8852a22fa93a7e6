use serde::Deserialize;

use crate::protocol::Actor;

#[derive(Deserialize)]
pub struct CreateDefaultRequest {
    pub actor: Actor,
    pub medication_id: u64,
}

#[derive(Deserialize)]
pub struct ScheduleData {
    pub time_of_day: String,
    pub dosage_amount: String,
    #[serde(default)]
    pub days_of_week: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct CreateCustomRequest {
    pub actor: Actor,
    pub medication_id: u64,
    pub schedules: Vec<ScheduleData>,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub actor: Actor,
    pub schedule_id: u64,
    pub time_of_day: Option<String>,
    pub dosage_amount: Option<String>,
    pub days_of_week: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteScheduleRequest {
    pub actor: Actor,
    pub schedule_id: u64,
}

#[derive(Deserialize)]
pub struct ListSchedulesRequest {
    pub medication_id: u64,
}
