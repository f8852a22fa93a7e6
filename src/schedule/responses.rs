use serde::Serialize;

#[derive(Default, Serialize)]
pub struct ScheduleItem {
    pub schedule_id: u64,
    pub medication_id: u64,
    pub time_of_day: String,
    pub dosage_amount: String,
    pub days_of_week: String,
    pub days_display: String,
    pub notes: String,
}

#[derive(Default, Serialize)]
pub struct ListSchedulesResponse {
    pub success: bool,
    pub err: String,
    pub schedules: Vec<ScheduleItem>,
}

crate::impl_err_response! {
    ListSchedulesResponse,
}
