use serde::Serialize;

#[derive(Default, Serialize)]
pub struct CreatePlanResponse {
    pub success: bool,
    pub err: String,
    pub plan_id: u64,
}

#[derive(Default, Serialize)]
pub struct ScheduleItem {
    pub schedule_id: u64,
    pub time_of_day: String,
    pub dosage_amount: String,
    pub days_of_week: String,
    pub days_display: String,
    pub notes: String,
}

#[derive(Default, Serialize)]
pub struct MedicationItem {
    pub id: u64,
    pub medication_id: u64,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub prescribed_by: String,
    pub instructions: String,
    pub schedules: Vec<ScheduleItem>,
}

#[derive(Default, Serialize)]
pub struct ViewPlanResponse {
    pub success: bool,
    pub err: String,
    pub plan_id: u64,
    pub appointment_id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub medications: Vec<MedicationItem>,
}

crate::impl_err_response! {
    CreatePlanResponse,
    ViewPlanResponse,
}
