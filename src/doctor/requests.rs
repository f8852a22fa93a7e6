use serde::Deserialize;

use crate::protocol::Actor;

#[derive(Deserialize)]
pub struct PutUnderReviewRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    #[serde(default)]
    pub notes: String,
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub request_lab_sample: bool,
    #[serde(default)]
    pub symptoms: String,
}

#[derive(Deserialize)]
pub struct CompleteAppointRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct MedicationData {
    #[serde(default)]
    pub medication_id: u64,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationData>,
}

#[derive(Deserialize)]
pub struct ViewPlanRequest {
    pub actor: Actor,
    pub plan_id: u64,
}

#[derive(Deserialize)]
pub struct AddMedicationsRequest {
    pub actor: Actor,
    pub plan_id: u64,
    pub medications: Vec<MedicationData>,
}

#[derive(Deserialize)]
pub struct UpdatePlanStatusRequest {
    pub actor: Actor,
    pub plan_id: u64,
    pub status: String,
}

#[derive(Deserialize)]
pub struct DeletePlanRequest {
    pub actor: Actor,
    pub plan_id: u64,
}
