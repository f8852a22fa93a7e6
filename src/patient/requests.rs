use serde::Deserialize;

use crate::protocol::Actor;

#[derive(Deserialize)]
pub struct BookAppointRequest {
    pub actor: Actor,
    pub doctor_id: u64,
    pub service_id: u64,
    pub scheduled_at: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct SearchAppointRequest {
    pub actor: Actor,
    pub status: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub actor: Actor,
    pub appointment_id: u64,
}

#[derive(Deserialize)]
pub struct MyTransactionsRequest {
    pub actor: Actor,
}
