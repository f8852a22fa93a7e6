use serde::Deserialize;

use crate::protocol::Actor;

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub actor: Actor,
    pub appointment_id: u64,
}

#[derive(Deserialize)]
pub struct SearchAppointRequest {
    pub actor: Actor,
    pub status: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct CancelPaymentRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct PendingConfirmationsRequest {
    pub actor: Actor,
}
