use serde::Deserialize;

use crate::protocol::Actor;

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    pub actor: Actor,
    pub appointment_id: u64,
    pub amount: u64,
    pub payment_method: String,
}

#[derive(Deserialize)]
pub struct CreateQrPaymentRequest {
    pub transaction_id: u64,
    pub amount: u64,
    #[serde(default)]
    pub order_info: String,
}

#[derive(Deserialize)]
pub struct ReconcileRequest {
    pub order_id: String,
    pub trans_id: String,
    pub result_code: i32,
}

#[derive(Deserialize)]
pub struct CheckStatusRequest {
    pub order_id: String,
}

#[derive(Deserialize)]
pub struct AppointmentTransactionRequest {
    pub appointment_id: u64,
}
