use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SearchAppointItem {
    pub appointment_id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub scheduled_at: String,
    pub is_online: bool,
    pub checked_in: bool,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct SearchAppointResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<SearchAppointItem>,
}

#[derive(Default, Serialize)]
pub struct PendingConfirmationItem {
    pub transaction_id: u64,
    pub appointment_id: u64,
    pub order_id: String,
    pub amount: u64,
    pub provider_transaction_id: String,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct PendingConfirmationsResponse {
    pub success: bool,
    pub err: String,
    pub transactions: Vec<PendingConfirmationItem>,
}

crate::impl_err_response! {
    SearchAppointResponse,
    PendingConfirmationsResponse,
}
