use serde::Serialize;

use crate::payment::responses::TransactionItem;

#[derive(Default, Serialize)]
pub struct BookAppointResponse {
    pub success: bool,
    pub err: String,
    pub appointment_id: u64,
}

#[derive(Default, Serialize)]
pub struct SearchAppointItem {
    pub appointment_id: u64,
    pub doctor_id: u64,
    pub service_id: u64,
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
pub struct MyTransactionsResponse {
    pub success: bool,
    pub err: String,
    pub transactions: Vec<TransactionItem>,
}

crate::impl_err_response! {
    BookAppointResponse,
    SearchAppointResponse,
    MyTransactionsResponse,
}
