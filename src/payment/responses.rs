use serde::Serialize;

use crate::models::payment_transactions::PaymentTransaction;

#[derive(Default, Serialize)]
pub struct TransactionItem {
    pub transaction_id: u64,
    pub appointment_id: u64,
    pub order_id: String,
    pub amount: u64,
    pub payment_method: String,
    pub provider_transaction_id: String,
    pub transaction_status: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
    pub transaction_time: String,
}

impl TransactionItem {
    pub fn from_data(data: &PaymentTransaction) -> Self {
        Self {
            transaction_id: data.id,
            appointment_id: data.appointment_id,
            order_id: data.order_id.clone().unwrap_or_default(),
            amount: data.amount,
            payment_method: data.payment_method.clone(),
            provider_transaction_id: data.provider_transaction_id.clone().unwrap_or_default(),
            transaction_status: data.transaction_status.clone(),
            notes: data.notes.clone(),
            created_at: crate::utils::format_time_str(&data.created_at),
            updated_at: crate::utils::format_time_str(&data.updated_at),
            transaction_time: crate::utils::format_time_str_opt(&data.transaction_time),
        }
    }
}

#[derive(Default, Serialize)]
pub struct CreateTransactionResponse {
    pub success: bool,
    pub err: String,
    pub transaction_id: u64,
}

#[derive(Default, Serialize)]
pub struct CreateQrPaymentResponse {
    pub success: bool,
    pub err: String,
    pub order_id: String,
    pub pay_url: String,
}

#[derive(Default, Serialize)]
pub struct TransactionResponse {
    pub success: bool,
    pub err: String,
    pub transaction: TransactionItem,
}

crate::impl_err_response! {
    CreateTransactionResponse,
    CreateQrPaymentResponse,
    TransactionResponse,
}
