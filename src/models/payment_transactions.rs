use crate::schema::payment_transactions;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct PaymentTransaction {
    pub id: u64,
    pub appointment_id: u64,
    pub order_id: Option<String>,
    pub amount: u64,
    pub payment_method: String,
    pub provider_transaction_id: Option<String>,
    pub transaction_status: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub transaction_time: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "payment_transactions"]
pub struct NewPaymentTransaction {
    pub appointment_id: u64,
    pub order_id: Option<String>,
    pub amount: u64,
    pub payment_method: String,
    pub provider_transaction_id: Option<String>,
    pub transaction_status: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub transaction_time: Option<NaiveDateTime>,
}

/// Changeset for the PENDING->terminal conditional update. `None` fields
/// keep the stored value (staff confirmation has no provider id to record).
#[derive(AsChangeset)]
#[table_name = "payment_transactions"]
pub struct FinalizeTransaction {
    pub transaction_status: String,
    pub provider_transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
    pub transaction_time: NaiveDateTime,
}

pub const PAYMENT_METHOD_CASH: &str = "CASH";
pub const PAYMENT_METHOD_QR: &str = "QR";

pub const TRANSACTION_PENDING: &str = "PENDING";
pub const TRANSACTION_SUCCESS: &str = "SUCCESS";
pub const TRANSACTION_FAILED: &str = "FAILED";
pub const TRANSACTION_CANCELLED: &str = "CANCELLED";

/// Terminal rows are immutable; the PENDING->terminal write is the only
/// mutation and happens through a conditional UPDATE.
pub fn is_terminal(status: &str) -> bool {
    status == TRANSACTION_SUCCESS
        || status == TRANSACTION_FAILED
        || status == TRANSACTION_CANCELLED
}

pub fn is_known_method(method: &str) -> bool {
    method == PAYMENT_METHOD_CASH || method == PAYMENT_METHOD_QR
}

/// Provider result codes carried on the redirect/status payloads.
pub const PROVIDER_RESULT_SUCCESS: i32 = 0;
pub const PROVIDER_RESULT_AWAITING_CONFIRM: i32 = 1000;

/// Terminal status a provider result code finalizes to.
pub fn provider_outcome(result_code: i32) -> &'static str {
    if result_code == PROVIDER_RESULT_SUCCESS {
        TRANSACTION_SUCCESS
    } else {
        TRANSACTION_FAILED
    }
}

/// Worklist predicate: a QR payment the provider has seen (it issued a
/// transaction id) but nobody has finalized yet. Computed fresh on every
/// poll, straight off the row.
pub fn needs_staff_confirmation(tx: &PaymentTransaction) -> bool {
    tx.payment_method == PAYMENT_METHOD_QR
        && tx.provider_transaction_id.is_some()
        && tx.transaction_status == TRANSACTION_PENDING
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(method: &str, provider_id: Option<&str>, status: &str) -> PaymentTransaction {
        let now = NaiveDate::from_ymd(2026, 3, 1).and_hms(10, 0, 0);
        PaymentTransaction {
            id: 55,
            appointment_id: 100,
            order_id: Some("ORDER_55_1700000000000".to_string()),
            amount: 350_000,
            payment_method: method.to_string(),
            provider_transaction_id: provider_id.map(|s| s.to_string()),
            transaction_status: status.to_string(),
            notes: "".to_string(),
            created_at: now,
            updated_at: now,
            transaction_time: None,
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(!is_terminal(TRANSACTION_PENDING));
        assert!(is_terminal(TRANSACTION_SUCCESS));
        assert!(is_terminal(TRANSACTION_FAILED));
        assert!(is_terminal(TRANSACTION_CANCELLED));
    }

    #[test]
    fn provider_outcome_mapping() {
        assert_eq!(provider_outcome(0), TRANSACTION_SUCCESS);
        assert_eq!(provider_outcome(1006), TRANSACTION_FAILED);
        assert_eq!(provider_outcome(-1), TRANSACTION_FAILED);
    }

    #[test]
    fn worklist_predicate() {
        assert!(needs_staff_confirmation(&tx(
            PAYMENT_METHOD_QR,
            Some("MOMO123"),
            TRANSACTION_PENDING
        )));
        // No provider transaction id yet: the QR was never scanned.
        assert!(!needs_staff_confirmation(&tx(
            PAYMENT_METHOD_QR,
            None,
            TRANSACTION_PENDING
        )));
        // Finalized rows drop off the worklist without manual dismissal.
        assert!(!needs_staff_confirmation(&tx(
            PAYMENT_METHOD_QR,
            Some("MOMO123"),
            TRANSACTION_SUCCESS
        )));
        assert!(!needs_staff_confirmation(&tx(
            PAYMENT_METHOD_CASH,
            Some("MOMO123"),
            TRANSACTION_PENDING
        )));
    }
}
