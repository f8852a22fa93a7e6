pub mod provider;
mod requests;
pub(crate) mod responses;

use crate::{
    database::{assert, get_db_conn},
    errors::ServiceError,
    models::payment_transactions::{
        is_terminal, provider_outcome, FinalizeTransaction, NewPaymentTransaction,
        PaymentTransaction, PAYMENT_METHOD_QR, PROVIDER_RESULT_AWAITING_CONFIRM,
        TRANSACTION_PENDING,
    },
    protocol::ROLE_STAFF,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use chrono::Utc;
use diesel::{prelude::*, r2d2::ConnectionManager, MysqlConnection};
use r2d2::PooledConnection;
use tracing::info;

use self::provider::PaymentProvider;
use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_transaction)
        .service(create_qr)
        .service(reconcile)
        .service(check_status)
        .service(by_appointment);
}

crate::post_funcs! {
    (create_transaction, "/create_transaction", CreateTransactionRequest, CreateTransactionResponse),
    (by_appointment, "/by_appointment", AppointmentTransactionRequest, TransactionResponse),
}

// create_qr and check_status talk to the external provider, so they take
// the provider handle and are written out instead of generated.

#[post("/create_qr")]
async fn create_qr(
    pool: web::Data<DbPool>,
    provider: web::Data<PaymentProvider>,
    info: web::Json<CreateQrPaymentRequest>,
) -> impl Responder {
    let response = match create_qr_impl(pool, provider, info).await {
        Ok(response) => response,
        Err(err) => CreateQrPaymentResponse::err(err.to_string()),
    };
    HttpResponse::Ok().json(response)
}

#[post("/reconcile")]
async fn reconcile(pool: web::Data<DbPool>, info: web::Json<ReconcileRequest>) -> impl Responder {
    let response = match reconcile_impl(pool, info).await {
        Ok(response) => response,
        Err(err) => TransactionResponse::err(err.to_string()),
    };
    HttpResponse::Ok().json(response)
}

#[post("/check_status")]
async fn check_status(
    pool: web::Data<DbPool>,
    provider: web::Data<PaymentProvider>,
    info: web::Json<CheckStatusRequest>,
) -> impl Responder {
    let response = match check_status_impl(pool, provider, info).await {
        Ok(response) => response,
        Err(err) => TransactionResponse::err(err.to_string()),
    };
    HttpResponse::Ok().json(response)
}

/// Conditional PENDING->terminal update shared by every finalization path.
/// Returns the number of affected rows: 1 means this writer won, 0 means
/// the row was already terminal and the caller must re-read.
pub(crate) fn finalize_pending(
    conn: &PooledConnection<ConnectionManager<MysqlConnection>>,
    transaction_id: u64,
    changes: &FinalizeTransaction,
) -> anyhow::Result<usize> {
    use crate::schema::payment_transactions;

    diesel::update(
        payment_transactions::table
            .filter(payment_transactions::id.eq(transaction_id))
            .filter(payment_transactions::transaction_status.eq(TRANSACTION_PENDING)),
    )
    .set(changes)
    .execute(conn)
    .context("DB error")
}

async fn create_transaction_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CreateTransactionRequest>,
) -> anyhow::Result<CreateTransactionResponse> {
    use crate::models::payment_transactions::is_known_method;
    use crate::schema::payment_transactions;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_STAFF)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    if !is_known_method(&info.payment_method) {
        return Err(
            ServiceError::validation(format!("unknown payment method '{}'", info.payment_method))
                .into(),
        );
    }

    let conn = get_db_conn(&pool)?;
    let transaction_id = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            // one live payment flow per appointment at a time
            let open = payment_transactions::table
                .filter(payment_transactions::appointment_id.eq(info.appointment_id))
                .filter(payment_transactions::transaction_status.eq(TRANSACTION_PENDING))
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if open > 0 {
                return Err(ServiceError::Conflict(format!(
                    "appointment #{} already has a pending transaction",
                    info.appointment_id
                ))
                .into());
            }

            let now = Utc::now().naive_utc();
            let data = NewPaymentTransaction {
                appointment_id: info.appointment_id,
                order_id: None,
                amount: info.amount,
                payment_method: info.payment_method,
                provider_transaction_id: None,
                transaction_status: TRANSACTION_PENDING.to_string(),
                notes: "".to_string(),
                created_at: now,
                updated_at: now,
                transaction_time: None,
            };
            diesel::insert_into(payment_transactions::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            diesel::select(crate::database::last_insert_id)
                .get_result::<u64>(&conn)
                .context("DB error")
        })
    })
    .await?;

    Ok(CreateTransactionResponse {
        success: true,
        err: "".to_string(),
        transaction_id,
    })
}

async fn create_qr_impl(
    pool: web::Data<DbPool>,
    provider: web::Data<PaymentProvider>,
    info: web::Json<CreateQrPaymentRequest>,
) -> anyhow::Result<CreateQrPaymentResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();
    assert::assert_transaction(&pool, info.transaction_id).await?;

    let conn = get_db_conn(&pool)?;
    let transaction_id = info.transaction_id;
    let tx = web::block(move || {
        payment_transactions::table
            .filter(payment_transactions::id.eq(transaction_id))
            .get_result::<PaymentTransaction>(&conn)
    })
    .await
    .context("DB error")?;

    if tx.payment_method != PAYMENT_METHOD_QR {
        return Err(ServiceError::Conflict(format!(
            "transaction #{} is not a QR payment",
            tx.id
        ))
        .into());
    }
    if is_terminal(&tx.transaction_status) {
        return Err(ServiceError::Conflict(format!(
            "transaction #{} is already {}",
            tx.id, tx.transaction_status
        ))
        .into());
    }
    if info.amount != tx.amount {
        return Err(ServiceError::validation(format!(
            "amount {} does not match transaction amount {}",
            info.amount, tx.amount
        ))
        .into());
    }

    let order_id = format!("ORDER_{}_{}", tx.id, Utc::now().timestamp_millis());
    let order_info = if info.order_info.is_empty() {
        format!("Payment for invoice #{}", tx.id)
    } else {
        info.order_info
    };

    // The order id is persisted only after the provider accepts it; a
    // failed call leaves the row PENDING and a retry gets a fresh order id.
    let pay_url = provider.initiate(&order_id, tx.amount, &order_info).await?;

    let conn = get_db_conn(&pool)?;
    let stored_order_id = order_id.clone();
    let affected = web::block(move || {
        diesel::update(
            payment_transactions::table
                .filter(payment_transactions::id.eq(transaction_id))
                .filter(payment_transactions::transaction_status.eq(TRANSACTION_PENDING)),
        )
        .set((
            payment_transactions::order_id.eq(stored_order_id),
            payment_transactions::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&conn)
    })
    .await
    .context("DB error")?;
    if affected == 0 {
        return Err(ServiceError::Conflict(format!(
            "transaction #{} was finalized while the QR payment was being created",
            transaction_id
        ))
        .into());
    }

    info!(transaction_id, %order_id, "QR payment initiated");

    Ok(CreateQrPaymentResponse {
        success: true,
        err: "".to_string(),
        order_id,
        pay_url,
    })
}

async fn reconcile_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ReconcileRequest>,
) -> anyhow::Result<TransactionResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();

    let conn = get_db_conn(&pool)?;
    let tx = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let tx = payment_transactions::table
                .filter(payment_transactions::order_id.eq(&info.order_id))
                .get_result::<PaymentTransaction>(&conn)
                .optional()
                .context("DB error")?
                .ok_or_else(|| ServiceError::NotFound(format!("order '{}'", info.order_id)))?;

            let outcome = provider_outcome(info.result_code);
            let now = Utc::now().naive_utc();
            let changes = FinalizeTransaction {
                transaction_status: outcome.to_string(),
                provider_transaction_id: Some(info.trans_id.clone()),
                payment_method: None,
                notes: None,
                updated_at: now,
                transaction_time: now,
            };
            let affected = finalize_pending(&conn, tx.id, &changes)?;
            if affected == 1 {
                info!(
                    transaction_id = tx.id,
                    outcome, "payment finalized by provider reconciliation"
                );
            } else {
                // Lost the race (or a replayed redirect): the row is
                // terminal, report it unchanged.
                info!(
                    transaction_id = tx.id,
                    status = %tx.transaction_status,
                    "provider reconciliation was a no-op on a terminal transaction"
                );
            }

            payment_transactions::table
                .filter(payment_transactions::id.eq(tx.id))
                .get_result::<PaymentTransaction>(&conn)
                .context("DB error")
        })
    })
    .await?;

    Ok(TransactionResponse {
        success: true,
        err: "".to_string(),
        transaction: TransactionItem::from_data(&tx),
    })
}

async fn check_status_impl(
    pool: web::Data<DbPool>,
    provider: web::Data<PaymentProvider>,
    info: web::Json<CheckStatusRequest>,
) -> anyhow::Result<TransactionResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();

    let conn = get_db_conn(&pool)?;
    let order_id = info.order_id.clone();
    let tx = web::block(move || {
        payment_transactions::table
            .filter(payment_transactions::order_id.eq(&order_id))
            .get_result::<PaymentTransaction>(&conn)
            .optional()
    })
    .await
    .context("DB error")?
    .ok_or_else(|| ServiceError::NotFound(format!("order '{}'", info.order_id)))?;

    if is_terminal(&tx.transaction_status) {
        return Ok(TransactionResponse {
            success: true,
            err: "".to_string(),
            transaction: TransactionItem::from_data(&tx),
        });
    }

    let status = provider.query_status(&info.order_id).await?;

    let conn = get_db_conn(&pool)?;
    let tx = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let now = Utc::now().naive_utc();
            if status.result_code == PROVIDER_RESULT_AWAITING_CONFIRM {
                // The QR was scanned but the provider is still waiting on
                // the user; record the provider id so the transaction shows
                // up on the staff confirmation worklist.
                if let Some(trans_id) = status.trans_id {
                    diesel::update(
                        payment_transactions::table
                            .filter(payment_transactions::id.eq(tx.id))
                            .filter(
                                payment_transactions::transaction_status.eq(TRANSACTION_PENDING),
                            ),
                    )
                    .set((
                        payment_transactions::provider_transaction_id.eq(trans_id),
                        payment_transactions::updated_at.eq(now),
                    ))
                    .execute(&conn)
                    .context("DB error")?;
                }
            } else {
                let outcome = provider_outcome(status.result_code);
                let changes = FinalizeTransaction {
                    transaction_status: outcome.to_string(),
                    provider_transaction_id: status.trans_id,
                    payment_method: None,
                    notes: None,
                    updated_at: now,
                    transaction_time: now,
                };
                if finalize_pending(&conn, tx.id, &changes)? == 1 {
                    info!(
                        transaction_id = tx.id,
                        outcome, "payment finalized by provider status poll"
                    );
                }
            }

            payment_transactions::table
                .filter(payment_transactions::id.eq(tx.id))
                .get_result::<PaymentTransaction>(&conn)
                .context("DB error")
        })
    })
    .await?;

    Ok(TransactionResponse {
        success: true,
        err: "".to_string(),
        transaction: TransactionItem::from_data(&tx),
    })
}

async fn by_appointment_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AppointmentTransactionRequest>,
) -> anyhow::Result<TransactionResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    let tx = web::block(move || {
        payment_transactions::table
            .filter(payment_transactions::appointment_id.eq(appointment_id))
            .order(payment_transactions::created_at.desc())
            .limit(1)
            .get_result::<PaymentTransaction>(&conn)
            .optional()
    })
    .await
    .context("DB error")?
    .ok_or_else(|| {
        ServiceError::NotFound(format!(
            "payment transaction for appointment #{}",
            info.appointment_id
        ))
    })?;

    Ok(TransactionResponse {
        success: true,
        err: "".to_string(),
        transaction: TransactionItem::from_data(&tx),
    })
}
