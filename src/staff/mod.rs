mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    errors::ServiceError,
    models::{
        appointments::{Appointment, APPOINT_STATUS_CHECKED_IN, APPOINT_STATUS_SCHEDULED},
        payment_transactions::{
            needs_staff_confirmation, FinalizeTransaction, PaymentTransaction, PAYMENT_METHOD_QR,
            TRANSACTION_CANCELLED, TRANSACTION_PENDING, TRANSACTION_SUCCESS,
        },
    },
    payment::finalize_pending,
    protocol::{SimpleResponse, ROLE_STAFF},
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{info, warn};

use crate::payment::responses::{TransactionItem, TransactionResponse};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(check_in)
        .service(search_appoint)
        .service(confirm_payment)
        .service(cancel_payment)
        .service(pending_confirmations);
}

crate::post_funcs! {
    (check_in, "/check_in", CheckInRequest, SimpleResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (confirm_payment, "/confirm_payment", ConfirmPaymentRequest, TransactionResponse),
    (cancel_payment, "/cancel_payment", CancelPaymentRequest, TransactionResponse),
    (pending_confirmations, "/pending_confirmations", PendingConfirmationsRequest, PendingConfirmationsResponse),
}

async fn check_in_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CheckInRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_STAFF)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;
            if appo.status != APPOINT_STATUS_SCHEDULED {
                warn!(
                    appointment_id,
                    status = %appo.status,
                    "check-in rejected"
                );
                return Err(ServiceError::InvalidTransition(format!(
                    "cannot check in appointment #{} in status {}",
                    appointment_id, appo.status
                ))
                .into());
            }

            diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                .set((
                    appointments::checked_in.eq(true),
                    appointments::status.eq(APPOINT_STATUS_CHECKED_IN),
                ))
                .execute(&conn)
                .context("DB error")?;

            info!(appointment_id, "patient checked in");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_STAFF)?;

    let conn = get_db_conn(&pool)?;
    let status_pattern = crate::utils::get_str_pattern_opt(info.status);
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let appos = web::block(move || {
        appointments::table
            .filter(appointments::status.like(status_pattern))
            .order(appointments::scheduled_at.asc())
            .offset(first_index)
            .limit(limit)
            .get_results::<Appointment>(&conn)
    })
    .await
    .context("DB error")?;

    let appos = appos
        .into_iter()
        .map(|data| SearchAppointItem {
            appointment_id: data.id,
            patient_id: data.patient_id,
            doctor_id: data.doctor_id,
            scheduled_at: crate::utils::format_time_str(&data.scheduled_at),
            is_online: data.is_online,
            checked_in: data.checked_in,
            status: data.status,
        })
        .collect();

    Ok(SearchAppointResponse {
        success: true,
        err: "".to_string(),
        appointments: appos,
    })
}

async fn confirm_payment_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ConfirmPaymentRequest>,
) -> anyhow::Result<TransactionResponse> {
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
    let tx = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let tx = payment_transactions::table
                .filter(payment_transactions::appointment_id.eq(info.appointment_id))
                .order(payment_transactions::created_at.desc())
                .limit(1)
                .get_result::<PaymentTransaction>(&conn)
                .optional()
                .context("DB error")?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "payment transaction for appointment #{}",
                        info.appointment_id
                    ))
                })?;

            let now = Utc::now().naive_utc();
            let changes = FinalizeTransaction {
                transaction_status: TRANSACTION_SUCCESS.to_string(),
                provider_transaction_id: None,
                payment_method: Some(info.payment_method.clone()),
                notes: Some(info.notes.clone()),
                updated_at: now,
                transaction_time: now,
            };
            let affected = finalize_pending(&conn, tx.id, &changes)?;
            if affected == 1 {
                info!(
                    transaction_id = tx.id,
                    staff_id = info.actor.id,
                    "payment confirmed by staff"
                );
            } else {
                // Provider reconciliation won the race; this call degrades
                // to a read of the final state.
                info!(
                    transaction_id = tx.id,
                    status = %tx.transaction_status,
                    "staff confirmation was a no-op on a terminal transaction"
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

async fn cancel_payment_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CancelPaymentRequest>,
) -> anyhow::Result<TransactionResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_STAFF)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let tx = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let tx = payment_transactions::table
                .filter(payment_transactions::appointment_id.eq(info.appointment_id))
                .order(payment_transactions::created_at.desc())
                .limit(1)
                .get_result::<PaymentTransaction>(&conn)
                .optional()
                .context("DB error")?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "payment transaction for appointment #{}",
                        info.appointment_id
                    ))
                })?;

            let now = Utc::now().naive_utc();
            let changes = FinalizeTransaction {
                transaction_status: TRANSACTION_CANCELLED.to_string(),
                provider_transaction_id: None,
                payment_method: None,
                notes: Some(info.notes.clone()),
                updated_at: now,
                transaction_time: now,
            };
            if finalize_pending(&conn, tx.id, &changes)? == 1 {
                info!(
                    transaction_id = tx.id,
                    staff_id = info.actor.id,
                    "pending payment cancelled by staff"
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

async fn pending_confirmations_impl(
    pool: web::Data<DbPool>,
    info: web::Json<PendingConfirmationsRequest>,
) -> anyhow::Result<PendingConfirmationsResponse> {
    use crate::schema::payment_transactions;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_STAFF)?;

    // Recomputed from the table on every poll: a transaction finalized
    // between polls simply stops matching.
    let conn = get_db_conn(&pool)?;
    let txs = web::block(move || {
        payment_transactions::table
            .filter(payment_transactions::payment_method.eq(PAYMENT_METHOD_QR))
            .filter(payment_transactions::transaction_status.eq(TRANSACTION_PENDING))
            .order(payment_transactions::created_at.asc())
            .get_results::<PaymentTransaction>(&conn)
    })
    .await
    .context("DB error")?;

    let txs = txs
        .into_iter()
        .filter(needs_staff_confirmation)
        .map(|data| PendingConfirmationItem {
            transaction_id: data.id,
            appointment_id: data.appointment_id,
            order_id: data.order_id.unwrap_or_default(),
            amount: data.amount,
            provider_transaction_id: data.provider_transaction_id.unwrap_or_default(),
            created_at: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(PendingConfirmationsResponse {
        success: true,
        err: "".to_string(),
        transactions: txs,
    })
}
