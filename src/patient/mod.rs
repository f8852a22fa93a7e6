mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    errors::ServiceError,
    models::{
        appointments::{Appointment, NewAppointment, APPOINT_STATUS_CANCELLED,
            APPOINT_STATUS_SCHEDULED},
        payment_transactions::PaymentTransaction,
    },
    payment::responses::TransactionItem,
    protocol::{SimpleResponse, ROLE_PATIENT},
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use diesel::prelude::*;
use tracing::info;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(book_appoint)
        .service(search_appoint)
        .service(cancel_appoint)
        .service(my_transactions);
}

crate::post_funcs! {
    (book_appoint, "/book_appoint", BookAppointRequest, BookAppointResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (my_transactions, "/my_transactions", MyTransactionsRequest, MyTransactionsResponse),
}

async fn book_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<BookAppointRequest>,
) -> anyhow::Result<BookAppointResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_PATIENT)?;

    let scheduled_at = crate::utils::parse_time_str(&info.scheduled_at)?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let data = NewAppointment {
                patient_id: info.actor.id,
                doctor_id: info.doctor_id,
                service_id: info.service_id,
                scheduled_at,
                is_online: info.is_online,
                checked_in: false,
                blood_pressure: None,
                symptoms: info.symptoms,
                notes: info.notes,
                request_lab_sample: false,
                status: APPOINT_STATUS_SCHEDULED.to_string(),
            };
            diesel::insert_into(appointments::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            diesel::select(crate::database::last_insert_id)
                .get_result::<u64>(&conn)
                .context("DB error")
        })
    })
    .await?;

    info!(appointment_id, "appointment booked");

    Ok(BookAppointResponse {
        success: true,
        err: "".to_string(),
        appointment_id,
    })
}

async fn search_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_PATIENT)?;

    let conn = get_db_conn(&pool)?;
    let patient_id = info.actor.id;
    let status_pattern = crate::utils::get_str_pattern_opt(info.status);
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let appos = web::block(move || {
        appointments::table
            .filter(appointments::patient_id.eq(patient_id))
            .filter(appointments::status.like(status_pattern))
            .order(appointments::scheduled_at.desc())
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
            doctor_id: data.doctor_id,
            service_id: data.service_id,
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

async fn cancel_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_PATIENT)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    let patient_id = info.actor.id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;
            if appo.patient_id != patient_id {
                return Err(ServiceError::NotFound(format!(
                    "appointment #{}",
                    appointment_id
                ))
                .into());
            }
            if crate::models::appointments::is_terminal(&appo.status) {
                return Err(ServiceError::InvalidTransition(format!(
                    "appointment #{} is already {}",
                    appointment_id, appo.status
                ))
                .into());
            }

            diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                .set(appointments::status.eq(APPOINT_STATUS_CANCELLED))
                .execute(&conn)
                .context("DB error")?;

            info!(appointment_id, "appointment cancelled by patient");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn my_transactions_impl(
    pool: web::Data<DbPool>,
    info: web::Json<MyTransactionsRequest>,
) -> anyhow::Result<MyTransactionsResponse> {
    use crate::schema::{appointments, payment_transactions};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_PATIENT)?;

    let conn = get_db_conn(&pool)?;
    let patient_id = info.actor.id;
    let txs = web::block(move || {
        payment_transactions::table
            .inner_join(
                appointments::table.on(payment_transactions::appointment_id.eq(appointments::id)),
            )
            .filter(appointments::patient_id.eq(patient_id))
            .order(payment_transactions::created_at.desc())
            .select(payment_transactions::all_columns)
            .get_results::<PaymentTransaction>(&conn)
    })
    .await
    .context("DB error")?;

    let transactions = txs.iter().map(TransactionItem::from_data).collect();

    Ok(MyTransactionsResponse {
        success: true,
        err: "".to_string(),
        transactions,
    })
}
