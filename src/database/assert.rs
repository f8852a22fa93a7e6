use actix_web::web;
use anyhow::Context;
use diesel::prelude::*;

use crate::{database::get_db_conn, errors::ServiceError, DbPool};

pub async fn assert_appointment(pool: &web::Data<DbPool>, id: u64) -> anyhow::Result<()> {
    use crate::schema::appointments;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        appointments::table
            .filter(appointments::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::NotFound(format!("appointment #{}", id)).into());
    }

    Ok(())
}

pub async fn assert_plan(pool: &web::Data<DbPool>, id: u64) -> anyhow::Result<()> {
    use crate::schema::treatment_plans;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        treatment_plans::table
            .filter(treatment_plans::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::NotFound(format!("treatment plan #{}", id)).into());
    }

    Ok(())
}

pub async fn assert_medication(pool: &web::Data<DbPool>, id: u64) -> anyhow::Result<()> {
    use crate::schema::plan_medications;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        plan_medications::table
            .filter(plan_medications::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::NotFound(format!("plan medication #{}", id)).into());
    }

    Ok(())
}

pub async fn assert_schedule(pool: &web::Data<DbPool>, id: u64) -> anyhow::Result<()> {
    use crate::schema::medication_schedules;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        medication_schedules::table
            .filter(medication_schedules::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::NotFound(format!("medication schedule #{}", id)).into());
    }

    Ok(())
}

pub async fn assert_transaction(pool: &web::Data<DbPool>, id: u64) -> anyhow::Result<()> {
    use crate::schema::payment_transactions;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        payment_transactions::table
            .filter(payment_transactions::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::NotFound(format!("payment transaction #{}", id)).into());
    }

    Ok(())
}
