mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    errors::ServiceError,
    models::{
        medication_schedules::{
            format_days_of_week, validate_days_of_week, validate_time_of_day, MedicationSchedule,
            NewMedicationSchedule, UpdateMedicationSchedule,
        },
        plan_medications::{default_schedule_slots, PlanMedication},
    },
    protocol::{SimpleResponse, ROLE_DOCTOR},
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use diesel::{prelude::*, r2d2::ConnectionManager, MysqlConnection};
use r2d2::PooledConnection;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_default)
        .service(create_custom)
        .service(update_schedule)
        .service(delete_schedule)
        .service(list_schedules);
}

crate::post_funcs! {
    (create_default, "/create_default", CreateDefaultRequest, SimpleResponse),
    (create_custom, "/create_custom", CreateCustomRequest, SimpleResponse),
    (update_schedule, "/update_schedule", UpdateScheduleRequest, SimpleResponse),
    (delete_schedule, "/delete_schedule", DeleteScheduleRequest, SimpleResponse),
    (list_schedules, "/list_schedules", ListSchedulesRequest, ListSchedulesResponse),
}

/// Schedule rows follow the edit rules of their plan: once the plan is
/// terminal, the dosing schedule is frozen too.
fn assert_plan_editable(
    conn: &PooledConnection<ConnectionManager<MysqlConnection>>,
    medication_id: u64,
) -> anyhow::Result<()> {
    use crate::schema::{plan_medications, treatment_plans};

    let plan_status = plan_medications::table
        .inner_join(treatment_plans::table.on(plan_medications::plan_id.eq(treatment_plans::id)))
        .filter(plan_medications::id.eq(medication_id))
        .select(treatment_plans::status)
        .get_result::<String>(conn)
        .context("DB error")?;
    if crate::models::treatment_plans::is_terminal(&plan_status) {
        return Err(ServiceError::Conflict(format!(
            "medication #{} belongs to a terminal treatment plan",
            medication_id
        ))
        .into());
    }
    Ok(())
}

fn validate_schedules(schedules: &[ScheduleData]) -> Result<(), ServiceError> {
    let mut violations = Vec::new();
    for (idx, schedule) in schedules.iter().enumerate() {
        let label = idx + 1;
        if let Err(ServiceError::Validation(mut errs)) = validate_time_of_day(&schedule.time_of_day)
        {
            violations.push(format!("schedule #{}: {}", label, errs.remove(0)));
        }
        if schedule.dosage_amount.trim().is_empty() {
            violations.push(format!("schedule #{}: dosage_amount is required", label));
        }
        if let Err(ServiceError::Validation(mut errs)) =
            validate_days_of_week(&schedule.days_of_week)
        {
            violations.push(format!("schedule #{}: {}", label, errs.remove(0)));
        }
    }
    if !violations.is_empty() {
        return Err(ServiceError::Validation(violations));
    }
    Ok(())
}

async fn create_default_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CreateDefaultRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{medication_schedules, plan_medications};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_medication(&pool, info.medication_id).await?;

    let conn = get_db_conn(&pool)?;
    let medication_id = info.medication_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            assert_plan_editable(&conn, medication_id)?;

            let med = plan_medications::table
                .filter(plan_medications::id.eq(medication_id))
                .get_result::<PlanMedication>(&conn)
                .context("DB error")?;

            let slots = default_schedule_slots(&med.frequency).ok_or_else(|| {
                ServiceError::validation(format!("unknown frequency '{}'", med.frequency))
            })?;

            let rows: Vec<NewMedicationSchedule> = slots
                .iter()
                .map(|slot| NewMedicationSchedule {
                    medication_id,
                    time_of_day: slot.to_string(),
                    dosage_amount: med.dosage.clone(),
                    days_of_week: "".to_string(),
                    notes: "".to_string(),
                })
                .collect();
            diesel::insert_into(medication_schedules::table)
                .values(&rows)
                .execute(&conn)
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn create_custom_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CreateCustomRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::medication_schedules;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_medication(&pool, info.medication_id).await?;

    if info.schedules.is_empty() {
        return Ok(SimpleResponse::ok());
    }
    validate_schedules(&info.schedules)?;

    let conn = get_db_conn(&pool)?;
    let medication_id = info.medication_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            assert_plan_editable(&conn, medication_id)?;

            let rows: Vec<NewMedicationSchedule> = info
                .schedules
                .into_iter()
                .map(|schedule| NewMedicationSchedule {
                    medication_id,
                    time_of_day: schedule.time_of_day,
                    dosage_amount: schedule.dosage_amount,
                    days_of_week: schedule.days_of_week,
                    notes: schedule.notes,
                })
                .collect();
            diesel::insert_into(medication_schedules::table)
                .values(&rows)
                .execute(&conn)
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn update_schedule_impl(
    pool: web::Data<DbPool>,
    info: web::Json<UpdateScheduleRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::medication_schedules;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_schedule(&pool, info.schedule_id).await?;

    if let Some(time_of_day) = &info.time_of_day {
        validate_time_of_day(time_of_day)?;
    }
    if let Some(dosage_amount) = &info.dosage_amount {
        if dosage_amount.trim().is_empty() {
            return Err(ServiceError::validation("dosage_amount must not be empty").into());
        }
    }
    if let Some(days_of_week) = &info.days_of_week {
        validate_days_of_week(days_of_week)?;
    }

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let medication_id = medication_schedules::table
                .filter(medication_schedules::id.eq(info.schedule_id))
                .select(medication_schedules::medication_id)
                .get_result::<u64>(&conn)
                .context("DB error")?;
            assert_plan_editable(&conn, medication_id)?;

            let changes = UpdateMedicationSchedule {
                time_of_day: info.time_of_day,
                dosage_amount: info.dosage_amount,
                days_of_week: info.days_of_week,
                notes: info.notes,
            };
            diesel::update(
                medication_schedules::table.filter(medication_schedules::id.eq(info.schedule_id)),
            )
            .set(&changes)
            .execute(&conn)
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn delete_schedule_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteScheduleRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::medication_schedules;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_schedule(&pool, info.schedule_id).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let medication_id = medication_schedules::table
                .filter(medication_schedules::id.eq(info.schedule_id))
                .select(medication_schedules::medication_id)
                .get_result::<u64>(&conn)
                .context("DB error")?;
            assert_plan_editable(&conn, medication_id)?;

            diesel::delete(
                medication_schedules::table.filter(medication_schedules::id.eq(info.schedule_id)),
            )
            .execute(&conn)
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn list_schedules_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ListSchedulesRequest>,
) -> anyhow::Result<ListSchedulesResponse> {
    use crate::schema::medication_schedules;

    let info = info.into_inner();
    assert::assert_medication(&pool, info.medication_id).await?;

    let conn = get_db_conn(&pool)?;
    let medication_id = info.medication_id;
    let schedules = web::block(move || {
        medication_schedules::table
            .filter(medication_schedules::medication_id.eq(medication_id))
            .order(medication_schedules::time_of_day.asc())
            .get_results::<MedicationSchedule>(&conn)
    })
    .await
    .context("DB error")?;

    let schedules = schedules
        .into_iter()
        .map(|data| ScheduleItem {
            schedule_id: data.id,
            medication_id: data.medication_id,
            days_display: format_days_of_week(&data.days_of_week),
            time_of_day: data.time_of_day,
            dosage_amount: data.dosage_amount,
            days_of_week: data.days_of_week,
            notes: data.notes,
        })
        .collect();

    Ok(ListSchedulesResponse {
        success: true,
        err: "".to_string(),
        schedules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(time_of_day: &str, dosage_amount: &str, days_of_week: &str) -> ScheduleData {
        ScheduleData {
            time_of_day: time_of_day.to_string(),
            dosage_amount: dosage_amount.to_string(),
            days_of_week: days_of_week.to_string(),
            notes: "".to_string(),
        }
    }

    #[test]
    fn valid_batch_passes() {
        let batch = vec![
            schedule("08:00", "1 viên", ""),
            schedule("20:00", "2 viên", "MON,WED,FRI"),
        ];
        assert!(validate_schedules(&batch).is_ok());
    }

    #[test]
    fn batch_violations_collected() {
        let batch = vec![
            schedule("8am", "", ""),
            schedule("08:00", "1 viên", "MON,MON"),
        ];
        match validate_schedules(&batch) {
            Err(ServiceError::Validation(violations)) => {
                assert_eq!(violations.len(), 3);
                assert!(violations[0].starts_with("schedule #1:"));
                assert!(violations[2].contains("duplicate day of week"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
