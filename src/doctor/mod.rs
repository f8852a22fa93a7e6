mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    errors::ServiceError,
    models::{
        appointments::{
            can_enter_review, Appointment, APPOINT_STATUS_CANCELLED, APPOINT_STATUS_COMPLETED,
            APPOINT_STATUS_UNDER_REVIEW,
        },
        medication_schedules::MedicationSchedule,
        plan_medications::{is_known_frequency, NewPlanMedication, PlanMedication},
        treatment_plans::{
            can_transition, is_known_status, NewTreatmentPlan, TreatmentPlan, PLAN_STATUS_ACTIVE,
        },
    },
    protocol::{SimpleResponse, ROLE_DOCTOR},
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(put_under_review)
        .service(complete_appoint)
        .service(cancel_appoint)
        .service(create_plan)
        .service(view_plan)
        .service(add_medications)
        .service(update_plan_status)
        .service(delete_plan);
}

crate::post_funcs! {
    (put_under_review, "/put_under_review", PutUnderReviewRequest, SimpleResponse),
    (complete_appoint, "/complete_appoint", CompleteAppointRequest, SimpleResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (create_plan, "/create_plan", CreatePlanRequest, CreatePlanResponse),
    (view_plan, "/view_plan", ViewPlanRequest, ViewPlanResponse),
    (add_medications, "/add_medications", AddMedicationsRequest, SimpleResponse),
    (update_plan_status, "/update_plan_status", UpdatePlanStatusRequest, SimpleResponse),
    (delete_plan, "/delete_plan", DeletePlanRequest, SimpleResponse),
}

struct ParsedMedication {
    medication_id: u64,
    dosage: String,
    frequency: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    prescribed_by: Option<String>,
    instructions: String,
}

/// Per-medication validation. Violations are pushed, never short-circuited,
/// so the caller reports every problem in one response.
fn collect_medications(
    medications: &[MedicationData],
    violations: &mut Vec<String>,
) -> Vec<ParsedMedication> {
    let mut parsed = Vec::with_capacity(medications.len());
    for (idx, med) in medications.iter().enumerate() {
        let label = idx + 1;
        if med.medication_id == 0 {
            violations.push(format!("medication #{}: medication_id is required", label));
        }
        if med.dosage.trim().is_empty() {
            violations.push(format!("medication #{}: dosage is required", label));
        }
        if !is_known_frequency(&med.frequency) {
            violations.push(format!(
                "medication #{}: unknown frequency '{}'",
                label, med.frequency
            ));
        }

        let start_date = match &med.start_date {
            Some(s) => match crate::utils::parse_date_str(s) {
                Ok(date) => Some(date),
                Err(_) => {
                    violations.push(format!("medication #{}: invalid start_date", label));
                    None
                }
            },
            None => None,
        };
        let end_date = match &med.end_date {
            Some(s) => match crate::utils::parse_date_str(s) {
                Ok(date) => Some(date),
                Err(_) => {
                    violations.push(format!("medication #{}: invalid end_date", label));
                    None
                }
            },
            None => None,
        };
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                violations.push(format!(
                    "medication #{}: end_date must not be before start_date",
                    label
                ));
            }
        }

        parsed.push(ParsedMedication {
            medication_id: med.medication_id,
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            start_date,
            end_date,
            prescribed_by: med.prescribed_by.clone(),
            instructions: med.instructions.clone(),
        });
    }
    parsed
}

fn validate_create_plan(
    info: &CreatePlanRequest,
) -> Result<(NaiveDate, Option<NaiveDate>, Vec<ParsedMedication>), ServiceError> {
    let mut violations = Vec::new();

    let start_date = if info.start_date.is_empty() {
        violations.push("start_date is required".to_string());
        None
    } else {
        match crate::utils::parse_date_str(&info.start_date) {
            Ok(date) => Some(date),
            Err(_) => {
                violations.push("invalid start_date".to_string());
                None
            }
        }
    };
    let end_date = match &info.end_date {
        Some(s) => match crate::utils::parse_date_str(s) {
            Ok(date) => Some(date),
            Err(_) => {
                violations.push("invalid end_date".to_string());
                None
            }
        },
        None => None,
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            violations.push("end_date must not be before start_date".to_string());
        }
    }

    if info.medications.is_empty() {
        violations.push("at least one medication required".to_string());
    }
    let medications = collect_medications(&info.medications, &mut violations);

    match start_date {
        Some(start_date) if violations.is_empty() => Ok((start_date, end_date, medications)),
        _ => Err(ServiceError::Validation(violations)),
    }
}

fn new_plan_medications(
    plan_id: u64,
    medications: Vec<ParsedMedication>,
    actor_name: &str,
) -> Vec<NewPlanMedication> {
    medications
        .into_iter()
        .map(|med| NewPlanMedication {
            plan_id,
            medication_id: med.medication_id,
            dosage: med.dosage,
            frequency: med.frequency,
            start_date: med.start_date,
            end_date: med.end_date,
            prescribed_by: med
                .prescribed_by
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| actor_name.to_string()),
            instructions: med.instructions,
        })
        .collect()
}

async fn put_under_review_impl(
    pool: web::Data<DbPool>,
    info: web::Json<PutUnderReviewRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;

            // Re-entry: the doctor reopened the review screen. Nothing to
            // validate and nothing to write.
            if appo.status == APPOINT_STATUS_UNDER_REVIEW {
                return Ok(());
            }

            if !can_enter_review(&appo.status, appo.is_online) {
                warn!(
                    appointment_id,
                    status = %appo.status,
                    "review rejected"
                );
                return Err(ServiceError::InvalidTransition(format!(
                    "cannot put appointment #{} under review from status {}",
                    appointment_id, appo.status
                ))
                .into());
            }

            let blood_pressure = info
                .blood_pressure
                .as_deref()
                .filter(|bp| !bp.trim().is_empty())
                .map(|bp| bp.to_string())
                .ok_or_else(|| ServiceError::validation("blood_pressure is required"))?;

            // No lab desk in an online consultation.
            let request_lab_sample = if appo.is_online {
                false
            } else {
                info.request_lab_sample
            };

            diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                .set((
                    appointments::status.eq(APPOINT_STATUS_UNDER_REVIEW),
                    appointments::blood_pressure.eq(blood_pressure),
                    appointments::symptoms.eq(&info.symptoms),
                    appointments::notes.eq(&info.notes),
                    appointments::request_lab_sample.eq(request_lab_sample),
                ))
                .execute(&conn)
                .context("DB error")?;

            info!(appointment_id, doctor_id = info.actor.id, "appointment under review");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn complete_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CompleteAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{appointments, plan_medications, treatment_plans};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;
            if appo.status != APPOINT_STATUS_UNDER_REVIEW {
                return Err(ServiceError::PreconditionFailed(format!(
                    "appointment #{} is not under review",
                    appointment_id
                ))
                .into());
            }

            let plan = treatment_plans::table
                .filter(treatment_plans::appointment_id.eq(appointment_id))
                .get_result::<TreatmentPlan>(&conn)
                .optional()
                .context("DB error")?
                .ok_or_else(|| {
                    ServiceError::PreconditionFailed(format!(
                        "appointment #{} has no treatment plan",
                        appointment_id
                    ))
                })?;

            let medication_count = plan_medications::table
                .filter(plan_medications::plan_id.eq(plan.id))
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if medication_count == 0 {
                return Err(ServiceError::PreconditionFailed(format!(
                    "treatment plan #{} has no medications",
                    plan.id
                ))
                .into());
            }

            diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                .set(appointments::status.eq(APPOINT_STATUS_COMPLETED))
                .execute(&conn)
                .context("DB error")?;
            if let Some(notes) = &info.notes {
                diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                    .set(appointments::notes.eq(notes))
                    .execute(&conn)
                    .context("DB error")?;
            }

            info!(appointment_id, "appointment completed");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn cancel_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let conn = get_db_conn(&pool)?;
    let appointment_id = info.appointment_id;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;
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
            if let Some(reason) = &info.reason {
                diesel::update(appointments::table.filter(appointments::id.eq(appointment_id)))
                    .set(appointments::notes.eq(reason))
                    .execute(&conn)
                    .context("DB error")?;
            }

            info!(appointment_id, "appointment cancelled");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn create_plan_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CreatePlanRequest>,
) -> anyhow::Result<CreatePlanResponse> {
    use crate::schema::{appointments, plan_medications, treatment_plans};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_appointment(&pool, info.appointment_id).await?;

    let (start_date, end_date, medications) = validate_create_plan(&info)?;

    let conn = get_db_conn(&pool)?;
    let plan_id = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let appo = appointments::table
                .filter(appointments::id.eq(info.appointment_id))
                .get_result::<Appointment>(&conn)
                .context("DB error")?;
            if appo.status != APPOINT_STATUS_UNDER_REVIEW {
                return Err(ServiceError::Conflict(format!(
                    "appointment #{} is not under review",
                    info.appointment_id
                ))
                .into());
            }

            let existing = treatment_plans::table
                .filter(treatment_plans::appointment_id.eq(info.appointment_id))
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if existing > 0 {
                return Err(ServiceError::Conflict(format!(
                    "appointment #{} already has a treatment plan",
                    info.appointment_id
                ))
                .into());
            }

            let data = NewTreatmentPlan {
                appointment_id: info.appointment_id,
                patient_id: appo.patient_id,
                doctor_id: info.actor.id,
                description: info.description.clone(),
                start_date,
                end_date,
                status: PLAN_STATUS_ACTIVE.to_string(),
            };
            diesel::insert_into(treatment_plans::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;
            let plan_id = diesel::select(crate::database::last_insert_id)
                .get_result::<u64>(&conn)
                .context("DB error")?;

            let meds = new_plan_medications(plan_id, medications, &info.actor.name);
            diesel::insert_into(plan_medications::table)
                .values(&meds)
                .execute(&conn)
                .context("DB error")?;

            info!(
                plan_id,
                appointment_id = info.appointment_id,
                medications = meds.len(),
                "treatment plan created"
            );
            Ok(plan_id)
        })
    })
    .await?;

    Ok(CreatePlanResponse {
        success: true,
        err: "".to_string(),
        plan_id,
    })
}

async fn view_plan_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ViewPlanRequest>,
) -> anyhow::Result<ViewPlanResponse> {
    use crate::schema::{medication_schedules, plan_medications, treatment_plans};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_plan(&pool, info.plan_id).await?;

    let conn = get_db_conn(&pool)?;
    let plan_id = info.plan_id;
    let (plan, meds, schedules) = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let plan = treatment_plans::table
                .filter(treatment_plans::id.eq(plan_id))
                .get_result::<TreatmentPlan>(&conn)
                .context("DB error")?;
            let meds = plan_medications::table
                .filter(plan_medications::plan_id.eq(plan_id))
                .order(plan_medications::id.asc())
                .get_results::<PlanMedication>(&conn)
                .context("DB error")?;
            let med_ids: Vec<u64> = meds.iter().map(|med| med.id).collect();
            let schedules = medication_schedules::table
                .filter(medication_schedules::medication_id.eq_any(med_ids))
                .order(medication_schedules::id.asc())
                .get_results::<MedicationSchedule>(&conn)
                .context("DB error")?;
            Ok((plan, meds, schedules))
        })
    })
    .await?;

    let mut schedules_by_med: HashMap<u64, Vec<ScheduleItem>> = HashMap::new();
    for schedule in schedules {
        schedules_by_med
            .entry(schedule.medication_id)
            .or_insert_with(Vec::new)
            .push(ScheduleItem {
                schedule_id: schedule.id,
                days_display: crate::models::medication_schedules::format_days_of_week(
                    &schedule.days_of_week,
                ),
                time_of_day: schedule.time_of_day,
                dosage_amount: schedule.dosage_amount,
                days_of_week: schedule.days_of_week,
                notes: schedule.notes,
            });
    }

    let medications = meds
        .into_iter()
        .map(|med| MedicationItem {
            id: med.id,
            medication_id: med.medication_id,
            dosage: med.dosage,
            frequency: med.frequency,
            start_date: med
                .start_date
                .map(|d| crate::utils::format_date_str(&d))
                .unwrap_or_default(),
            end_date: med
                .end_date
                .map(|d| crate::utils::format_date_str(&d))
                .unwrap_or_default(),
            prescribed_by: med.prescribed_by,
            instructions: med.instructions,
            schedules: schedules_by_med.remove(&med.id).unwrap_or_default(),
        })
        .collect();

    Ok(ViewPlanResponse {
        success: true,
        err: "".to_string(),
        plan_id: plan.id,
        appointment_id: plan.appointment_id,
        patient_id: plan.patient_id,
        doctor_id: plan.doctor_id,
        description: plan.description,
        start_date: crate::utils::format_date_str(&plan.start_date),
        end_date: plan
            .end_date
            .map(|d| crate::utils::format_date_str(&d))
            .unwrap_or_default(),
        status: plan.status,
        medications,
    })
}

async fn add_medications_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddMedicationsRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{plan_medications, treatment_plans};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_plan(&pool, info.plan_id).await?;

    if info.medications.is_empty() {
        return Ok(SimpleResponse::ok());
    }

    let mut violations = Vec::new();
    let medications = collect_medications(&info.medications, &mut violations);
    if !violations.is_empty() {
        return Err(ServiceError::Validation(violations).into());
    }

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let plan = treatment_plans::table
                .filter(treatment_plans::id.eq(info.plan_id))
                .get_result::<TreatmentPlan>(&conn)
                .context("DB error")?;
            if crate::models::treatment_plans::is_terminal(&plan.status) {
                return Err(ServiceError::Conflict(format!(
                    "treatment plan #{} is already terminal",
                    plan.id
                ))
                .into());
            }

            let meds = new_plan_medications(plan.id, medications, &info.actor.name);
            diesel::insert_into(plan_medications::table)
                .values(&meds)
                .execute(&conn)
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn update_plan_status_impl(
    pool: web::Data<DbPool>,
    info: web::Json<UpdatePlanStatusRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::treatment_plans;

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_plan(&pool, info.plan_id).await?;

    if !is_known_status(&info.status) {
        return Err(
            ServiceError::validation(format!("unknown plan status '{}'", info.status)).into(),
        );
    }

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let plan = treatment_plans::table
                .filter(treatment_plans::id.eq(info.plan_id))
                .get_result::<TreatmentPlan>(&conn)
                .context("DB error")?;
            if crate::models::treatment_plans::is_terminal(&plan.status) {
                return Err(ServiceError::Conflict(format!(
                    "treatment plan #{} is already terminal",
                    plan.id
                ))
                .into());
            }
            if !can_transition(&plan.status, &info.status) {
                return Err(ServiceError::InvalidTransition(format!(
                    "treatment plan #{} cannot go from {} to {}",
                    plan.id, plan.status, info.status
                ))
                .into());
            }

            diesel::update(treatment_plans::table.filter(treatment_plans::id.eq(plan.id)))
                .set(treatment_plans::status.eq(&info.status))
                .execute(&conn)
                .context("DB error")?;

            info!(plan_id = plan.id, status = %info.status, "treatment plan status updated");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn delete_plan_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeletePlanRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{appointments, medication_schedules, plan_medications, treatment_plans};

    let info = info.into_inner();
    crate::utils::assert_role(&info.actor, ROLE_DOCTOR)?;
    assert::assert_plan(&pool, info.plan_id).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let plan = treatment_plans::table
                .filter(treatment_plans::id.eq(info.plan_id))
                .get_result::<TreatmentPlan>(&conn)
                .context("DB error")?;
            if crate::models::treatment_plans::is_terminal(&plan.status) {
                return Err(ServiceError::Conflict(format!(
                    "treatment plan #{} is already terminal",
                    plan.id
                ))
                .into());
            }

            let appo_status = appointments::table
                .filter(appointments::id.eq(plan.appointment_id))
                .select(appointments::status)
                .get_result::<String>(&conn)
                .context("DB error")?;
            if appo_status == APPOINT_STATUS_COMPLETED {
                return Err(ServiceError::Conflict(format!(
                    "treatment plan #{} belongs to a completed appointment",
                    plan.id
                ))
                .into());
            }

            let med_ids: Vec<u64> = plan_medications::table
                .filter(plan_medications::plan_id.eq(plan.id))
                .select(plan_medications::id)
                .get_results::<u64>(&conn)
                .context("DB error")?;
            diesel::delete(
                medication_schedules::table
                    .filter(medication_schedules::medication_id.eq_any(med_ids)),
            )
            .execute(&conn)
            .context("DB error")?;
            diesel::delete(plan_medications::table.filter(plan_medications::plan_id.eq(plan.id)))
                .execute(&conn)
                .context("DB error")?;
            diesel::delete(treatment_plans::table.filter(treatment_plans::id.eq(plan.id)))
                .execute(&conn)
                .context("DB error")?;

            info!(plan_id = plan.id, "treatment plan deleted");
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Actor;

    fn doctor() -> Actor {
        Actor {
            id: 9,
            name: "Dr. Minh".to_string(),
            role: crate::protocol::ROLE_DOCTOR.to_string(),
        }
    }

    fn medication(medication_id: u64, dosage: &str, frequency: &str) -> MedicationData {
        MedicationData {
            medication_id,
            dosage: dosage.to_string(),
            frequency: frequency.to_string(),
            start_date: None,
            end_date: None,
            prescribed_by: None,
            instructions: "".to_string(),
        }
    }

    fn plan_request(medications: Vec<MedicationData>) -> CreatePlanRequest {
        CreatePlanRequest {
            actor: doctor(),
            appointment_id: 100,
            description: "first-line ART".to_string(),
            start_date: "2026-03-01".to_string(),
            end_date: None,
            medications,
        }
    }

    #[test]
    fn valid_plan_passes() {
        let req = plan_request(vec![medication(12, "300mg", "ONCE_DAILY")]);
        let (start, end, meds) = validate_create_plan(&req).unwrap();
        assert_eq!(crate::utils::format_date_str(&start), "2026-03-01");
        assert!(end.is_none());
        assert_eq!(meds.len(), 1);
    }

    #[test]
    fn empty_medications_rejected() {
        let req = plan_request(vec![]);
        match validate_create_plan(&req) {
            Err(ServiceError::Validation(violations)) => {
                assert!(violations
                    .iter()
                    .any(|v| v.contains("at least one medication required")));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn all_violations_collected() {
        let mut req = plan_request(vec![
            medication(0, "", "ONCE_DAILY"),
            medication(12, "300mg", "SOMETIMES"),
        ]);
        req.start_date = "".to_string();
        match validate_create_plan(&req) {
            Err(ServiceError::Validation(violations)) => {
                assert!(violations.iter().any(|v| v.contains("start_date is required")));
                assert!(violations
                    .iter()
                    .any(|v| v.contains("medication #1: medication_id is required")));
                assert!(violations
                    .iter()
                    .any(|v| v.contains("medication #1: dosage is required")));
                assert!(violations
                    .iter()
                    .any(|v| v.contains("medication #2: unknown frequency 'SOMETIMES'")));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn date_range_checked() {
        let mut req = plan_request(vec![medication(12, "300mg", "ONCE_DAILY")]);
        req.end_date = Some("2026-02-01".to_string());
        match validate_create_plan(&req) {
            Err(ServiceError::Validation(violations)) => {
                assert!(violations
                    .iter()
                    .any(|v| v.contains("end_date must not be before start_date")));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn prescribed_by_defaults_to_actor() {
        let meds = collect_medications(
            &[medication(12, "300mg", "ONCE_DAILY")],
            &mut Vec::new(),
        );
        let rows = new_plan_medications(1, meds, "Dr. Minh");
        assert_eq!(rows[0].prescribed_by, "Dr. Minh");

        let mut with_name = medication(12, "300mg", "ONCE_DAILY");
        with_name.prescribed_by = Some("Dr. Hoa".to_string());
        let meds = collect_medications(&[with_name], &mut Vec::new());
        let rows = new_plan_medications(1, meds, "Dr. Minh");
        assert_eq!(rows[0].prescribed_by, "Dr. Hoa");
    }
}
