table! {
    appointments (id) {
        id -> Unsigned<Bigint>,
        patient_id -> Unsigned<Bigint>,
        doctor_id -> Unsigned<Bigint>,
        service_id -> Unsigned<Bigint>,
        scheduled_at -> Datetime,
        is_online -> Bool,
        checked_in -> Bool,
        blood_pressure -> Nullable<Varchar>,
        symptoms -> Varchar,
        notes -> Varchar,
        request_lab_sample -> Bool,
        status -> Char,
    }
}

table! {
    treatment_plans (id) {
        id -> Unsigned<Bigint>,
        appointment_id -> Unsigned<Bigint>,
        patient_id -> Unsigned<Bigint>,
        doctor_id -> Unsigned<Bigint>,
        description -> Varchar,
        start_date -> Date,
        end_date -> Nullable<Date>,
        status -> Char,
    }
}

table! {
    plan_medications (id) {
        id -> Unsigned<Bigint>,
        plan_id -> Unsigned<Bigint>,
        medication_id -> Unsigned<Bigint>,
        dosage -> Varchar,
        frequency -> Char,
        start_date -> Nullable<Date>,
        end_date -> Nullable<Date>,
        prescribed_by -> Varchar,
        instructions -> Varchar,
    }
}

table! {
    medication_schedules (id) {
        id -> Unsigned<Bigint>,
        medication_id -> Unsigned<Bigint>,
        time_of_day -> Char,
        dosage_amount -> Varchar,
        days_of_week -> Varchar,
        notes -> Varchar,
    }
}

table! {
    payment_transactions (id) {
        id -> Unsigned<Bigint>,
        appointment_id -> Unsigned<Bigint>,
        order_id -> Nullable<Varchar>,
        amount -> Unsigned<Bigint>,
        payment_method -> Char,
        provider_transaction_id -> Nullable<Varchar>,
        transaction_status -> Char,
        notes -> Varchar,
        created_at -> Datetime,
        updated_at -> Datetime,
        transaction_time -> Nullable<Datetime>,
    }
}

allow_tables_to_appear_in_same_query!(
    appointments,
    treatment_plans,
    plan_medications,
    medication_schedules,
    payment_transactions,
);
