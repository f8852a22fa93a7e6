#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, info).await {
                        Ok(response) => response,
                        Err(err) => $response::err(err.to_string()),
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use crate::{errors::ServiceError, protocol::Actor};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};

pub fn assert_role(actor: &Actor, role: &str) -> Result<(), ServiceError> {
    if actor.role != role {
        return Err(ServiceError::validation(format!(
            "operation requires role {}",
            role
        )));
    }
    Ok(())
}

pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDateTime> {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

    NaiveDateTime::parse_from_str(s.as_ref(), TIME_FMT).context("Wrong datetime format")
}

pub fn parse_date_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDate> {
    const DATE_FMT: &str = "%Y-%m-%d";

    NaiveDate::parse_from_str(s.as_ref(), DATE_FMT).context("Wrong date format")
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

    format!("{}", time.format(TIME_FMT))
}

pub fn format_time_str_opt(time: &Option<NaiveDateTime>) -> String {
    match time {
        Some(time) => format_time_str(time),
        None => "".to_string(),
    }
}

pub fn format_date_str(date: &NaiveDate) -> String {
    format!("{}", date.format("%Y-%m-%d"))
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", s.as_ref())
}

pub fn get_str_pattern_opt<S: AsRef<str>>(s: Option<S>) -> String {
    match s {
        Some(s) => get_str_pattern(s),
        None => "%".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_check() {
        let actor = Actor {
            id: 7,
            name: "Dr. Lan".to_string(),
            role: crate::protocol::ROLE_DOCTOR.to_string(),
        };
        assert!(assert_role(&actor, crate::protocol::ROLE_DOCTOR).is_ok());
        assert!(assert_role(&actor, crate::protocol::ROLE_STAFF).is_err());
    }

    #[test]
    fn time_round_trip() {
        let time = parse_time_str("2026-03-01T09:30:00").unwrap();
        assert_eq!(format_time_str(&time), "2026-03-01T09:30:00");
        assert!(parse_time_str("2026-03-01 09:30").is_err());
    }

    #[test]
    fn date_parse() {
        assert!(parse_date_str("2026-03-01").is_ok());
        assert!(parse_date_str("01/03/2026").is_err());
    }
}
