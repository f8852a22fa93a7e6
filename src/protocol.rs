use serde::{Deserialize, Serialize};

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: "".to_string(),
        }
    }
}

/// The acting user, threaded explicitly through every mutating call.
/// Authentication happens upstream; this service only checks the role.
#[derive(Clone, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub role: String,
}

pub const ROLE_PATIENT: &str = "PATIENT";
pub const ROLE_DOCTOR: &str = "DOCTOR";
pub const ROLE_STAFF: &str = "STAFF";

#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
}
