use thiserror::Error;

/// Domain error taxonomy. Handlers propagate these through `anyhow`, the
/// endpoint macro renders them as `{success: false, err}`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("conflict: {0}")]
    Conflict(String),

    // The only retryable class: the transaction stays PENDING and staff
    // retry manually or a later provider poll finalizes it.
    #[error("payment provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    pub fn validation<S: ToString>(msg: S) -> Self {
        ServiceError::Validation(vec![msg.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_joined() {
        let err = ServiceError::Validation(vec![
            "start_date is required".to_string(),
            "at least one medication required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "validation error: start_date is required; at least one medication required"
        );
    }

    #[test]
    fn single_message_helper() {
        let err = ServiceError::validation("blood_pressure is required");
        assert_eq!(err.to_string(), "validation error: blood_pressure is required");
    }
}
