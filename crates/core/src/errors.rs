use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field `{field}` is empty")]
    EmptyField { field: &'static str },
}

/// Any failure of the outbound SMS call. The detail is for logs only and is
/// never shown to the visitor.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("notification delivery failed: {detail}")]
pub struct NotificationError {
    detail: String,
}

impl NotificationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl CallbackError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Please fill all required fields!",
            Self::Notification(_) => "An error occurred while requesting a callback!",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{CallbackError, NotificationError, ValidationError};

    #[test]
    fn validation_error_has_user_safe_message() {
        let error = CallbackError::from(ValidationError::EmptyField { field: "name" });

        assert_eq!(error.user_message(), "Please fill all required fields!");
        assert_eq!(error.to_string(), "required field `name` is empty");
    }

    #[test]
    fn notification_error_hides_detail_from_user_message() {
        let error = CallbackError::from(NotificationError::new("401: incorrect access_key"));

        assert_eq!(error.user_message(), "An error occurred while requesting a callback!");
        assert!(!error.user_message().contains("access_key"));
        assert!(error.to_string().contains("incorrect access_key"));
    }
}
