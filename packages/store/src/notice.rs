use api::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, toast-style message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Error notice for a failed call; `fallback` covers responses without a `detail`.
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        Self::error(err.user_message(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::error::SERVER_ERROR_MESSAGE;

    #[test]
    fn test_from_error_uses_detail() {
        let err = ApiError::Status {
            status: 400,
            detail: Some("Current password is incorrect".to_string()),
        };
        let notice = Notice::from_error(&err, "Failed");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Current password is incorrect");
    }

    #[test]
    fn test_from_error_not_json() {
        let notice = Notice::from_error(&ApiError::NotJson { status: 500 }, "Failed");
        assert_eq!(notice.message, SERVER_ERROR_MESSAGE);
    }
}
