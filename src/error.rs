//! The error type shared by the API client, the session store and the pages.

/// Generic message used when the backend gives no explanation.
pub const NETWORK_FAILURE: &str = "Network request failed";

/// The errors that may occur while talking to the backend or validating forms.
///
/// All variants are recoverable: pages catch them and show a notification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// The backend rejected the credentials or the bearer token.
    ///
    /// Raised for bad logins as well as expired or invalid tokens. Any page
    /// receiving this error should hand it to the session store so that the
    /// session is torn down.
    #[error("{0}")]
    Auth(String),

    /// A form failed a client-side check and was never sent.
    #[error("{0}")]
    Validation(String),

    /// The request could not be sent, or the backend answered with a non-2xx
    /// status.
    #[error("{0}")]
    Network(String),
}

impl AppError {
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// The text shown to the user in a notification.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(message) | AppError::Validation(message) | AppError::Network(message) => {
                message
            }
        }
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(error: gloo_net::Error) -> Self {
        log::error!("request failed: {error}");
        AppError::Network(NETWORK_FAILURE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn only_auth_errors_are_auth() {
        assert!(AppError::Auth("Invalid credentials".into()).is_auth());
        assert!(!AppError::Validation("Amount is required".into()).is_auth());
        assert!(!AppError::Network("boom".into()).is_auth());
    }

    #[test]
    fn display_is_the_bare_message() {
        let error = AppError::Validation("Amount must be greater than zero".into());

        assert_eq!(error.to_string(), "Amount must be greater than zero");
        assert_eq!(error.message(), "Amount must be greater than zero");
    }
}
