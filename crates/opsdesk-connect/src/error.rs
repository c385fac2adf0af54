use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("credential env var not set: {0}")]
    MissingCredentials(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ConnectError>;

/// Read an API token from the environment, erroring with the variable name
/// so the operator knows what to export.
pub fn token_from_env(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| ConnectError::MissingCredentials(var.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_names_variable() {
        let err = token_from_env("OPSDESK_TEST_SURELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("OPSDESK_TEST_SURELY_UNSET"));
    }
}
