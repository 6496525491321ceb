// Typed error taxonomy for the analytics path
//
// Validation -> 400, NotFound -> 404, everything else -> 500. The HTTP
// mapping itself lives in the API crate; storage failures arrive here via
// the anyhow conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Bad or missing input, including invalid/inverted date ranges.
    #[error("{0}")]
    Validation(String),

    /// Unknown user or resource.
    #[error("{0}")]
    NotFound(String),

    /// Database or other unexpected failure. Not retried; aborts the request.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalyticsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AnalyticsError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AnalyticsError::NotFound(msg.into())
    }

    /// HTTP status the error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalyticsError::Validation(_) => 400,
            AnalyticsError::NotFound(_) => 404,
            AnalyticsError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AnalyticsError::validation("bad").status_code(), 400);
        assert_eq!(AnalyticsError::not_found("missing").status_code(), 404);
        assert_eq!(
            AnalyticsError::from(anyhow::anyhow!("db down")).status_code(),
            500
        );
    }
}
