//! Upstream failure classification used inside the client boundary.

use reqwest::StatusCode;

/// Why an upstream call produced no usable value.
///
/// Never crosses the public client API: clients log it and return `None`.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure, timeout or a request that could not be built.
    #[error("upstream unavailable: {0:#}")]
    Unavailable(anyhow::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("upstream returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Provider error message or raw body.
        message: String,
    },

    /// Success status, but the payload did not match the expected shape.
    #[error("malformed upstream response: {0:#}")]
    Malformed(anyhow::Error),
}

impl UpstreamError {
    /// Short label used as the `kind` field in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
        }
    }

    /// HTTP status, when the provider answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unavailable(_) | Self::Malformed(_) => None,
        }
    }

    /// Logs this failure as a `warn` diagnostic for `endpoint`.
    pub fn log(&self, endpoint: &str) {
        tracing::warn!(
            endpoint,
            kind = self.kind(),
            status = self.status().map(|s| s.as_u16()),
            at = %chrono::Utc::now().to_rfc3339(),
            error = %self,
            "Upstream call failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        // Arrange
        let unavailable = UpstreamError::Unavailable(anyhow::anyhow!("connection refused"));
        let status = UpstreamError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Invalid API key"),
        };
        let malformed = UpstreamError::Malformed(anyhow::anyhow!("missing field `id`"));

        // Act & Assert
        assert_eq!(unavailable.kind(), "unavailable");
        assert_eq!(status.kind(), "status");
        assert_eq!(malformed.kind(), "malformed");
        assert_eq!(status.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(unavailable.status().is_none());
    }

    #[test]
    fn test_status_display_includes_message() {
        // Arrange
        let err = UpstreamError::Status {
            status: StatusCode::NOT_FOUND,
            message: String::from("The resource you requested could not be found."),
        };

        // Act
        let text = err.to_string();

        // Assert
        assert!(text.contains("404"));
        assert!(text.contains("could not be found"));
    }
}
