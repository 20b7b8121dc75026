use thiserror::Error;

/// Errors from [`crate::DistanceProvider::distance_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// No locations were provided.
    ///
    /// Callers should reject empty problems before asking for a matrix.
    #[error("at least one location is required")]
    EmptyInput,
    /// A single oracle query exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL of the failed request.
        url: String,
        /// Configured per-request timeout in seconds.
        timeout_secs: u64,
    },
    /// The oracle answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// URL of the failed request.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error while requesting {url}: {message}")]
    NetworkError {
        /// URL of the failed request.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Error description.
        message: String,
    },
    /// The oracle reported a service-level failure code.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `"NoRoute"`.
        code: String,
        /// Message supplied by the service.
        message: String,
    },
    /// The oracle answered but offered no route between the pair.
    #[error("no route from location {from} to location {to}")]
    NoRoute {
        /// Index of the origin location.
        from: usize,
        /// Index of the destination location.
        to: usize,
    },
    /// The whole matrix could not be assembled within the overall deadline.
    #[error("distance matrix was not complete within {deadline_ms} ms")]
    DeadlineExceeded {
        /// Configured deadline in milliseconds.
        deadline_ms: u64,
    },
    /// Matrix rows did not form a square of the expected size.
    #[error("expected a {expected}x{expected} matrix, found {found} cells")]
    DimensionMismatch {
        /// Expected side length.
        expected: usize,
        /// Number of cells or rows actually found.
        found: usize,
    },
}

impl DistanceError {
    /// Whether retrying the same query may succeed.
    ///
    /// Timeouts, network failures, HTTP 429 and HTTP 5xx responses are
    /// transient. Everything else describes the request or the answer itself
    /// and will fail the same way again.
    ///
    /// # Examples
    /// ```
    /// use fleetroute_core::DistanceError;
    ///
    /// let err = DistanceError::HttpError {
    ///     url: "http://localhost:5000".into(),
    ///     status: 503,
    ///     message: "unavailable".into(),
    /// };
    /// assert!(err.is_transient());
    /// assert!(!DistanceError::NoRoute { from: 0, to: 1 }.is_transient());
    /// ```
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::NetworkError { .. } => true,
            Self::HttpError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(408, false)]
    #[case(429, true)]
    #[case(400, false)]
    #[case(500, true)]
    #[case(502, true)]
    fn http_status_classification(#[case] status: u16, #[case] transient: bool) {
        let err = DistanceError::HttpError {
            url: "http://example.com".to_owned(),
            status,
            message: String::new(),
        };
        assert_eq!(err.is_transient(), transient);
    }

    #[rstest]
    fn parse_errors_are_permanent() {
        let err = DistanceError::ParseError {
            message: "missing routes".to_owned(),
        };
        assert!(!err.is_transient());
    }
}
