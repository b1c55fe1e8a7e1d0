use std::fmt;

/// Top-level error type for the audit pipeline
///
/// Every task-scoped failure is one of these variants; the orchestrator
/// matches on the kind rather than on message strings.
#[derive(Debug)]
pub enum AuditError {
    /// Request rejected before any task starts
    Validation(ValidationError),
    /// A required credential or setting is absent
    Config(ConfigError),
    /// Non-success response from an external capability
    Upstream(UpstreamError),
    /// Sanitized model output failed schema parse/validation
    InvalidPayload(PayloadError),
    /// Intake is at its concurrency limit
    Saturated { limit: usize },
    /// Caught panic or other unexpected task failure
    Internal(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::Validation(e) => write!(f, "validation error: {}", e),
            AuditError::Config(e) => write!(f, "configuration error: {}", e),
            AuditError::Upstream(e) => write!(f, "upstream service error: {}", e),
            AuditError::InvalidPayload(e) => write!(f, "invalid audit payload: {}", e),
            AuditError::Saturated { limit } => {
                write!(f, "audit capacity reached ({} concurrent audits)", limit)
            }
            AuditError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditError::Validation(e) => Some(e),
            AuditError::Config(e) => Some(e),
            AuditError::Upstream(e) => Some(e),
            AuditError::InvalidPayload(e) => Some(e),
            AuditError::Saturated { .. } | AuditError::Internal(_) => None,
        }
    }
}

/// Request validation errors
#[derive(Debug)]
pub enum ValidationError {
    /// No URL synonym resolved to a non-empty string
    MissingTarget,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingTarget => write!(f, "no website URL provided"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// A required credential is not configured
    MissingCredential { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential { name } => {
                write!(f, "{} not configured", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identifies which external capability failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Screenshot,
    VisionAnalysis,
    ObjectStorage,
}

impl UpstreamService {
    pub fn name(self) -> &'static str {
        match self {
            UpstreamService::Screenshot => "screenshot service",
            UpstreamService::VisionAnalysis => "vision analysis service",
            UpstreamService::ObjectStorage => "object storage",
        }
    }
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// External capability errors
#[derive(Debug)]
pub enum UpstreamError {
    /// Service answered with a non-success status; body is truncated
    BadStatus {
        service: UpstreamService,
        status: u16,
        body: String,
    },
    /// Request never produced a response (connect/timeout/TLS)
    Transport {
        service: UpstreamService,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Response arrived but did not have the expected shape
    MalformedResponse {
        service: UpstreamService,
        detail: String,
    },
}

impl UpstreamError {
    pub fn service(&self) -> UpstreamService {
        match self {
            UpstreamError::BadStatus { service, .. }
            | UpstreamError::Transport { service, .. }
            | UpstreamError::MalformedResponse { service, .. } => *service,
        }
    }

    /// Transient failures are worth one more attempt; client errors are not
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport { .. } => true,
            UpstreamError::BadStatus { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::MalformedResponse { .. } => false,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::BadStatus {
                service,
                status,
                body,
            } => {
                write!(f, "{} returned {}: {}", service, status, body)
            }
            UpstreamError::Transport { service, source } => {
                write!(f, "{} request failed: {}", service, source)
            }
            UpstreamError::MalformedResponse { service, detail } => {
                write!(f, "{} returned an unexpected response: {}", service, detail)
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Transport { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Model output validation errors
#[derive(Debug)]
pub enum PayloadError {
    /// Sanitized text is not valid JSON for the result schema
    JsonParse { source: serde_json::Error },
    /// Parsed fine but violates a schema invariant
    SchemaViolation { detail: String },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::JsonParse { source } => {
                write!(f, "audit result is not valid JSON: {}", source)
            }
            PayloadError::SchemaViolation { detail } => {
                write!(f, "audit result violates schema: {}", detail)
            }
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::JsonParse { source } => Some(source),
            PayloadError::SchemaViolation { .. } => None,
        }
    }
}

// ========== conversions ==========

impl From<ValidationError> for AuditError {
    fn from(err: ValidationError) -> Self {
        AuditError::Validation(err)
    }
}

impl From<ConfigError> for AuditError {
    fn from(err: ConfigError) -> Self {
        AuditError::Config(err)
    }
}

impl From<UpstreamError> for AuditError {
    fn from(err: UpstreamError) -> Self {
        AuditError::Upstream(err)
    }
}

impl From<PayloadError> for AuditError {
    fn from(err: PayloadError) -> Self {
        AuditError::InvalidPayload(err)
    }
}

// ========== convenience constructors ==========

impl AuditError {
    /// Create an upstream bad-status error with a pre-truncated body
    pub fn upstream_status(service: UpstreamService, status: u16, body: impl Into<String>) -> Self {
        AuditError::Upstream(UpstreamError::BadStatus {
            service,
            status,
            body: body.into(),
        })
    }

    /// Create an upstream transport error
    pub fn upstream_transport(
        service: UpstreamService,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AuditError::Upstream(UpstreamError::Transport {
            service,
            source: Box::new(source),
        })
    }

    /// Create a schema-violation payload error
    pub fn schema_violation(detail: impl Into<String>) -> Self {
        AuditError::InvalidPayload(PayloadError::SchemaViolation {
            detail: detail.into(),
        })
    }

    /// HTTP status equivalent for the synchronous intake surface
    pub fn status_code(&self) -> u16 {
        match self {
            AuditError::Validation(_) => 400,
            AuditError::Config(_) => 500,
            AuditError::Saturated { .. } => 503,
            AuditError::Upstream(_) | AuditError::InvalidPayload(_) | AuditError::Internal(_) => {
                500
            }
        }
    }
}

// ========== Result alias ==========

/// Pipeline result type
pub type AppResult<T> = Result<T, AuditError>;
