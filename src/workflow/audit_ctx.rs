use rand::{distributions::Alphanumeric, Rng};

use crate::model::AuditRequest;

/// Per-task context
///
/// Owns the request for the task's lifetime and carries the short id used
/// to prefix every log line belonging to this audit.
#[derive(Debug, Clone)]
pub struct AuditCtx {
    pub audit_id: String,
    pub request: AuditRequest,
}

impl AuditCtx {
    pub fn new(request: AuditRequest) -> Self {
        let audit_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        Self { audit_id, request }
    }
}
