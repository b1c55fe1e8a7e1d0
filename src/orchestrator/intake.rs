//! Request intake - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Validation**: synonym resolution and URL normalization; an empty
//!    target rejects synchronously and never spawns a task.
//! 2. **Configuration check**: missing credentials surface to the caller
//!    here instead of failing inside a spawned task.
//! 3. **Capacity gate**: a `Semaphore` bounds concurrent audits; a
//!    saturated intake rejects rather than queueing, preserving the
//!    immediate-acknowledgement contract.
//! 4. **Task spawn**: exactly one detached task per accepted request, the
//!    permit held for the task's lifetime.
//!
//! The acknowledgement confirms only that processing started; the audit
//! outcome travels exclusively through the notification webhook.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::Config;
use crate::error::{AppResult, AuditError};
use crate::model::{AuditRequest, IntakeAck};
use crate::workflow::{AuditCtx, AuditFlow};

pub struct Intake {
    config: Config,
    flow: Arc<AuditFlow>,
    semaphore: Arc<Semaphore>,
}

impl Intake {
    pub fn new(config: Config) -> AppResult<Self> {
        let flow = Arc::new(AuditFlow::new(&config)?);
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_audits));
        Ok(Self {
            config,
            flow,
            semaphore,
        })
    }

    /// Accept a raw request map and start one audit task
    ///
    /// Returns the acknowledgement immediately; the spawned task outlives
    /// this call. Must run inside the tokio runtime.
    pub fn accept(&self, raw: &Value) -> AppResult<IntakeAck> {
        let request = AuditRequest::from_raw(raw)?;
        self.config.validate()?;

        let permit = self
            .semaphore
            .clone()
            .try_acquire_owned()
            .map_err(|_| AuditError::Saturated {
                limit: self.config.max_concurrent_audits,
            })?;

        let ctx = AuditCtx::new(request);

        // acknowledgement is prepared before the task spawns, so the
        // caller always observes it before any notification can be sent
        let ack = IntakeAck {
            success: true,
            message: "Audit started; results will be delivered via webhook".to_string(),
            target_url: ctx.request.target_url.clone(),
            contact_id: ctx.request.contact_id.clone(),
        };

        info!(
            "[audit {}] accepted request for {}",
            ctx.audit_id, ctx.request.target_url
        );

        let flow = self.flow.clone();
        tokio::spawn(async move {
            let _permit = permit;
            flow.run(ctx).await;
        });

        Ok(ack)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
