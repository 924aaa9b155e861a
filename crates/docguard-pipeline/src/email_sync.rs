//! Batched email ingestion.
//!
//! Incoming emails are classified first: promotional/newsletter content is
//! dropped, transactional content goes through the same extract → validate
//! → assess → route → persist → alert pipeline as scans. Batches run with
//! bounded concurrency (default 5 in flight); that bound controls memory
//! and connection usage and is orthogonal to the completion throttle, which
//! spaces the actual service calls regardless of how many emails are in
//! flight. One email's failure never aborts the batch.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use docguard_analysis::{is_transactional, scam, validator};
use docguard_core::defaults::EMAIL_MAX_IN_FLIGHT;
use docguard_core::{AlertKind, CompletionOptions, DocumentSource, IncomingEmail};
use docguard_inference::CompletionThrottle;
use docguard_store::Storage;

use crate::scan::{create_alerts, merge_assessment, persist_extracted, EXTRACTION_SYSTEM_PROMPT};

/// Outcome of processing one email from a batch.
#[derive(Debug, Clone, Serialize)]
pub struct EmailOutcome {
    pub email_id: String,
    pub status: EmailStatus,
}

/// What happened to one email.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EmailStatus {
    /// A document record was created.
    Created {
        document_id: Uuid,
        alert_kind: Option<AlertKind>,
    },
    /// Classified as promotional/newsletter content and dropped.
    SkippedPromotional,
    /// Processing failed; the rest of the batch is unaffected.
    Failed { error: String },
}

/// Batched email ingestion service.
pub struct EmailSyncService {
    storage: Storage,
    throttle: CompletionThrottle,
    max_in_flight: usize,
}

impl EmailSyncService {
    /// Create an email sync service with the default concurrency bound.
    pub fn new(storage: Storage, throttle: CompletionThrottle) -> Self {
        Self {
            storage,
            throttle,
            max_in_flight: EMAIL_MAX_IN_FLIGHT,
        }
    }

    /// Override the max-in-flight bound.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Process a batch of emails for one user.
    ///
    /// Results arrive in completion order, not submission order; there is
    /// no cross-batch ordering guarantee.
    pub async fn sync_batch(&self, user_id: Uuid, emails: Vec<IncomingEmail>) -> Vec<EmailOutcome> {
        let batch_size = emails.len();
        info!(batch_size, max_in_flight = self.max_in_flight, "email sync started");

        let outcomes: Vec<EmailOutcome> = stream::iter(emails)
            .map(|email| self.process_email(user_id, email))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        let created = outcomes
            .iter()
            .filter(|o| matches!(o.status, EmailStatus::Created { .. }))
            .count();
        info!(batch_size, created, "email sync finished");

        outcomes
    }

    async fn process_email(&self, user_id: Uuid, email: IncomingEmail) -> EmailOutcome {
        let email_id = email.id.clone();
        let status = match self.process_inner(user_id, email).await {
            Ok(status) => status,
            Err(e) => {
                warn!(email_id = %email_id, error = %e, "email processing failed");
                EmailStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        EmailOutcome { email_id, status }
    }

    async fn process_inner(
        &self,
        user_id: Uuid,
        email: IncomingEmail,
    ) -> docguard_core::Result<EmailStatus> {
        if !is_transactional(&email.subject, &email.body) {
            debug!(email_id = %email.id, "skipped promotional email");
            return Ok(EmailStatus::SkippedPromotional);
        }

        let prompt = format!(
            "Email from: {}\nSubject: {}\n\n{}",
            email.sender, email.subject, email.body
        );
        let raw = self
            .throttle
            .submit(EXTRACTION_SYSTEM_PROMPT, &prompt, CompletionOptions::default())
            .await?;

        let mut analysis = validator::parse_completion(&raw)?;

        let content = format!("{} {}", email.subject, email.body);
        let assessment = scam::assess(&content, &email.sender);
        merge_assessment(&mut analysis, &assessment);

        let (document, _, _) =
            persist_extracted(&self.storage, user_id, &analysis, DocumentSource::Email).await?;

        let alert_kind = create_alerts(&self.storage, &document).await;

        Ok(EmailStatus::Created {
            document_id: document.id,
            alert_kind,
        })
    }
}
