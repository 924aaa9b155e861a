//! The scan-to-record operation.
//!
//! Capture → OCR → throttled completion call → validation → scam assessment
//! → folder/stack routing → persisted record → alert scheduling. Extraction
//! failures are recoverable through a fallback backend; a completion payload
//! that cannot be parsed aborts the scan; alert-creation failures are logged
//! and swallowed so they can never abort a scan that already produced a
//! record.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use docguard_analysis::{scam, validator};
use docguard_core::{
    AlertKind, CompletionOptions, CreateDocumentRequest, DocumentRecord, DocumentSource, Error,
    ExtractedAnalysis, Result, RiskAssessment, ScanResult, TextExtractionBackend,
};
use docguard_inference::CompletionThrottle;
use docguard_store::Storage;

use crate::alerts::{schedule_deadline_alert, schedule_scam_alert};
use crate::routing::{assign_folder, route_stack};

/// System prompt for the extraction completion call.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "\
You are a document analysis service. Given the text of a scanned document or \
email, respond with a single JSON object and nothing else:
{
  \"title\": \"short document title\",
  \"amount\": 0.0,
  \"due_date\": \"YYYY-MM-DD\",
  \"category\": \"Finance|Education|Shopping|Health|Career|Other\",
  \"summary_bullets\": [\"...\"],
  \"is_scam\": false
}
Use null for amount and due_date when the document has none.";

/// A scan request from the capture boundary.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub user_id: Uuid,
    pub image_path: String,
    pub image_url: Option<String>,
}

/// Orchestrates the full scan-to-record pipeline.
pub struct ScanService {
    storage: Storage,
    throttle: CompletionThrottle,
    ocr: Arc<dyn TextExtractionBackend>,
    fallback_ocr: Option<Arc<dyn TextExtractionBackend>>,
}

impl ScanService {
    /// Create a scan service.
    pub fn new(
        storage: Storage,
        throttle: CompletionThrottle,
        ocr: Arc<dyn TextExtractionBackend>,
    ) -> Self {
        Self {
            storage,
            throttle,
            ocr,
            fallback_ocr: None,
        }
    }

    /// Add a secondary extraction path used when the primary one fails.
    pub fn with_fallback_ocr(mut self, fallback: Arc<dyn TextExtractionBackend>) -> Self {
        self.fallback_ocr = Some(fallback);
        self
    }

    /// Extract text, falling back to the secondary backend on a typed
    /// extraction failure.
    async fn extract_text(&self, image_path: &str) -> Result<String> {
        match self.ocr.extract_text(image_path).await {
            Ok(extraction) => Ok(extraction.full_text),
            Err(Error::Extraction(msg)) => {
                let Some(fallback) = &self.fallback_ocr else {
                    return Err(Error::Extraction(msg));
                };
                warn!(error = %msg, "primary extraction failed, using fallback");
                let extraction = fallback.extract_text(image_path).await?;
                Ok(extraction.full_text)
            }
            Err(e) => Err(e),
        }
    }

    /// Run the full scan-to-record pipeline for one captured image.
    pub async fn scan_to_record(&self, req: ScanRequest) -> Result<ScanResult> {
        let full_text = self.extract_text(&req.image_path).await?;

        let prompt = format!("Document text:\n\n{}", full_text);
        let raw = self
            .throttle
            .submit(EXTRACTION_SYSTEM_PROMPT, &prompt, CompletionOptions::default())
            .await?;

        let mut analysis = validator::parse_completion(&raw)?;

        // Scanned documents carry no sender, so the domain detector is
        // inert; content heuristics still apply.
        let assessment = scam::assess(&full_text, "");
        merge_assessment(&mut analysis, &assessment);

        let (document, folder_id, folder_name) = persist_extracted(
            &self.storage,
            req.user_id,
            &analysis,
            DocumentSource::Scan,
        )
        .await?;

        let alert_kind = create_alerts(&self.storage, &document).await;

        info!(
            document_id = %document.id,
            risk_score = document.risk_score,
            folder = folder_name.as_deref().unwrap_or(""),
            "scan complete"
        );

        Ok(ScanResult {
            analysis,
            document_id: document.id,
            image_url: req.image_url,
            auto_assigned_folder_id: folder_id,
            auto_assigned_folder_name: folder_name,
            alert_created: alert_kind.is_some(),
            alert_kind,
        })
    }
}

/// Fold a fresh risk assessment into a validated analysis. The assessment
/// verdict can only raise the scam flag, never clear one the completion
/// service already set.
pub(crate) fn merge_assessment(analysis: &mut ExtractedAnalysis, assessment: &RiskAssessment) {
    analysis.is_scam = analysis.is_scam || assessment.is_scam;
    analysis.risk_score = Some(assessment.score);
    if !assessment.indicators.is_empty() {
        analysis.risk_indicators = Some(assessment.indicators.clone());
    }
}

/// Route and persist a validated analysis as a document record.
pub(crate) async fn persist_extracted(
    storage: &Storage,
    user_id: Uuid,
    analysis: &ExtractedAnalysis,
    source: DocumentSource,
) -> Result<(DocumentRecord, Option<Uuid>, Option<String>)> {
    let (folder_id, folder_name) =
        assign_folder(storage, user_id, &analysis.title, analysis.category).await?;

    let stacks = storage.stacks.list(user_id).await?;
    let stack_id = route_stack(&analysis.title, analysis.category, &stacks);

    let document_id = storage
        .documents
        .insert(CreateDocumentRequest {
            user_id,
            title: analysis.title.clone(),
            category: analysis.category,
            amount: analysis.amount,
            due_date: analysis.due_date,
            summary: analysis.summary.clone(),
            is_scam: analysis.is_scam,
            risk_score: analysis.risk_score.unwrap_or(0),
            source,
            folder_id: Some(folder_id),
            stack_id,
        })
        .await?;

    let document = storage
        .documents
        .get(document_id)
        .await?
        .ok_or(Error::DocumentNotFound(document_id))?;

    Ok((document, Some(folder_id), Some(folder_name)))
}

/// Create the appropriate alert for a freshly persisted document. Failures
/// are logged and swallowed; alert creation must never abort the
/// surrounding scan/save flow.
pub(crate) async fn create_alerts(storage: &Storage, document: &DocumentRecord) -> Option<AlertKind> {
    let now = Utc::now();

    let result = if document.is_scam {
        schedule_scam_alert(storage, document, now).await
    } else {
        schedule_deadline_alert(storage, document, now).await
    };

    match result {
        Ok(kind) => kind,
        Err(e) => {
            warn!(document_id = %document.id, error = %e, "alert creation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use docguard_core::DocumentCategory;
    use docguard_inference::{MockCompletionBackend, MockOcrBackend, ThrottleConfig};

    fn throttle(backend: MockCompletionBackend) -> CompletionThrottle {
        CompletionThrottle::spawn(
            Arc::new(backend),
            ThrottleConfig::default().with_min_interval(std::time::Duration::from_millis(1)),
        )
    }

    fn bill_json(due_date: &str) -> String {
        format!(
            "```json\n{{\"title\": \"Electric Bill\", \"amount\": 120.50, \
             \"due_date\": \"{}\", \"category\": \"Finance\", \
             \"summary_bullets\": [\"Monthly electricity charge\"], \"is_scam\": false}}\n```",
            due_date
        )
    }

    fn request() -> ScanRequest {
        ScanRequest {
            user_id: Uuid::new_v4(),
            image_path: "/scans/bill.jpg".to_string(),
            image_url: Some("https://cdn.example.com/bill.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn scan_produces_record_folder_and_alert() {
        let storage = Storage::local();
        let due = (Utc::now() + Duration::days(3)).date_naive();
        let completion = MockCompletionBackend::new().with_response(bill_json(&due.to_string()));
        let ocr = Arc::new(MockOcrBackend::new("ELECTRIC BILL\nAmount due: $120.50"));

        let service = ScanService::new(storage.clone(), throttle(completion), ocr);
        let req = request();
        let user = req.user_id;

        let result = service.scan_to_record(req).await.unwrap();

        assert_eq!(result.analysis.title, "Electric Bill");
        assert_eq!(result.analysis.category, DocumentCategory::Finance);
        assert_eq!(result.auto_assigned_folder_name.as_deref(), Some("Utility Bills"));
        assert!(result.alert_created);
        assert_eq!(result.alert_kind, Some(AlertKind::Deadline7Day));

        let docs = storage.documents.list(user).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].folder_id, result.auto_assigned_folder_id);
        assert!(!docs[0].is_scam);
    }

    #[tokio::test]
    async fn scan_uses_fallback_when_primary_extraction_fails() {
        let storage = Storage::local();
        let completion = MockCompletionBackend::new().with_response(bill_json("2026-09-01"));
        let primary = Arc::new(MockOcrBackend::failing());
        let fallback = Arc::new(MockOcrBackend::new("Electric Bill"));

        let service = ScanService::new(storage, throttle(completion), primary)
            .with_fallback_ocr(fallback.clone());

        let result = service.scan_to_record(request()).await.unwrap();
        assert_eq!(result.analysis.title, "Electric Bill");
        assert_eq!(fallback.calls().len(), 1);
    }

    #[tokio::test]
    async fn scan_fails_when_extraction_fails_without_fallback() {
        let storage = Storage::local();
        let completion = MockCompletionBackend::new().with_response(bill_json("2026-09-01"));
        let service = ScanService::new(
            storage,
            throttle(completion),
            Arc::new(MockOcrBackend::failing()),
        );

        let err = service.scan_to_record(request()).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn unparsable_completion_aborts_scan() {
        let storage = Storage::local();
        let completion =
            MockCompletionBackend::new().with_response("I couldn't read this document.");
        let service = ScanService::new(
            storage.clone(),
            throttle(completion),
            Arc::new(MockOcrBackend::new("blurry text")),
        );

        let req = request();
        let user = req.user_id;
        let err = service.scan_to_record(req).await.unwrap_err();
        assert!(matches!(err, Error::AnalysisParse(_)));

        // Nothing was persisted.
        assert!(storage.documents.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn phishing_content_yields_scam_warning() {
        let storage = Storage::local();
        let completion = MockCompletionBackend::new().with_response(
            "{\"title\": \"Account Notice\", \"category\": \"Other\", \
             \"summary_bullets\": [\"Suspicious notice\"], \"is_scam\": false}",
        );
        let ocr = Arc::new(MockOcrBackend::new(
            "URGENT: verify your password immediately or account suspended. \
             Click here to verify now. Enter your card number and cvv.",
        ));

        let service = ScanService::new(storage.clone(), throttle(completion), ocr);
        let req = request();
        let user = req.user_id;

        let result = service.scan_to_record(req).await.unwrap();

        assert!(result.analysis.is_scam);
        assert!(result.analysis.risk_score.unwrap() >= 70);
        assert_eq!(result.alert_kind, Some(AlertKind::ScamWarning));

        let docs = storage.documents.list(user).await.unwrap();
        assert!(docs[0].is_scam);
        assert!(docs[0].risk_score >= 70);
    }

    #[tokio::test]
    async fn stack_routing_applies_during_scan() {
        let storage = Storage::local();
        let user = Uuid::new_v4();
        let stack_id = storage
            .stacks
            .create(docguard_core::CreateStackRequest {
                user_id: user,
                name: "Utilities".to_string(),
                icon: "bolt".to_string(),
                color: "#ffcc00".to_string(),
                keywords: vec!["electric".to_string()],
                position: 0,
            })
            .await
            .unwrap();

        let due = (Utc::now() + Duration::days(30)).date_naive();
        let completion = MockCompletionBackend::new().with_response(bill_json(&due.to_string()));
        let service = ScanService::new(
            storage.clone(),
            throttle(completion),
            Arc::new(MockOcrBackend::new("Electric Bill")),
        );

        let result = service
            .scan_to_record(ScanRequest {
                user_id: user,
                image_path: "/scans/bill.jpg".to_string(),
                image_url: None,
            })
            .await
            .unwrap();

        let doc = storage.documents.get(result.document_id).await.unwrap().unwrap();
        assert_eq!(doc.stack_id, Some(stack_id));
        // Due in 30 days: no alert yet.
        assert!(!result.alert_created);
    }
}
