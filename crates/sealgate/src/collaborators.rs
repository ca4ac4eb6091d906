//! Trait seams for the external evidence, sealing, and notification
//! collaborators, plus simulated implementations for tests and demos.
//!
//! The bridge owns none of the durable state behind these seams. Every
//! method returns the collaborator's failure unchanged; the bridge has no
//! compensating action to perform.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::error::CollaboratorError;
use crate::evidence::{ActionContext, ArtifactDigest};

/// A constructed-but-unprocessed evidence pack. Opaque to the bridge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvidenceDraft {
    pub composite_id: String,
    pub payload: Value,
}

/// Platform record of a processed evidence pack. Opaque beyond the pack id
/// and optional digest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvidencePackReceipt {
    pub pack_id: String,
    pub pack_digest: Option<String>,
    pub metadata: HashMap<String, Value>,
}

/// Canonical input to sealing: the pack digest plus the artifact manifest.
/// Raw artifact content never crosses this seam.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealRequest {
    pub pack_digest: String,
    pub artifacts: Vec<ArtifactDigest>,
}

/// Tamper-evident envelope from the sealing collaborator.
///
/// The bridge reads only `pack_digest` (for the cross-link invariant);
/// everything else is opaque.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealEnvelope {
    pub pack_digest: String,
    pub binding: String,
    pub sealed_at: DateTime<Utc>,
}

/// Result of re-verifying a seal with the sealing collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealVerification {
    pub valid: bool,
    pub detail: Option<String>,
}

/// Outbound notification as callers describe it.
#[derive(Clone, Debug)]
pub struct NotificationRequest {
    pub channel: String,
    pub subject: String,
    pub body: String,
}

/// Normalized request the dispatcher actually sends.
#[derive(Clone, Debug)]
pub struct SendRequest {
    pub channel: String,
    pub subject: String,
    pub body: String,
}

/// Evidence pipeline seam: constructs and processes evidence packs.
#[async_trait]
pub trait EvidencePipeline: Send + Sync {
    async fn build_pack(&self, ctx: &ActionContext) -> Result<EvidenceDraft, CollaboratorError>;

    async fn process_pack(
        &self,
        draft: EvidenceDraft,
    ) -> Result<EvidencePackReceipt, CollaboratorError>;

    /// Whether the pipeline deduplicates packs by composite action id.
    ///
    /// Retry idempotency of `trigger_evidence` rests entirely on this
    /// contract. It stays `false` until the integration confirms the
    /// collaborator's behavior; the bridge never assumes dedup on its own.
    fn deduplicates_composite_ids(&self) -> bool {
        false
    }
}

/// Sealing seam: issues and re-verifies tamper-evident envelopes.
#[async_trait]
pub trait SealingService: Send + Sync {
    async fn generate_seal(&self, request: &SealRequest)
        -> Result<SealEnvelope, CollaboratorError>;

    async fn verify_seal(
        &self,
        envelope: &SealEnvelope,
    ) -> Result<SealVerification, CollaboratorError>;
}

/// Integration dispatcher seam for terminal-event side-effect notification.
/// Not part of the sealing invariant.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Normalize a caller request into what the transport accepts.
    fn build_send_request(&self, request: NotificationRequest) -> SendRequest;

    async fn dispatch(&self, request: SendRequest) -> Result<(), CollaboratorError>;
}

// Arc wrappers delegate, so a caller can keep a handle on a collaborator it
// hands to the bridge.
#[async_trait]
impl<T: EvidencePipeline + ?Sized> EvidencePipeline for std::sync::Arc<T> {
    async fn build_pack(&self, ctx: &ActionContext) -> Result<EvidenceDraft, CollaboratorError> {
        (**self).build_pack(ctx).await
    }

    async fn process_pack(
        &self,
        draft: EvidenceDraft,
    ) -> Result<EvidencePackReceipt, CollaboratorError> {
        (**self).process_pack(draft).await
    }

    fn deduplicates_composite_ids(&self) -> bool {
        (**self).deduplicates_composite_ids()
    }
}

#[async_trait]
impl<T: SealingService + ?Sized> SealingService for std::sync::Arc<T> {
    async fn generate_seal(
        &self,
        request: &SealRequest,
    ) -> Result<SealEnvelope, CollaboratorError> {
        (**self).generate_seal(request).await
    }

    async fn verify_seal(
        &self,
        envelope: &SealEnvelope,
    ) -> Result<SealVerification, CollaboratorError> {
        (**self).verify_seal(envelope).await
    }
}

#[async_trait]
impl<T: NotificationDispatcher + ?Sized> NotificationDispatcher for std::sync::Arc<T> {
    fn build_send_request(&self, request: NotificationRequest) -> SendRequest {
        (**self).build_send_request(request)
    }

    async fn dispatch(&self, request: SendRequest) -> Result<(), CollaboratorError> {
        (**self).dispatch(request).await
    }
}

/// In-memory evidence pipeline for tests and demos.
///
/// Pack ids and digests are deterministic functions of the draft content, so
/// assertions can predict them.
#[derive(Default)]
pub struct SimulatedEvidencePipeline {
    processed: Mutex<Vec<String>>,
    dedup: bool,
}

impl SimulatedEvidencePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant that reports composite-id deduplication, for exercising the
    /// retry-contract surface.
    pub fn with_dedup() -> Self {
        Self {
            processed: Mutex::new(Vec::new()),
            dedup: true,
        }
    }

    /// Pack ids processed so far, in order.
    pub fn processed(&self) -> Vec<String> {
        self.processed.lock().clone()
    }
}

#[async_trait]
impl EvidencePipeline for SimulatedEvidencePipeline {
    async fn build_pack(&self, ctx: &ActionContext) -> Result<EvidenceDraft, CollaboratorError> {
        Ok(EvidenceDraft {
            composite_id: ctx.composite_id.clone(),
            payload: json!({
                "org_id": ctx.org_id,
                "actor_id": ctx.actor_id,
                "summary": ctx.summary,
            }),
        })
    }

    async fn process_pack(
        &self,
        draft: EvidenceDraft,
    ) -> Result<EvidencePackReceipt, CollaboratorError> {
        let mut hasher = Sha256::new();
        hasher.update(draft.composite_id.as_bytes());
        hasher.update(draft.payload.to_string().as_bytes());
        let digest = hex::encode(hasher.finalize());
        let pack_id = format!("pack-{}", &digest[..12]);
        self.processed.lock().push(pack_id.clone());

        let mut metadata = HashMap::new();
        metadata.insert(
            "composite_id".to_string(),
            Value::String(draft.composite_id),
        );
        Ok(EvidencePackReceipt {
            pack_id,
            pack_digest: Some(digest),
            metadata,
        })
    }

    fn deduplicates_composite_ids(&self) -> bool {
        self.dedup
    }
}

/// Sealing stand-in: the binding is a SHA-256 over the pack digest and the
/// manifest, and verification checks the envelope against the issue log.
#[derive(Default)]
pub struct SimulatedSealingService {
    issued: Mutex<HashMap<String, String>>,
}

impl SimulatedSealingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued_count(&self) -> usize {
        self.issued.lock().len()
    }
}

#[async_trait]
impl SealingService for SimulatedSealingService {
    async fn generate_seal(
        &self,
        request: &SealRequest,
    ) -> Result<SealEnvelope, CollaboratorError> {
        let mut hasher = Sha256::new();
        hasher.update(request.pack_digest.as_bytes());
        for artifact in &request.artifacts {
            hasher.update(artifact.name.as_bytes());
            hasher.update(artifact.sha256.as_bytes());
        }
        let binding = hex::encode(hasher.finalize());
        self.issued
            .lock()
            .insert(binding.clone(), request.pack_digest.clone());

        Ok(SealEnvelope {
            pack_digest: request.pack_digest.clone(),
            binding,
            sealed_at: Utc::now(),
        })
    }

    async fn verify_seal(
        &self,
        envelope: &SealEnvelope,
    ) -> Result<SealVerification, CollaboratorError> {
        match self.issued.lock().get(&envelope.binding) {
            Some(digest) if *digest == envelope.pack_digest => Ok(SealVerification {
                valid: true,
                detail: None,
            }),
            Some(_) => Ok(SealVerification {
                valid: false,
                detail: Some("pack digest does not match the issued binding".into()),
            }),
            None => Ok(SealVerification {
                valid: false,
                detail: Some("unknown binding".into()),
            }),
        }
    }
}

/// Dispatcher stand-in recording normalized sends.
#[derive(Default)]
pub struct SimulatedDispatcher {
    sent: Mutex<Vec<SendRequest>>,
}

impl SimulatedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for SimulatedDispatcher {
    fn build_send_request(&self, request: NotificationRequest) -> SendRequest {
        SendRequest {
            channel: request.channel.trim().to_ascii_lowercase(),
            subject: request.subject.trim().to_string(),
            body: request.body,
        }
    }

    async fn dispatch(&self, request: SendRequest) -> Result<(), CollaboratorError> {
        self.sent.lock().push(request);
        Ok(())
    }
}
