use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::audit::{self, AuditEvent, EmitAuditRequest};
use crate::collaborators::{
    EvidencePackReceipt, EvidencePipeline, SealEnvelope, SealRequest, SealingService,
};
use crate::context::OrgId;
use crate::error::BridgeError;
use crate::taxonomy::{Action, EntityType};
use crate::terminal;

/// Caller input for [`crate::ComplianceBridge::trigger_evidence`].
///
/// Request-scoped; discarded once the sealed record is returned.
#[derive(Clone, Debug, Default)]
pub struct EvidenceRequest {
    pub action: String,
    pub org_id: String,
    pub actor_id: String,
    pub correlation_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub from_state: Option<String>,
    pub to_state: Option<String>,
    pub artifacts: Vec<Artifact>,
    pub summary: Option<String>,
}

/// A named content reference attached to a terminal action.
///
/// Only its digest ever reaches the sealing collaborator.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: String,
    pub content: Vec<u8>,
}

/// Manifest entry handed to sealing in place of raw content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    pub name: String,
    pub sha256: String,
}

/// Generic action-context value handed to the evidence pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionContext {
    /// Deterministic `"<action_tag>:<entity_id>"` key for idempotent
    /// external correlation.
    pub composite_id: String,
    pub org_id: OrgId,
    pub actor_id: String,
    pub summary: Option<String>,
}

/// The durable output of a successful terminal transition. Exactly one per
/// committed terminal-action instance; the caller must persist it before
/// treating the transition as complete.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedEvidenceRecord {
    pub evidence_pack: EvidencePackReceipt,
    pub seal: SealEnvelope,
    pub audit_event: AuditEvent,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn digest_artifact(artifact: &Artifact) -> ArtifactDigest {
    let mut hasher = Sha256::new();
    hasher.update(&artifact.content);
    ArtifactDigest {
        name: artifact.name.clone(),
        sha256: hex::encode(hasher.finalize()),
    }
}

/// Terminal-only sealing pipeline.
///
/// Ordering invariant: the pack is materialized before the seal is
/// requested, and the seal is computed before the cross-linking audit event
/// is built. A seal must bind to a pack that can no longer change.
pub(crate) async fn trigger_evidence<P, S>(
    pipeline: &P,
    sealer: &S,
    req: EvidenceRequest,
) -> Result<SealedEvidenceRecord, BridgeError>
where
    P: EvidencePipeline,
    S: SealingService,
{
    // 1. Validation gates, all before any collaborator I/O.
    let org_id = OrgId::parse(&req.org_id)?;
    let action: Action = req.action.parse()?;
    let entity_type: EntityType = req.entity_type.parse()?;
    if !terminal::is_terminal(action) {
        return Err(BridgeError::NonTerminal {
            action,
            allowed: terminal::terminal_tag_list(),
        });
    }

    // 2. Map into the generic action context. Whether the composite id is a
    //    dedup key is the pipeline's contract, not an assumption here.
    let ctx = ActionContext {
        composite_id: format!("{}:{}", action.as_str(), req.entity_id),
        org_id,
        actor_id: req.actor_id.clone(),
        summary: req.summary.clone(),
    };
    tracing::debug!(
        composite_id = %ctx.composite_id,
        pipeline_dedup = pipeline.deduplicates_composite_ids(),
        "requesting evidence pack"
    );

    // 3. Construct and process the pack; its identifier must be known
    //    before anything is sealed.
    let draft = pipeline.build_pack(&ctx).await?;
    let receipt = pipeline.process_pack(draft).await?;

    // 4. Digest manifest stands in for raw artifact content.
    let manifest: Vec<ArtifactDigest> = req.artifacts.iter().map(digest_artifact).collect();

    // 5. Seal the processed pack; the entity id is the fallback key when
    //    the pipeline reports no digest.
    let pack_digest = receipt
        .pack_digest
        .clone()
        .unwrap_or_else(|| req.entity_id.clone());
    let seal = sealer
        .generate_seal(&SealRequest {
            pack_digest,
            artifacts: manifest,
        })
        .await?;

    // 6. Companion audit event cross-links to the seal just produced.
    let audit_event = build_sealed_audit_event(&req, action, entity_type, &receipt, &seal)?;

    tracing::info!(
        composite_id = %ctx.composite_id,
        pack_id = %receipt.pack_id,
        "terminal action sealed"
    );
    Ok(SealedEvidenceRecord {
        evidence_pack: receipt,
        seal,
        audit_event,
        created_at: Utc::now(),
    })
}

fn build_sealed_audit_event(
    req: &EvidenceRequest,
    action: Action,
    entity_type: EntityType,
    receipt: &EvidencePackReceipt,
    seal: &SealEnvelope,
) -> Result<AuditEvent, BridgeError> {
    let mut metadata = HashMap::new();
    metadata.insert(
        "terminal_action".to_string(),
        Value::String(action.as_str().to_string()),
    );
    metadata.insert(
        "evidence_pack_id".to_string(),
        Value::String(receipt.pack_id.clone()),
    );
    metadata.insert(
        "seal_digest".to_string(),
        Value::String(seal.pack_digest.clone()),
    );
    if let Some(summary) = &req.summary {
        metadata.insert("summary".to_string(), Value::String(summary.clone()));
    }

    audit::build_audit_event(EmitAuditRequest {
        action: Action::EvidenceSealed.as_str().to_string(),
        org_id: req.org_id.clone(),
        actor_id: req.actor_id.clone(),
        correlation_id: req.correlation_id.clone(),
        entity_type: entity_type.as_str().to_string(),
        entity_id: req.entity_id.clone(),
        from_state: req.from_state.clone(),
        to_state: req.to_state.clone(),
        metadata,
    })
}
