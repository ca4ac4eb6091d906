use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::context::OrgId;
use crate::error::{BridgeError, TaxonomyError};
use crate::taxonomy::{Action, EntityType};

/// Caller input for [`crate::ComplianceBridge::emit_audit`].
///
/// Action and entity type arrive as raw tags from the API layer and are
/// parsed against the taxonomy before anything is assembled.
#[derive(Clone, Debug, Default)]
pub struct EmitAuditRequest {
    pub action: String,
    pub org_id: String,
    pub actor_id: String,
    pub correlation_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub from_state: Option<String>,
    pub to_state: Option<String>,
    pub metadata: HashMap<String, Value>,
}

/// An immutable record of one transition.
///
/// Append-only once persisted; persistence itself is the caller's job and
/// happens only after a successful return from the bridge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub action: Action,
    pub org_id: OrgId,
    pub actor_id: String,
    pub correlation_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub from_state: Option<String>,
    pub to_state: Option<String>,
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Gate sequence: org context, action tag, entity-type tag, assembly. The
/// gates short-circuit on first failure; the structural re-check afterwards
/// aggregates every problem instead.
pub(crate) fn build_audit_event(req: EmitAuditRequest) -> Result<AuditEvent, BridgeError> {
    let org_id = OrgId::parse(&req.org_id)?;
    let action: Action = req.action.parse()?;
    let entity_type: EntityType = req.entity_type.parse()?;

    let event = AuditEvent {
        id: Uuid::new_v4(),
        action,
        org_id,
        actor_id: req.actor_id,
        correlation_id: req.correlation_id,
        entity_type,
        entity_id: req.entity_id,
        from_state: req.from_state,
        to_state: req.to_state,
        metadata: req.metadata,
        created_at: Utc::now(),
    };

    // Re-check the assembled object, not just the caller input: a defect in
    // assembly itself must not produce a persistable record.
    let problems = validate_audit_event(&event);
    if !problems.is_empty() {
        return Err(TaxonomyError::Structural { problems }.into());
    }

    tracing::debug!(
        action = %event.action,
        entity_type = %event.entity_type,
        entity_id = %event.entity_id,
        "audit event assembled"
    );
    Ok(event)
}

/// Structural re-validation of an assembled event. Returns every problem
/// found, empty meaning valid.
pub(crate) fn validate_audit_event(event: &AuditEvent) -> Vec<String> {
    let mut problems = Vec::new();
    if event.id.is_nil() {
        problems.push("event id is nil".to_string());
    }
    if event.org_id.as_uuid().is_nil() {
        problems.push("org id is nil".to_string());
    }
    if event.actor_id.trim().is_empty() {
        problems.push("actor id is empty".to_string());
    }
    if event.correlation_id.trim().is_empty() {
        problems.push("correlation id is empty".to_string());
    }
    if event.entity_id.trim().is_empty() {
        problems.push("entity id is empty".to_string());
    }
    if event.created_at.timestamp() <= 0 {
        problems.push("created_at predates the epoch".to_string());
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrgContextError;

    const ORG: &str = "3f1c9a2e-8d4b-4c6f-9e21-7b5a0d8c4f13";

    fn request() -> EmitAuditRequest {
        EmitAuditRequest {
            action: "case_closed".into(),
            org_id: ORG.into(),
            actor_id: "user-7".into(),
            correlation_id: "corr-1".into(),
            entity_type: "case".into(),
            entity_id: "case-42".into(),
            from_state: Some("open".into()),
            to_state: Some("closed".into()),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn builds_valid_event() {
        let event = build_audit_event(request()).unwrap();
        assert_eq!(event.action, Action::CaseClosed);
        assert_eq!(event.entity_type, EntityType::Case);
        assert_eq!(event.org_id.to_string(), ORG);
        assert_eq!(event.from_state.as_deref(), Some("open"));
        assert!(validate_audit_event(&event).is_empty());
    }

    #[test]
    fn gate_order_org_before_taxonomy() {
        // Both org and action are bad; the org gate must fire first.
        let mut req = request();
        req.org_id = "nope".into();
        req.action = "also_nope".into();
        let err = build_audit_event(req).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::OrgContext(OrgContextError::Malformed(_))
        ));
    }

    #[test]
    fn gate_order_action_before_entity_type() {
        let mut req = request();
        req.action = "bad_action".into();
        req.entity_type = "bad_entity".into();
        let err = build_audit_event(req).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Taxonomy(TaxonomyError::UnknownAction { .. })
        ));
    }

    #[test]
    fn rejects_unknown_entity_type() {
        let mut req = request();
        req.entity_type = "invoice".into();
        let err = build_audit_event(req).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Taxonomy(TaxonomyError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn structural_check_aggregates_every_problem() {
        let mut req = request();
        req.actor_id = "  ".into();
        req.correlation_id = String::new();
        req.entity_id = String::new();
        let err = build_audit_event(req).unwrap_err();
        match err {
            BridgeError::Taxonomy(TaxonomyError::Structural { problems }) => {
                assert_eq!(problems.len(), 3);
            }
            other => panic!("expected structural rejection, got {other:?}"),
        }
    }

    #[test]
    fn referentially_stable_under_validation() {
        let a = build_audit_event(request()).unwrap();
        let b = build_audit_event(request()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.action, b.action);
        assert_eq!(a.org_id, b.org_id);
        assert_eq!(a.actor_id, b.actor_id);
        assert_eq!(a.correlation_id, b.correlation_id);
        assert_eq!(a.entity_type, b.entity_type);
        assert_eq!(a.entity_id, b.entity_id);
        assert_eq!(a.metadata, b.metadata);
        assert!(validate_audit_event(&a).is_empty());
        assert!(validate_audit_event(&b).is_empty());
    }

    #[test]
    fn event_serde_round_trip() {
        let event = build_audit_event(request()).unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"case_closed\""));
        let restored: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, event.id);
        assert_eq!(restored.action, event.action);
    }
}
