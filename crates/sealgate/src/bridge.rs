use crate::audit::{self, AuditEvent, EmitAuditRequest};
use crate::collaborators::{
    EvidencePipeline, NotificationDispatcher, NotificationRequest, SealEnvelope, SealVerification,
    SealingService,
};
use crate::error::BridgeError;
use crate::evidence::{self, EvidenceRequest, SealedEvidenceRecord};

/// The single sanctioned entrypoint for terminal business events.
///
/// Every audit emission and every evidence seal goes through this type. The
/// lower-level validation and orchestration modules are private to the
/// crate, so reaching around the facade is a compile error, not a
/// convention.
///
/// Holds no long-lived mutable state; each call is a pure-until-I/O pipeline
/// from validated input to validated output or an error. Concurrent calls
/// run independently with no shared lock.
pub struct ComplianceBridge<P, S, N> {
    pipeline: P,
    sealer: S,
    dispatcher: N,
}

impl<P, S, N> ComplianceBridge<P, S, N>
where
    P: EvidencePipeline,
    S: SealingService,
    N: NotificationDispatcher,
{
    pub fn new(pipeline: P, sealer: S, dispatcher: N) -> Self {
        Self {
            pipeline,
            sealer,
            dispatcher,
        }
    }

    /// Validate and assemble an audit event.
    ///
    /// Synchronous: there is no I/O behind it. The caller persists the
    /// returned record in the external append-only audit store.
    pub fn emit_audit(&self, request: EmitAuditRequest) -> Result<AuditEvent, BridgeError> {
        audit::build_audit_event(request)
    }

    /// Seal evidence for a terminal action.
    ///
    /// Rejects before any collaborator call when the org context, taxonomy,
    /// or terminal classification fails. On success, returns the record the
    /// caller must persist before treating the transition as complete.
    pub async fn trigger_evidence(
        &self,
        request: EvidenceRequest,
    ) -> Result<SealedEvidenceRecord, BridgeError> {
        evidence::trigger_evidence(&self.pipeline, &self.sealer, request).await
    }

    /// Re-verify a previously issued seal with the sealing collaborator.
    pub async fn verify_seal(
        &self,
        envelope: &SealEnvelope,
    ) -> Result<SealVerification, BridgeError> {
        Ok(self.sealer.verify_seal(envelope).await?)
    }

    /// Send a terminal-event notification through the external dispatcher.
    ///
    /// Side effect only; not part of the sealing invariant, and never
    /// reimplemented locally.
    pub async fn dispatch_notification(
        &self,
        request: NotificationRequest,
    ) -> Result<(), BridgeError> {
        let send = self.dispatcher.build_send_request(request);
        Ok(self.dispatcher.dispatch(send).await?)
    }
}
