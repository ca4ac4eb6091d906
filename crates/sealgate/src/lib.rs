#![deny(unsafe_code)]
//! # sealgate
//!
//! Compliance bridge: the sole gateway through which a subsystem declares
//! that an irreversible ("terminal") business event has occurred.
//!
//! Before a terminal transition counts as committed, the bridge guarantees:
//!
//! - the acting organization context is valid;
//! - the action and entity type belong to a closed, centrally-governed
//!   taxonomy;
//! - a tamper-evident sealed evidence record exists;
//! - a structured audit event is emitted whose metadata cross-links to that
//!   seal (`metadata["seal_digest"]` equals the seal's pack digest).
//!
//! Validation gates fail fast before any collaborator I/O, and collaborator
//! failures propagate unchanged: no sealed evidence means no terminal state
//! change is complete.
//!
//! ## Key Types
//!
//! - [`ComplianceBridge`] — the only sanctioned public surface
//! - [`Action`] / [`EntityType`] — closed taxonomy enumerations
//! - [`TERMINAL_ACTIONS`] / [`is_terminal`] — the irreversible subset
//! - [`SealedEvidenceRecord`] — durable output of a terminal transition
//! - [`EvidencePipeline`] / [`SealingService`] / [`NotificationDispatcher`]
//!   — collaborator seams, with `Simulated*` implementations for tests and
//!   demos
//!
//! Lower-level validation and orchestration modules are private: reaching
//! around the facade is a compile error, not a convention.

mod audit;
mod bridge;
mod collaborators;
mod context;
mod error;
mod evidence;
mod taxonomy;
mod terminal;

pub use audit::{AuditEvent, EmitAuditRequest};
pub use bridge::ComplianceBridge;
pub use collaborators::{
    EvidenceDraft, EvidencePackReceipt, EvidencePipeline, NotificationDispatcher,
    NotificationRequest, SealEnvelope, SealRequest, SealVerification, SealingService, SendRequest,
    SimulatedDispatcher, SimulatedEvidencePipeline, SimulatedSealingService,
};
pub use context::OrgId;
pub use error::{BridgeError, CollaboratorError, OrgContextError, TaxonomyError};
pub use evidence::{
    ActionContext, Artifact, ArtifactDigest, EvidenceRequest, SealedEvidenceRecord,
};
pub use taxonomy::{Action, EntityType};
pub use terminal::{is_terminal, TERMINAL_ACTIONS};
