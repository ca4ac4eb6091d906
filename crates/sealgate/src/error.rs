use crate::taxonomy::{Action, EntityType};

/// Rejections of the acting organization context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrgContextError {
    #[error("organization id is required")]
    Missing,
    #[error("organization id {0:?} is not a canonical UUID")]
    Malformed(String),
    #[error("organization id must not be the nil UUID")]
    Nil,
}

/// Rejections against the closed action/entity taxonomy.
///
/// The unknown-tag variants enumerate the full valid set so an operator can
/// correct the call site without digging through the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("unrecognized action {given:?}; valid actions: {}", Action::tag_list())]
    UnknownAction { given: String },
    #[error("unrecognized entity type {given:?}; valid entity types: {}", EntityType::tag_list())]
    UnknownEntityType { given: String },
    #[error("audit event failed structural validation: {}", .problems.join("; "))]
    Structural { problems: Vec<String> },
}

/// A failure surfaced by an external collaborator.
///
/// The bridge never synthesizes one of these for its own logic and never
/// compensates for one — it propagates unchanged, and the terminal
/// transition is simply not committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service}: {message}")]
pub struct CollaboratorError {
    pub service: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Everything the bridge can reject with. Callers must treat every variant
/// as blocking: no sealed evidence means no terminal state change is
/// complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("org context rejected: {0}")]
    OrgContext(#[from] OrgContextError),
    #[error("taxonomy rejected: {0}")]
    Taxonomy(#[from] TaxonomyError),
    #[error("action {action} is not terminal; evidence sealing is limited to: {allowed}")]
    NonTerminal { action: Action, allowed: String },
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),
}
