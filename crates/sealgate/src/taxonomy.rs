use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;

/// Every event kind the platform recognizes (taxonomy v1).
///
/// Closed by design: a new action enters through a reviewed change to this
/// declaration, never through a one-off string at a call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CaseOpened,
    CaseUpdated,
    CaseClosed,
    DecisionDrafted,
    DecisionIssued,
    FilingSubmitted,
    ShareLedgerAmended,
    DataExported,
    EvidenceSealed,
    NotificationSent,
}

impl Action {
    /// Stable taxonomy order (v1).
    pub const ALL: &'static [Action] = &[
        Action::CaseOpened,
        Action::CaseUpdated,
        Action::CaseClosed,
        Action::DecisionDrafted,
        Action::DecisionIssued,
        Action::FilingSubmitted,
        Action::ShareLedgerAmended,
        Action::DataExported,
        Action::EvidenceSealed,
        Action::NotificationSent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CaseOpened => "case_opened",
            Action::CaseUpdated => "case_updated",
            Action::CaseClosed => "case_closed",
            Action::DecisionDrafted => "decision_drafted",
            Action::DecisionIssued => "decision_issued",
            Action::FilingSubmitted => "filing_submitted",
            Action::ShareLedgerAmended => "share_ledger_amended",
            Action::DataExported => "data_exported",
            Action::EvidenceSealed => "evidence_sealed",
            Action::NotificationSent => "notification_sent",
        }
    }

    pub(crate) fn tag_list() -> String {
        Self::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = TaxonomyError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == tag)
            .ok_or_else(|| TaxonomyError::UnknownAction {
                given: tag.to_string(),
            })
    }
}

/// Every subject kind the platform recognizes (taxonomy v1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Case,
    Decision,
    Filing,
    ShareLedger,
    DataExport,
    Organization,
}

impl EntityType {
    /// Stable taxonomy order (v1).
    pub const ALL: &'static [EntityType] = &[
        EntityType::Case,
        EntityType::Decision,
        EntityType::Filing,
        EntityType::ShareLedger,
        EntityType::DataExport,
        EntityType::Organization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Case => "case",
            EntityType::Decision => "decision",
            EntityType::Filing => "filing",
            EntityType::ShareLedger => "share_ledger",
            EntityType::DataExport => "data_export",
            EntityType::Organization => "organization",
        }
    }

    pub(crate) fn tag_list() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = TaxonomyError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == tag)
            .ok_or_else(|| TaxonomyError::UnknownEntityType {
                given: tag.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), *action);
        }
    }

    #[test]
    fn entity_tags_round_trip() {
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>().unwrap(), *entity);
        }
    }

    #[test]
    fn rejects_tags_outside_the_taxonomy() {
        assert!(matches!(
            "case_archived".parse::<Action>(),
            Err(TaxonomyError::UnknownAction { .. })
        ));
        assert!(matches!(
            "CASE_CLOSED".parse::<Action>(),
            Err(TaxonomyError::UnknownAction { .. })
        ));
        assert!(matches!(
            "invoice".parse::<EntityType>(),
            Err(TaxonomyError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn serde_uses_the_same_tags() {
        let json = serde_json::to_string(&Action::DecisionIssued).unwrap();
        assert_eq!(json, "\"decision_issued\"");
        let back: Action = serde_json::from_str("\"share_ledger_amended\"").unwrap();
        assert_eq!(back, Action::ShareLedgerAmended);

        let json = serde_json::to_string(&EntityType::ShareLedger).unwrap();
        assert_eq!(json, "\"share_ledger\"");
    }

    #[test]
    fn all_slices_are_duplicate_free() {
        for (i, a) in Action::ALL.iter().enumerate() {
            assert!(!Action::ALL[..i].contains(a));
        }
        for (i, e) in EntityType::ALL.iter().enumerate() {
            assert!(!EntityType::ALL[..i].contains(e));
        }
    }
}
