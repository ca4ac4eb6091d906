use crate::taxonomy::Action;

/// Actions with irreversible real-world effect, in stable order.
///
/// Terminality is a compliance property decided centrally; it is not a flag
/// individual feature owners set per action. Every member must produce a
/// sealed evidence record before the transition counts as committed.
pub const TERMINAL_ACTIONS: &[Action] = &[
    Action::DecisionIssued,
    Action::CaseClosed,
    Action::FilingSubmitted,
    Action::ShareLedgerAmended,
    Action::DataExported,
];

/// Pure membership test against [`TERMINAL_ACTIONS`].
pub fn is_terminal(action: Action) -> bool {
    TERMINAL_ACTIONS.contains(&action)
}

pub(crate) fn terminal_tag_list() -> String {
    TERMINAL_ACTIONS
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_members() {
        assert!(is_terminal(Action::DecisionIssued));
        assert!(is_terminal(Action::CaseClosed));
        assert!(is_terminal(Action::DataExported));
    }

    #[test]
    fn non_terminal_members() {
        assert!(!is_terminal(Action::CaseOpened));
        assert!(!is_terminal(Action::CaseUpdated));
        assert!(!is_terminal(Action::DecisionDrafted));
        // The companion event the bridge itself emits is not terminal.
        assert!(!is_terminal(Action::EvidenceSealed));
        assert!(!is_terminal(Action::NotificationSent));
    }

    #[test]
    fn terminal_set_is_a_strict_subset_of_the_taxonomy() {
        for action in TERMINAL_ACTIONS {
            assert!(Action::ALL.contains(action));
        }
        assert!(TERMINAL_ACTIONS.len() < Action::ALL.len());
    }
}
