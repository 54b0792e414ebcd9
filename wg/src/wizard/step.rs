//! Wizard step ordinal

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the trip wizard currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Origin, destination and dates
    #[default]
    Destination = 1,
    /// Travelers, budget, interests and style
    Preferences = 2,
    /// Summary before submission
    Review = 3,
    /// Submission succeeded
    Results = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Destination,
        WizardStep::Preferences,
        WizardStep::Review,
        WizardStep::Results,
    ];

    /// 1-based position
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Destination => "Where are you going?",
            WizardStep::Preferences => "Travel Preferences",
            WizardStep::Review => "Review Your Trip",
            WizardStep::Results => "Your Trip Plan",
        }
    }

    /// Next step in input order; the review step has none because results
    /// are only reached through submission
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Destination => Some(WizardStep::Preferences),
            WizardStep::Preferences => Some(WizardStep::Review),
            WizardStep::Review | WizardStep::Results => None,
        }
    }

    /// Previous input step; results are terminal
    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Preferences => Some(WizardStep::Destination),
            WizardStep::Review => Some(WizardStep::Preferences),
            WizardStep::Destination | WizardStep::Results => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Results
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_ordinal() {
        let numbers: Vec<u8> = WizardStep::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_neighbours_differ_by_one() {
        for step in WizardStep::ALL {
            if let Some(next) = step.next() {
                assert_eq!(next.number(), step.number() + 1);
                assert_eq!(next.previous(), Some(step));
            }
        }
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Results.previous(), None);
        assert!(WizardStep::Results.is_terminal());
    }
}
