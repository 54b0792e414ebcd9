//! Wizard error types

use thiserror::Error;

use super::WizardStep;
use crate::api::{ApiError, ErrorCategory};

/// Why a wizard operation did not go through
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Return date {return_date} is before departure date {departure_date}")]
    DatesOutOfOrder {
        departure_date: String,
        return_date: String,
    },

    #[error("Cannot {action} from {step}")]
    WrongStep { action: &'static str, step: WizardStep },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WizardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WizardError::MissingFields(_) | WizardError::DatesOutOfOrder { .. } | WizardError::WrongStep { .. } => {
                ErrorCategory::Validation
            }
            WizardError::Api(e) => e.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_categories() {
        assert_eq!(
            WizardError::MissingFields(vec!["destination"]).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            WizardError::Api(ApiError::Timeout(Duration::from_secs(1))).category(),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn test_display() {
        let err = WizardError::MissingFields(vec!["destination", "return date"]);
        assert_eq!(err.to_string(), "Missing required fields: destination, return date");

        let err = WizardError::WrongStep {
            action: "submit",
            step: WizardStep::Destination,
        };
        assert!(err.to_string().starts_with("Cannot submit from step 1"));
    }
}
