//! Multi-step trip wizard
//!
//! Destination, preferences and review steps collect a [`TripRequest`]; a
//! successful submission fans out to the backend and lands on the results
//! step with a [`TripResults`] aggregate.
//!
//! [`TripRequest`]: crate::api::TripRequest

mod error;
mod machine;
mod results;
mod step;

pub use error::WizardError;
pub use machine::{PLAN_FAILURE_TITLE, TripWizard};
pub use results::{
    BEST_VALUE_LABEL, FlightSort, HotelSort, TripResults, filter_hotels_by_stars, option_label, sort_flights,
    sort_hotels,
};
pub use step::WizardStep;
