//! Trip wizard controller

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{TripResults, WizardError, WizardStep};
use crate::api::{Itinerary, TravelApi, TravelStyle, TripRequest};
use crate::config::WizardConfig;
use crate::notify::{Notice, Notifier};

/// Title for submission failures that carry no transport category
pub const PLAN_FAILURE_TITLE: &str = "Failed to Plan Trip";

/// Owns the in-progress trip request and walks it through the steps
///
/// The request is only mutated through the named setters. Blocked
/// transitions and failed submissions each emit exactly one notice and
/// leave the wizard where it was.
pub struct TripWizard {
    api: Arc<dyn TravelApi>,
    notifier: Arc<dyn Notifier>,
    config: WizardConfig,
    trip: TripRequest,
    step: WizardStep,
    loading: bool,
    results: Option<TripResults>,
}

impl TripWizard {
    pub fn new(api: Arc<dyn TravelApi>, notifier: Arc<dyn Notifier>, config: WizardConfig) -> Self {
        debug!("TripWizard::new: called");
        let trip = TripRequest {
            duration: config.default_duration,
            ..Default::default()
        };
        Self {
            api,
            notifier,
            config,
            trip,
            step: WizardStep::Destination,
            loading: false,
            results: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn trip(&self) -> &TripRequest {
        &self.trip
    }

    /// True while a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The aggregate from the last successful submission
    pub fn results(&self) -> Option<&TripResults> {
        self.results.as_ref()
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.trip.origin = origin.into();
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.trip.destination = destination.into();
    }

    pub fn set_departure_date(&mut self, date: impl Into<String>) {
        self.trip.departure_date = date.into();
        self.refresh_duration();
    }

    pub fn set_return_date(&mut self, date: impl Into<String>) {
        self.trip.return_date = date.into();
        self.refresh_duration();
    }

    /// At least one traveler
    pub fn set_travelers(&mut self, travelers: u32) {
        self.trip.travelers = travelers.max(1);
    }

    /// Negative and non-finite budgets become zero
    pub fn set_budget(&mut self, budget: f64) {
        self.trip.budget = if budget.is_finite() { budget.max(0.0) } else { 0.0 };
    }

    /// Add the interest if absent, remove it if present; returns whether it is now selected
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        let interest = interest.trim();
        if interest.is_empty() {
            return false;
        }
        if self.trip.interests.remove(interest) {
            false
        } else {
            self.trip.interests.insert(interest.to_string());
            true
        }
    }

    pub fn set_travel_style(&mut self, style: TravelStyle) {
        self.trip.travel_style = style;
    }

    fn refresh_duration(&mut self) {
        self.trip.duration = match self.trip.nights() {
            Some(nights) => nights.max(1),
            None => self.config.default_duration,
        };
    }

    /// Check what leaving the destination step needs
    fn validate_destination(&self) -> Result<(), WizardError> {
        let required = [
            ("destination", &self.trip.destination),
            ("departure date", &self.trip.departure_date),
            ("return date", &self.trip.return_date),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(WizardError::MissingFields(missing));
        }

        if self.config.strict_dates
            && let Some((depart, ret)) = self.trip.parsed_dates()
            && ret < depart
        {
            return Err(WizardError::DatesOutOfOrder {
                departure_date: self.trip.departure_date.clone(),
                return_date: self.trip.return_date.clone(),
            });
        }

        Ok(())
    }

    /// Emit the single notice for a locally refused operation
    fn refuse(&self, err: WizardError) -> WizardError {
        warn!(step = self.step.number(), error = %err, "Wizard operation refused");
        let notice = match &err {
            WizardError::MissingFields(_) => {
                Notice::validation("Missing Information", "Please fill in all required fields")
            }
            WizardError::DatesOutOfOrder { .. } => {
                Notice::validation("Invalid Dates", "The return date must not be before the departure date")
            }
            other => Notice::validation("Not Available", other.to_string()),
        };
        self.notifier.notify(notice);
        err
    }

    /// Move forward one input step
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        debug!(step = self.step.number(), "advance: called");
        let Some(next) = self.step.next() else {
            return Err(self.refuse(WizardError::WrongStep {
                action: "advance",
                step: self.step,
            }));
        };

        if self.step == WizardStep::Destination
            && let Err(err) = self.validate_destination()
        {
            return Err(self.refuse(err));
        }

        info!(from = self.step.number(), to = next.number(), "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Move back one input step; no-op on the first step and on results
    pub fn retreat(&mut self) -> WizardStep {
        debug!(step = self.step.number(), "retreat: called");
        if let Some(previous) = self.step.previous() {
            info!(from = self.step.number(), to = previous.number(), "Wizard retreated");
            self.step = previous;
        }
        self.step
    }

    /// Run the four planning calls and build the results aggregate
    ///
    /// Only allowed from the review step. All four calls run concurrently;
    /// the first failure aborts the rest and nothing is kept.
    pub async fn submit(&mut self) -> Result<&TripResults, WizardError> {
        debug!(step = self.step.number(), "submit: called");
        if self.step != WizardStep::Review {
            return Err(self.refuse(WizardError::WrongStep {
                action: "submit",
                step: self.step,
            }));
        }
        if let Err(err) = self.validate_destination() {
            return Err(self.refuse(err));
        }

        let trip = self.trip.clone();
        let flight_search = trip.flight_search();
        let hotel_search = trip.hotel_search();
        let api = Arc::clone(&self.api);

        info!(destination = %trip.destination, duration = trip.duration, "Submitting trip");
        self.loading = true;
        let outcome = tokio::try_join!(
            api.generate_itinerary(&trip),
            api.search_flights(&flight_search),
            api.search_hotels(&hotel_search),
            api.cultural_insights(&trip.destination),
        );
        self.loading = false;

        match outcome {
            Ok((itinerary, flights, hotels, cultural)) => {
                info!(
                    days = itinerary.days.len(),
                    flights = flights.len(),
                    hotels = hotels.len(),
                    "Trip plan ready"
                );
                self.step = WizardStep::Results;
                self.notifier.notify(Notice::success("Success!", "Your trip plan is ready!"));
                let results = self.results.insert(TripResults::new(itinerary, flights, hotels, cultural));
                Ok(&*results)
            }
            Err(err) => {
                warn!(category = %err.category(), error = %err, "Trip submission failed");
                self.notifier.notify(Notice::from_api_error(&err, PLAN_FAILURE_TITLE));
                Err(WizardError::Api(err))
            }
        }
    }

    /// Swap in a new itinerary, rebuilding the aggregate around it
    ///
    /// Returns false when there are no results to update.
    pub fn replace_itinerary(&mut self, itinerary: Itinerary) -> bool {
        debug!(days = itinerary.days.len(), "replace_itinerary: called");
        match &self.results {
            Some(results) => {
                self.results = Some(results.with_itinerary(itinerary));
                true
            }
            None => false,
        }
    }

    /// Clear everything and return to the first step
    pub fn reset(&mut self) {
        info!("Wizard reset");
        self.trip = TripRequest {
            duration: self.config.default_duration,
            ..Default::default()
        };
        self.step = WizardStep::Destination;
        self.loading = false;
        self.results = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorCategory;
    use crate::api::client::mock::{MockFailure, MockTravelApi};
    use crate::api::{CulturalInsights, DayPlan, Flight, Hotel};
    use crate::notify::RecordingNotifier;
    use proptest::prelude::*;

    fn wizard_with(api: MockTravelApi) -> (TripWizard, Arc<MockTravelApi>, Arc<RecordingNotifier>) {
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::new());
        let wizard = TripWizard::new(api.clone(), notifier.clone(), WizardConfig::default());
        (wizard, api, notifier)
    }

    fn fill_paris(wizard: &mut TripWizard) {
        wizard.set_origin("New York");
        wizard.set_destination("Paris, France");
        wizard.set_departure_date("2025-06-01");
        wizard.set_return_date("2025-06-08");
        wizard.set_travelers(2);
        wizard.set_budget(2000.0);
        wizard.toggle_interest("Food & Dining");
        wizard.set_travel_style(TravelStyle::Balanced);
    }

    fn paris_itinerary() -> Itinerary {
        Itinerary {
            overview: "A week in Paris".to_string(),
            total_estimated_cost: 1850.0,
            days: (1..=7)
                .map(|day| DayPlan {
                    day,
                    title: format!("Day {}", day),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn flights() -> Vec<Flight> {
        ["AF-22", "DL-264", "UA-57"]
            .into_iter()
            .map(|id| Flight {
                id: id.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn hotels() -> Vec<Hotel> {
        ["hotel-marais", "hotel-opera"]
            .into_iter()
            .map(|id| Hotel {
                id: id.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_validation_gate_blocks_missing_fields() {
        let (mut wizard, _, notifier) = wizard_with(MockTravelApi::new());
        wizard.set_destination("Paris, France");
        wizard.set_departure_date("2025-06-01");
        wizard.set_return_date("   ");

        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::MissingFields(ref f) if f == &vec!["return date"]));
        assert_eq!(wizard.step(), WizardStep::Destination);

        let errors = notifier.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, Some(ErrorCategory::Validation));
        assert_eq!(errors[0].title, "Missing Information");

        wizard.set_return_date("2025-06-08");
        assert_eq!(wizard.advance().unwrap(), WizardStep::Preferences);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_reversed_dates_allowed_unless_strict() {
        let (mut wizard, _, _) = wizard_with(MockTravelApi::new());
        wizard.set_destination("Lisbon");
        wizard.set_departure_date("2025-06-08");
        wizard.set_return_date("2025-06-01");
        assert_eq!(wizard.trip().duration, 5);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Preferences);

        let notifier = Arc::new(RecordingNotifier::new());
        let config = WizardConfig {
            strict_dates: true,
            ..Default::default()
        };
        let mut strict = TripWizard::new(Arc::new(MockTravelApi::new()), notifier.clone(), config);
        strict.set_destination("Lisbon");
        strict.set_departure_date("2025-06-08");
        strict.set_return_date("2025-06-01");
        assert!(matches!(strict.advance(), Err(WizardError::DatesOutOfOrder { .. })));
        assert_eq!(strict.step(), WizardStep::Destination);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_setters_clamp_and_derive_duration() {
        let (mut wizard, _, _) = wizard_with(MockTravelApi::new());
        wizard.set_travelers(0);
        wizard.set_budget(-50.0);
        assert_eq!(wizard.trip().travelers, 1);
        assert_eq!(wizard.trip().budget, 0.0);

        wizard.set_departure_date("2025-06-01");
        wizard.set_return_date("2025-06-08");
        assert_eq!(wizard.trip().duration, 7);

        assert!(wizard.toggle_interest("Adventure"));
        assert!(!wizard.toggle_interest("Adventure"));
        assert!(wizard.trip().interests.is_empty());
    }

    #[test]
    fn test_advance_refused_from_review() {
        let (mut wizard, api, notifier) = wizard_with(MockTravelApi::new());
        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        assert!(matches!(wizard.advance(), Err(WizardError::WrongStep { .. })));
        assert_eq!(wizard.step(), WizardStep::Review);
        assert_eq!(notifier.errors().len(), 1);
        assert_eq!(api.planning_calls(), 0);
    }

    #[test]
    fn test_retreat_stops_at_first_step() {
        let (mut wizard, _, notifier) = wizard_with(MockTravelApi::new());
        assert_eq!(wizard.retreat(), WizardStep::Destination);
        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        assert_eq!(wizard.retreat(), WizardStep::Destination);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_builds_aggregate() {
        let api = MockTravelApi::new()
            .with_itinerary(Ok(paris_itinerary()))
            .with_flights(Ok(flights()))
            .with_hotels(Ok(hotels()))
            .with_cultural(Ok(CulturalInsights {
                tipping_guide: "Service is included".to_string(),
                ..Default::default()
            }));
        let (mut wizard, api, notifier) = wizard_with(api);
        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let results = wizard.submit().await.unwrap().clone();

        assert_eq!(wizard.step(), WizardStep::Results);
        assert!(!wizard.is_loading());
        assert_eq!(results.itinerary().days.len(), 7);
        assert_eq!(results.flights(), flights().as_slice());
        assert_eq!(results.hotels(), hotels().as_slice());
        assert_eq!(results.cultural().tipping_guide, "Service is included");
        assert_eq!(api.planning_calls(), 4);

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Your trip plan is ready!");

        // Results are terminal
        assert_eq!(wizard.retreat(), WizardStep::Results);
        assert!(wizard.advance().is_err());
    }

    #[tokio::test]
    async fn test_hotel_timeout_discards_everything() {
        let api = MockTravelApi::new()
            .with_itinerary(Ok(paris_itinerary()))
            .with_flights(Ok(flights()))
            .with_hotels(Err(MockFailure::Timeout));
        let (mut wizard, _, notifier) = wizard_with(api);
        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let err = wizard.submit().await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(wizard.results().is_none());
        assert!(!wizard.is_loading());

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].category, Some(ErrorCategory::Timeout));
        assert_eq!(notices[0].title, "Request Timeout");
    }

    #[tokio::test]
    async fn test_application_failure_uses_backend_message() {
        let api = MockTravelApi::new().with_cultural(Err(MockFailure::Application("Unknown destination".to_string())));
        let (mut wizard, _, notifier) = wizard_with(api);
        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        assert!(wizard.submit().await.is_err());
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, PLAN_FAILURE_TITLE);
        assert_eq!(notices[0].message, "Unknown destination");
    }

    #[tokio::test]
    async fn test_submit_refused_before_review() {
        let (mut wizard, api, notifier) = wizard_with(MockTravelApi::new());
        fill_paris(&mut wizard);

        assert!(matches!(
            wizard.submit().await,
            Err(WizardError::WrongStep { action: "submit", .. })
        ));
        assert_eq!(api.planning_calls(), 0);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_itinerary_and_reset() {
        let api = MockTravelApi::new().with_itinerary(Ok(paris_itinerary()));
        let (mut wizard, _, _) = wizard_with(api);
        assert!(!wizard.replace_itinerary(Itinerary::default()));

        fill_paris(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.submit().await.unwrap();

        let revised = Itinerary {
            overview: "Revised".to_string(),
            ..paris_itinerary()
        };
        assert!(wizard.replace_itinerary(revised.clone()));
        assert_eq!(wizard.results().unwrap().itinerary(), &revised);

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Destination);
        assert!(wizard.results().is_none());
        assert!(wizard.trip().destination.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Move {
        Advance,
        Retreat,
    }

    fn arb_move() -> impl Strategy<Value = Move> {
        prop_oneof![Just(Move::Advance), Just(Move::Retreat)]
    }

    proptest! {
        #[test]
        fn prop_steps_move_by_one_within_bounds(
            moves in prop::collection::vec(arb_move(), 0..40),
            filled in any::<bool>(),
        ) {
            let (mut wizard, _, _) = wizard_with(MockTravelApi::new());
            if filled {
                fill_paris(&mut wizard);
            }

            for m in moves {
                let before = wizard.step().number();
                match m {
                    Move::Advance => { let _ = wizard.advance(); }
                    Move::Retreat => { wizard.retreat(); }
                }
                let after = wizard.step().number();
                prop_assert!((1..=3).contains(&after));
                prop_assert!(before.abs_diff(after) <= 1);
                if !filled {
                    prop_assert_eq!(after, 1);
                }
            }
        }
    }
}
