//! Live itinerary and its persisted copy
//!
//! The itinerary produced by the wizard is shared through a watch channel.
//! The chat session replaces it wholesale; observers such as the persister
//! see every replacement.

use std::sync::Arc;

use eyre::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{Itinerary, TripRequest};
use crate::store::{self, ITINERARY_KEY, KeyValueStore, TRIP_KEY};

/// Shared handle on the one current itinerary
#[derive(Debug, Clone)]
pub struct LiveItinerary {
    tx: Arc<watch::Sender<Option<Itinerary>>>,
}

impl LiveItinerary {
    pub fn new(initial: Option<Itinerary>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current itinerary
    pub fn current(&self) -> Option<Itinerary> {
        self.tx.borrow().clone()
    }

    /// Replace the itinerary and wake every observer
    pub fn replace(&self, itinerary: Itinerary) {
        debug!(days = itinerary.days.len(), "LiveItinerary::replace: called");
        self.tx.send_replace(Some(itinerary));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Itinerary>> {
        self.tx.subscribe()
    }
}

/// Write every itinerary replacement to the store
///
/// The task ends once every [`LiveItinerary`] handle is dropped, after the
/// last value has been written.
pub fn spawn_itinerary_persister(live: &LiveItinerary, store: Arc<dyn KeyValueStore>) -> JoinHandle<()> {
    debug!("spawn_itinerary_persister: called");
    let mut rx = live.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let outcome = match snapshot {
                Some(itinerary) => store::save(store.as_ref(), ITINERARY_KEY, &itinerary),
                None => store.remove(ITINERARY_KEY),
            };
            match outcome {
                Ok(()) => debug!("spawn_itinerary_persister: itinerary written"),
                Err(e) => warn!(error = %e, "Failed to persist itinerary"),
            }
        }
        debug!("spawn_itinerary_persister: channel closed");
    })
}

/// Persist the trip and itinerary of a completed plan
pub fn save_plan(store: &dyn KeyValueStore, trip: &TripRequest, itinerary: &Itinerary) -> Result<()> {
    debug!(destination = %trip.destination, "save_plan: called");
    store::save(store, TRIP_KEY, trip)?;
    store::save(store, ITINERARY_KEY, itinerary)?;
    info!(destination = %trip.destination, "Saved trip plan");
    Ok(())
}

/// Trip and itinerary saved by an earlier run
pub fn load_plan(store: &dyn KeyValueStore) -> (Option<TripRequest>, Option<Itinerary>) {
    debug!("load_plan: called");
    (store::load(store, TRIP_KEY), store::load(store, ITINERARY_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DayPlan;
    use crate::store::MemoryStore;

    fn itinerary(overview: &str, days: u32) -> Itinerary {
        Itinerary {
            overview: overview.to_string(),
            days: (1..=days)
                .map(|day| DayPlan {
                    day,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_persister_writes_latest_itinerary() {
        let store = Arc::new(MemoryStore::new());
        let live = LiveItinerary::new(Some(itinerary("first", 3)));
        let handle = spawn_itinerary_persister(&live, store.clone());

        live.replace(itinerary("second", 2));
        live.replace(itinerary("third", 4));
        drop(live);
        handle.await.unwrap();

        let saved: Itinerary = store::load(store.as_ref(), ITINERARY_KEY).unwrap();
        assert_eq!(saved.overview, "third");
        assert_eq!(saved.days.len(), 4);
    }

    #[tokio::test]
    async fn test_clones_share_one_value() {
        let live = LiveItinerary::new(None);
        let other = live.clone();
        let mut rx = other.subscribe();

        live.replace(itinerary("shared", 1));
        rx.changed().await.unwrap();

        assert_eq!(other.current().unwrap().overview, "shared");
        assert_eq!(rx.borrow().as_ref().unwrap().overview, "shared");
    }

    #[test]
    fn test_plan_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_plan(&store), (None, None));

        let trip = TripRequest {
            destination: "Paris, France".to_string(),
            ..Default::default()
        };
        save_plan(&store, &trip, &itinerary("Paris", 5)).unwrap();

        let (loaded_trip, loaded_itinerary) = load_plan(&store);
        assert_eq!(loaded_trip.unwrap().destination, "Paris, France");
        assert_eq!(loaded_itinerary.unwrap().days.len(), 5);
    }
}
