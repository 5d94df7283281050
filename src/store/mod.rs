mod mutation;

pub use mutation::{Mutation, Operation, State};

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    api::DynGateway,
    entities::Place,
    error::{
        cancelled_error, fetch_failure_error, invalid_input_error, mutation_failure_error, Error,
    },
    sink::DynErrorSink,
};

pub const AVAILABLE_PLACES_FETCH_FAILED: &str =
    "Something went wrong fetching the available places. Please try again later.";
pub const USER_PLACES_FETCH_FAILED: &str =
    "Something went wrong fetching your favourite places. Please try again later.";
pub const ADD_PLACE_FAILED: &str = "Failed to store selected place";
pub const REMOVE_PLACE_FAILED: &str = "Failed to delete your favourite place";

/// The user's saved places, kept in step with the backend.
///
/// The store is the only writer of the collection. Readers take a copy with
/// `places` or follow changes through `subscribe`. Adds and removes are
/// applied locally before the backend answers and rolled back to the exact
/// pre-mutation snapshot when it refuses.
pub struct PlacesStore {
    gateway: DynGateway,
    sink: DynErrorSink,
    places: watch::Sender<Vec<Place>>,
}

impl PlacesStore {
    pub fn new(gateway: DynGateway, sink: DynErrorSink) -> Self {
        let (places, _) = watch::channel(Vec::new());

        Self {
            gateway,
            sink,
            places,
        }
    }

    pub fn places(&self) -> Vec<Place> {
        self.places.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Place>> {
        self.places.subscribe()
    }

    #[tracing::instrument(skip_all)]
    pub async fn load_available(&self, cancel: &CancellationToken) -> Result<Vec<Place>, Error> {
        let places = fetch(
            cancel,
            self.gateway.fetch_available_places(),
            AVAILABLE_PLACES_FETCH_FAILED,
        )
        .await?;

        tracing::info!(count = places.len(), "available places loaded");

        Ok(places)
    }

    /// Replaces the collection with the backend's list. Nothing changes
    /// locally when the request fails or `cancel` fires first.
    #[tracing::instrument(skip_all)]
    pub async fn load(&self, cancel: &CancellationToken) -> Result<Vec<Place>, Error> {
        let fetched = fetch(
            cancel,
            self.gateway.fetch_user_places(),
            USER_PLACES_FETCH_FAILED,
        )
        .await?;

        let places = dedup_by_id(fetched);
        self.places.send_replace(places.clone());

        tracing::info!(count = places.len(), "user places loaded");

        Ok(places)
    }

    /// The backend is asked to associate the place even when it is already
    /// in the collection; only the local append is skipped.
    #[tracing::instrument(skip_all, fields(place_id = %place.id))]
    pub async fn add(&self, place: &Place) -> Result<(), Error> {
        if !place.has_valid_id() {
            return Err(invalid_input_error());
        }

        let mut mutation = Mutation::new(Operation::Add, place.clone());
        self.begin(&mut mutation)?;

        let result = self.gateway.add_user_place(&mutation.place.id).await;

        self.settle(mutation, result, ADD_PLACE_FAILED)
    }

    /// The backend is always asked to drop the association, even when the
    /// place was not in the collection.
    #[tracing::instrument(skip_all, fields(place_id = %place.id))]
    pub async fn remove(&self, place: &Place) -> Result<(), Error> {
        if !place.has_valid_id() {
            return Err(invalid_input_error());
        }

        let mut mutation = Mutation::new(Operation::Remove, place.clone());
        self.begin(&mut mutation)?;

        let result = self.gateway.remove_user_place(&mutation.place.id).await;

        self.settle(mutation, result, REMOVE_PLACE_FAILED)
    }

    fn begin(&self, mutation: &mut Mutation) -> Result<(), Error> {
        let mut outcome = Ok(false);

        self.places.send_if_modified(|places| {
            outcome = mutation.begin(places);
            matches!(outcome, Ok(true))
        });

        let modified = outcome?;

        tracing::debug!(
            mutation_id = %mutation.id,
            operation = %mutation.operation.name(),
            modified,
            "optimistic update applied"
        );

        Ok(())
    }

    fn settle(
        &self,
        mut mutation: Mutation,
        result: Result<(), Error>,
        message: &str,
    ) -> Result<(), Error> {
        match result {
            Ok(()) => {
                mutation.commit()?;

                tracing::info!(
                    mutation_id = %mutation.id,
                    operation = %mutation.operation.name(),
                    "mutation committed"
                );

                Ok(())
            }
            Err(err) => {
                let snapshot = mutation.rollback()?;
                self.places.send_replace(snapshot);

                tracing::warn!(
                    mutation_id = %mutation.id,
                    operation = %mutation.operation.name(),
                    error = %err,
                    "mutation rolled back"
                );

                self.sink.show_error(message);

                Err(mutation_failure_error(message))
            }
        }
    }
}

async fn fetch<F>(
    cancel: &CancellationToken,
    request: F,
    message: &str,
) -> Result<Vec<Place>, Error>
where
    F: Future<Output = Result<Vec<Place>, Error>>,
{
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled_error()),
        result = request => result,
    };

    result.map_err(|err| {
        tracing::warn!(error = %err, internal = err.is_internal(), "fetch failed");
        fetch_failure_error(message)
    })
}

fn dedup_by_id(places: Vec<Place>) -> Vec<Place> {
    let mut unique: Vec<Place> = Vec::with_capacity(places.len());

    for place in places {
        if unique.iter().any(|p| p.id == place.id) {
            tracing::warn!(place_id = %place.id, "duplicate place dropped");
            continue;
        }

        unique.push(place);
    }

    unique
}
