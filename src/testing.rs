use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

use crate::{
    api::PlacesGateway,
    entities::{Image, Place},
    error::{upstream_error, Error},
    sink::ErrorSink,
};

pub fn place(id: &str) -> Place {
    Place::new(
        id,
        format!("Place {}", id),
        Image {
            src: format!("{}.jpg", id),
            alt: String::new(),
        },
    )
    .with_description(format!("Description of {}", id))
}

/// In-memory backend. Place ids passed to `fail` make mutations on them
/// fail; ids passed to `hold` make them wait for `release`.
#[derive(Default)]
pub struct FakeGateway {
    available: Mutex<Vec<Place>>,
    user: Mutex<Vec<Place>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    held: Mutex<HashSet<String>>,
    fail_fetches: AtomicBool,
    hold_fetches: AtomicBool,
    released: Notify,
}

impl FakeGateway {
    pub fn set_available_places(&self, places: Vec<Place>) {
        *self.available.lock().unwrap() = places;
    }

    pub fn set_user_places(&self, places: Vec<Place>) {
        *self.user.lock().unwrap() = places;
    }

    pub fn user_places(&self) -> Vec<Place> {
        self.user.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self, ids: &[&str]) {
        let mut failing = self.failing.lock().unwrap();
        failing.extend(ids.iter().map(|id| id.to_string()));
    }

    pub fn hold(&self, ids: &[&str]) {
        let mut held = self.held.lock().unwrap();
        held.extend(ids.iter().map(|id| id.to_string()));
    }

    pub fn fail_fetches(&self) {
        self.fail_fetches.store(true, Ordering::SeqCst);
    }

    pub fn hold_fetches(&self) {
        self.hold_fetches.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn fetch(&self, places: &Mutex<Vec<Place>>) -> Result<Vec<Place>, Error> {
        if self.hold_fetches.load(Ordering::SeqCst) {
            self.released.notified().await;
        }

        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(upstream_error());
        }

        Ok(places.lock().unwrap().clone())
    }

    async fn mutate(&self, place_id: &str) -> Result<(), Error> {
        let held = self.held.lock().unwrap().contains(place_id);
        if held {
            self.released.notified().await;
        }

        let failing = self.failing.lock().unwrap().contains(place_id);
        if failing {
            return Err(upstream_error());
        }

        Ok(())
    }
}

#[async_trait]
impl PlacesGateway for FakeGateway {
    async fn fetch_available_places(&self) -> Result<Vec<Place>, Error> {
        self.record("GET /places".into());
        self.fetch(&self.available).await
    }

    async fn fetch_user_places(&self) -> Result<Vec<Place>, Error> {
        self.record("GET /user-places".into());
        self.fetch(&self.user).await
    }

    async fn add_user_place(&self, place_id: &str) -> Result<(), Error> {
        self.record(format!("PUT /user-places {}", place_id));
        self.mutate(place_id).await?;

        let mut user = self.user.lock().unwrap();
        if !user.iter().any(|p| p.id == place_id) {
            let available = self.available.lock().unwrap();
            let found = available.iter().find(|p| p.id == place_id).cloned();
            user.push(found.unwrap_or_else(|| place(place_id)));
        }

        Ok(())
    }

    async fn remove_user_place(&self, place_id: &str) -> Result<(), Error> {
        self.record(format!("DELETE /user-places/{}", place_id));
        self.mutate(place_id).await?;

        self.user.lock().unwrap().retain(|p| p.id != place_id);

        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn show_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.into());
    }
}
