use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::Place;
use crate::error::Error;

/// Remote side of the places backend.
#[async_trait]
pub trait PlacesGateway {
    async fn fetch_available_places(&self) -> Result<Vec<Place>, Error>;
    async fn fetch_user_places(&self) -> Result<Vec<Place>, Error>;
    async fn add_user_place(&self, place_id: &str) -> Result<(), Error>;
    async fn remove_user_place(&self, place_id: &str) -> Result<(), Error>;
}

pub type DynGateway = Arc<dyn PlacesGateway + Send + Sync>;
