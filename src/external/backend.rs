use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};

use crate::{
    api::PlacesGateway,
    config::Config,
    entities::Place,
    error::{invalid_config_error, invalid_input_error, unexpected_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlaceRequest {
    pub place_id: String,
}

/// HTTP client for the places backend.
#[derive(Clone, Debug)]
pub struct Backend {
    client: Client,
    base: Url,
}

impl Backend {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base = Url::parse(&config.api_base).map_err(|_| invalid_config_error())?;

        if base.cannot_be_a_base() {
            return Err(invalid_config_error());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(unexpected_error)?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let request = request.build()?;

        tracing::debug!(method = %request.method(), url = %request.url(), "outgoing request");

        let res = self.client.execute(request).await?;
        let status = res.status();

        if status.is_client_error() {
            return Err(invalid_input_error());
        } else if !status.is_success() {
            return Err(upstream_error());
        }

        Ok(res)
    }

    async fn fetch_places(&self, path: &str) -> Result<Vec<Place>, Error> {
        let url = self.endpoint(&[path])?;
        let res = self.send(self.client.get(url)).await?;
        let data: PlacesResponse = res.json().await?;

        Ok(data.places)
    }
}

#[async_trait]
impl PlacesGateway for Backend {
    #[tracing::instrument(skip(self))]
    async fn fetch_available_places(&self) -> Result<Vec<Place>, Error> {
        self.fetch_places("places").await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_user_places(&self) -> Result<Vec<Place>, Error> {
        self.fetch_places("user-places").await
    }

    #[tracing::instrument(skip(self))]
    async fn add_user_place(&self, place_id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["user-places"])?;
        let body = AddPlaceRequest {
            place_id: place_id.into(),
        };

        self.send(self.client.put(url).json(&body)).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_user_place(&self, place_id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["user-places", place_id])?;

        self.send(self.client.delete(url)).await?;

        Ok(())
    }
}
