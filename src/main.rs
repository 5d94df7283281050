use std::sync::Arc;

use places::api::DynGateway;
use places::config::Config;
use places::entities::Place;
use places::error::Error;
use places::external::backend::Backend;
use places::sink::ErrorService;
use places::store::PlacesStore;
use places::views::{PlacesView, ViewState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!(api_base = %config.api_base, "starting");

    let gateway = Arc::new(Backend::new(&config)?) as DynGateway;
    let errors = Arc::new(ErrorService::new());
    let store = Arc::new(PlacesStore::new(gateway, errors.clone()));

    let mut available = PlacesView::available(store.clone());
    let mut user = PlacesView::user(store.clone());

    available.start();
    user.start();

    available.finished().await;
    report("available places", available.state());

    // the user view keeps following the store until torn down
    let mut rx = user.subscribe();
    while rx.borrow_and_update().is_fetching {
        if rx.changed().await.is_err() {
            break;
        }
    }
    report("user places", user.state());

    user.teardown();
    user.finished().await;

    if let Some(report) = errors.error() {
        tracing::warn!(error = %report.message, at = %report.reported_at, "unresolved error");
    }

    Ok(())
}

fn report(name: &str, state: ViewState) {
    match (state.places, state.error) {
        (_, Some(error)) => tracing::error!(list = name, %error, "fetch failed"),
        (Some(places), None) => {
            tracing::info!(list = name, count = places.len(), "fetched");
            log_places(&places);
        }
        (None, None) => tracing::warn!(list = name, "nothing fetched"),
    }
}

fn log_places(places: &[Place]) {
    match serde_json::to_string_pretty(places) {
        Ok(json) => tracing::debug!("{}", json),
        Err(err) => tracing::warn!(error = %err, "could not serialize places"),
    }
}
