use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::entities::Place;
use crate::store::PlacesStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Available,
    User,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub is_fetching: bool,
    pub places: Option<Vec<Place>>,
    pub error: Option<String>,
}

/// Fetch state for one list of places, tied to the lifetime of its owner.
///
/// Dropping the view (or calling `teardown`) cancels the fetch; a response
/// that arrives afterwards is ignored.
pub struct PlacesView {
    source: Source,
    store: Arc<PlacesStore>,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    _guard: DropGuard,
}

impl PlacesView {
    pub fn available(store: Arc<PlacesStore>) -> Self {
        Self::new(Source::Available, store)
    }

    /// Once loaded, the user view keeps following the store's collection.
    pub fn user(store: Arc<PlacesStore>) -> Self {
        Self::new(Source::User, store)
    }

    fn new(source: Source, store: Arc<PlacesStore>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let cancel = CancellationToken::new();

        Self {
            source,
            store,
            state: Arc::new(state),
            _guard: cancel.clone().drop_guard(),
            cancel,
            task: None,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Starts the fetch. Calling it again while a fetch is running, or after
    /// teardown, does nothing.
    pub fn start(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }

        if let Some(task) = &self.task {
            if !task.is_finished() {
                return;
            }
        }

        self.state.send_modify(|state| {
            state.is_fetching = true;
            state.error = None;
        });

        let source = self.source;
        let store = self.store.clone();
        let state = self.state.clone();
        let cancel = self.cancel.clone();

        self.task = Some(tokio::spawn(async move {
            match source {
                Source::Available => run_available(store, state, cancel).await,
                Source::User => run_user(store, state, cancel).await,
            }
        }));
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
    }

    /// Resolves once the background task has stopped, either because the
    /// fetch failed, the view was torn down or, for the available list, the
    /// fetch completed.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::error!(error = %err, source = ?self.source, "view task failed");
            }
        }
    }
}

#[tracing::instrument(skip_all)]
async fn run_available(
    store: Arc<PlacesStore>,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
) {
    let result = store.load_available(&cancel).await;

    if cancel.is_cancelled() {
        return;
    }

    state.send_modify(|state| {
        state.is_fetching = false;
        match result {
            Ok(places) => state.places = Some(places),
            Err(err) => state.error = Some(err.message),
        }
    });
}

#[tracing::instrument(skip_all)]
async fn run_user(
    store: Arc<PlacesStore>,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
) {
    let mut places = store.subscribe();
    let result = store.load(&cancel).await;

    if cancel.is_cancelled() {
        return;
    }

    match result {
        Ok(_) => {
            let loaded = places.borrow_and_update().clone();
            state.send_modify(|state| {
                state.is_fetching = false;
                state.places = Some(loaded);
            });
        }
        Err(err) => {
            state.send_modify(|state| {
                state.is_fetching = false;
                state.error = Some(err.message);
            });
            return;
        }
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = places.changed() => {
                if changed.is_err() {
                    break;
                }

                let current = places.borrow_and_update().clone();
                state.send_modify(|state| state.places = Some(current));
            }
        }
    }
}
