//! Shared cache of known subject names.
//!
//! [`SubjectsCache`] is created once per session via [`SubjectsCache::start`],
//! which immediately schedules one refresh. Consumers read snapshots or
//! subscribe to a [`tokio::sync::watch`] channel to re-render on change.
//!
//! Overlapping refreshes are not serialized: each one writes its own result
//! when it resolves, so the last to resolve determines the list. `loading`
//! stays set until every in-flight refresh has resolved. After
//! [`shutdown`](SubjectsCache::shutdown), results still in flight are
//! discarded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use facewatch_gateway::FaceGateway;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::display_or;

pub const SUBJECTS_LOAD_FAILED: &str = "Failed to load subjects";

/// Observable state of the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectsSnapshot {
    pub subjects: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct SubjectsCache {
    gateway: Arc<dyn FaceGateway>,
    state: watch::Sender<SubjectsSnapshot>,
    /// Refreshes started but not yet resolved.
    in_flight: AtomicUsize,
    /// Cancelled on shutdown; late results are dropped once it fires.
    cancel: CancellationToken,
}

impl SubjectsCache {
    /// Create the cache and schedule its initial refresh.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(gateway: Arc<dyn FaceGateway>) -> Arc<Self> {
        let cache = Arc::new(Self::new(gateway));

        let initial = Arc::clone(&cache);
        tokio::spawn(async move {
            initial.refresh().await;
        });

        cache
    }

    fn new(gateway: Arc<dyn FaceGateway>) -> Self {
        let (state, _) = watch::channel(SubjectsSnapshot {
            subjects: Vec::new(),
            loading: true,
            error: None,
        });
        Self {
            gateway,
            state,
            in_flight: AtomicUsize::new(0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn snapshot(&self) -> SubjectsSnapshot {
        self.state.borrow().clone()
    }

    /// Current subject names.
    pub fn subjects(&self) -> Vec<String> {
        self.state.borrow().subjects.clone()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SubjectsSnapshot> {
        self.state.subscribe()
    }

    /// Wait until no refresh is in flight and return the settled state.
    pub async fn wait_until_loaded(&self) -> SubjectsSnapshot {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|snapshot| !snapshot.loading).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives as long as `self`, so this is unreachable in
            // practice; fall back to whatever is current.
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Reload the subject list from the backend.
    ///
    /// Success replaces the list wholesale; failure empties it and records
    /// the error. Never returns an error itself.
    pub async fn refresh(&self) {
        if self.cancel.is_cancelled() {
            return;
        }

        self.state.send_modify(|snapshot| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            snapshot.loading = true;
            snapshot.error = None;
        });

        let result = self.gateway.list_subjects().await;

        if self.cancel.is_cancelled() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("Subjects cache shut down, dropping refresh result");
            return;
        }

        self.state.send_modify(|snapshot| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;

            match result {
                Ok(subjects) => {
                    tracing::info!(count = subjects.len(), "Subjects loaded");
                    snapshot.subjects = subjects;
                    snapshot.error = None;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load subjects");
                    snapshot.subjects.clear();
                    snapshot.error = Some(display_or(&e, SUBJECTS_LOAD_FAILED));
                }
            }
            snapshot.loading = remaining > 0;
        });
    }

    /// End the cache's lifetime. Refreshes still in flight will not touch
    /// the state, and later refresh calls are no-ops.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down subjects cache");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
