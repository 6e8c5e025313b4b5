//! Lazy, process-lifetime embedder loading.
//!
//! The first call to [`EmbedderProvider::get`] starts exactly one load
//! attempt; every later caller shares the memoized outcome, including a
//! failed one. Loading never surfaces an error: a failure is logged and
//! observed as `None`. Recovery is explicit via
//! [`EmbedderProvider::reset`] — nothing retries automatically.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::Embedder;
use super::encoder::{EncoderConfig, TextEncoder};

type SharedLoad = Shared<BoxFuture<'static, Option<Arc<dyn Embedder>>>>;

enum LoadSource {
    /// Build a [`TextEncoder`] from config on first use.
    Encoder(EncoderConfig),
    /// Hand out a pre-built backend (injection point for tests and for
    /// sharing one backend across engines).
    Fixed(Option<Arc<dyn Embedder>>),
}

/// Process-lifetime accessor for the embedding backend.
pub struct EmbedderProvider {
    source: LoadSource,
    slot: Mutex<Option<SharedLoad>>,
}

impl std::fmt::Debug for EmbedderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedderProvider")
            .field("load_started", &self.slot.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl EmbedderProvider {
    /// A provider that lazily loads a [`TextEncoder`] from `config`.
    pub fn from_config(config: EncoderConfig) -> Self {
        Self {
            source: LoadSource::Encoder(config),
            slot: Mutex::new(None),
        }
    }

    /// A provider wrapping an already-built backend.
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            source: LoadSource::Fixed(Some(embedder)),
            slot: Mutex::new(None),
        }
    }

    /// A provider whose backend never becomes available.
    pub fn unavailable() -> Self {
        Self {
            source: LoadSource::Fixed(None),
            slot: Mutex::new(None),
        }
    }

    /// Returns the shared backend, starting the one-and-only load attempt
    /// on first call. `None` means the backend is (permanently, until
    /// [`reset`](Self::reset)) unavailable.
    pub async fn get(&self) -> Option<Arc<dyn Embedder>> {
        let load = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some(load) => load.clone(),
                None => {
                    let load = self.start_load();
                    *slot = Some(load.clone());
                    load
                }
            }
        };
        load.await
    }

    fn start_load(&self) -> SharedLoad {
        match &self.source {
            LoadSource::Fixed(embedder) => {
                let embedder = embedder.clone();
                async move { embedder }.boxed().shared()
            }
            LoadSource::Encoder(config) => {
                let config = config.clone();
                // The model load is blocking (file IO + weight mapping);
                // spawning also starts it eagerly, before the first await.
                tokio::task::spawn_blocking(move || match TextEncoder::load(config) {
                    Ok(encoder) => {
                        debug!(dimension = encoder.dimension(), "embedding backend ready");
                        Some(Arc::new(encoder) as Arc<dyn Embedder>)
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            "embedding backend failed to load; semantic ranking disabled"
                        );
                        None
                    }
                })
                .map(|joined| {
                    joined.unwrap_or_else(|err| {
                        warn!(error = %err, "embedding load task failed");
                        None
                    })
                })
                .boxed()
                .shared()
            }
        }
    }

    /// Clears the memoized load outcome so the next [`get`](Self::get)
    /// attempts a fresh load. Recovery from a transient load failure is the
    /// caller's decision; nothing calls this automatically.
    pub fn reset(&self) {
        *self.slot.lock() = None;
    }
}
