//! Per-locale memoized index builds.
//!
//! One build per `(locale, signature)` is in flight at a time: concurrent
//! callers that observe the same signature await the same shared task. A
//! changed signature supersedes the previous build immediately, even while
//! it is still running; the superseded task finishes in the background and
//! its result is dropped along with the old slot.


use std::collections::HashMap;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::debug;

use crate::catalog::{DocumentDescriptor, Locale};
use crate::embedding::EmbedderProvider;
use crate::hashing::Signature;
use crate::index::{DescriptorInput, IndexError, SemanticIndex, build_index};

type SharedBuild = Shared<BoxFuture<'static, Result<Arc<SemanticIndex>, IndexError>>>;

struct IndexSlot {
    signature: Signature,
    build: SharedBuild,
}

/// Locale-keyed cache of (possibly in-flight) semantic indexes.
pub struct IndexCache {
    provider: Arc<EmbedderProvider>,
    slots: Mutex<HashMap<Locale, IndexSlot>>,
    batch_size: usize,
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("locales", &self.len())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl IndexCache {
    pub fn new(provider: Arc<EmbedderProvider>, batch_size: usize) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
            batch_size,
        }
    }

    /// Returns the index for `locale` and this catalog snapshot, building
    /// it if the cached one was produced from a different id sequence.
    ///
    /// A failed build is not kept: the next call with the same signature
    /// retries instead of replaying a memoized error.
    pub async fn ensure_index(
        &self,
        locale: Locale,
        documents: &[DocumentDescriptor],
    ) -> Result<Arc<SemanticIndex>, IndexError> {
        let signature = Signature::of(documents);
        let build = self.current_build(locale, signature, documents);
        let result = build.clone().await;
        if result.is_err() {
            self.evict_build(locale, &build);
        }
        result
    }

    fn current_build(
        &self,
        locale: Locale,
        signature: Signature,
        documents: &[DocumentDescriptor],
    ) -> SharedBuild {
        let mut slots = self.slots.lock();

        if let Some(slot) = slots.get(&locale) {
            if slot.signature == signature {
                return slot.build.clone();
            }
            debug!(%locale, %signature, "catalog signature changed, superseding cached index");
        }

        // Text synthesis happens before the spawn so the build owns its
        // inputs and the caller's borrow of `documents` can end here.
        let inputs = DescriptorInput::from_documents(documents, locale);
        let provider = Arc::clone(&self.provider);
        let batch_size = self.batch_size;

        // Spawned so the build runs to completion even when every caller
        // stops awaiting; the result still lands in this slot for the next
        // caller.
        let task = tokio::spawn(async move {
            let Some(embedder) = provider.get().await else {
                return Err(IndexError::EmbedderUnavailable);
            };
            build_index(embedder, locale, inputs, batch_size)
                .await
                .map(Arc::new)
        });

        let build: SharedBuild = task
            .map(|joined| {
                joined.unwrap_or_else(|err| {
                    Err(IndexError::BuildTaskFailed {
                        reason: err.to_string(),
                    })
                })
            })
            .boxed()
            .shared();

        slots.insert(
            locale,
            IndexSlot {
                signature,
                build: build.clone(),
            },
        );
        build
    }

    /// Removes the slot for `locale` only if it still holds `build`; a
    /// superseding build that raced in is left untouched.
    fn evict_build(&self, locale: Locale, build: &SharedBuild) {
        let mut slots = self.slots.lock();
        if slots.get(&locale).is_some_and(|slot| slot.build.ptr_eq(build)) {
            slots.remove(&locale);
            debug!(%locale, "evicted failed index build");
        }
    }

    /// Number of locales with a cached (or in-flight) index.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Drops every cached index; the next lookups rebuild from scratch.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}
