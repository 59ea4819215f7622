//! Batch windowing for resumable per-item processing.
//!
//! A caller submits the full item list together with a `batch_index` and a
//! `batch_size`; only the window `[start, end)` is processed during one request
//! and the response carries the cursor needed to request the next window.

use std::fmt::Display;
use std::future::Future;
use std::ops::Range;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error message recorded for blank text items. The external operation is never
/// invoked for these.
pub const EMPTY_TEXT_ERROR: &str = "Empty text";

/// Invalid batch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("batch_size must be greater than 0")]
    ZeroBatchSize,

    #[error("Parts array cannot be empty")]
    NoItems,
}

/// Geometry of one batch window, serialized into every batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchBounds {
    pub batch_index: usize,
    pub batch_size: usize,
    pub batch_start: usize,
    pub batch_end: usize,
    pub total_parts: usize,
    pub has_more: bool,
    pub next_batch_index: Option<usize>,
}

impl BatchBounds {
    /// Compute the window for `total` items.
    ///
    /// `start` is clamped to `total`, so an index past the last window yields an
    /// empty window with `has_more == false` instead of an inverted range.
    pub fn new(total: usize, batch_index: usize, batch_size: usize) -> Result<Self, BatchError> {
        if batch_size == 0 {
            return Err(BatchError::ZeroBatchSize);
        }

        let start = batch_index.saturating_mul(batch_size).min(total);
        let end = start.saturating_add(batch_size).min(total);
        let has_more = end < total;

        Ok(Self {
            batch_index,
            batch_size,
            batch_start: start,
            batch_end: end,
            total_parts: total,
            has_more,
            next_batch_index: has_more.then(|| batch_index + 1),
        })
    }

    /// Absolute item indices covered by this window.
    pub fn range(&self) -> Range<usize> {
        self.batch_start..self.batch_end
    }

    /// Number of items inside the window.
    pub fn len(&self) -> usize {
        self.batch_end - self.batch_start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A window over a borrowed item list.
#[derive(Debug, Clone, Copy)]
pub struct BatchWindow<'a, T> {
    items: &'a [T],
    bounds: BatchBounds,
}

impl<'a, T> BatchWindow<'a, T> {
    /// Create a window over `items`. Empty item lists are rejected.
    pub fn new(items: &'a [T], batch_index: usize, batch_size: usize) -> Result<Self, BatchError> {
        if items.is_empty() {
            return Err(BatchError::NoItems);
        }
        let bounds = BatchBounds::new(items.len(), batch_index, batch_size)?;
        Ok(Self { items, bounds })
    }

    pub fn bounds(&self) -> BatchBounds {
        self.bounds
    }

    /// Items inside the window, in order.
    pub fn items(&self) -> &'a [T] {
        &self.items[self.bounds.range()]
    }

    /// Iterate `(absolute_index, item)` pairs inside the window.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let start = self.bounds.batch_start;
        self.items().iter().enumerate().map(move |(i, item)| (start + i, item))
    }

    /// Apply `op` to every item in order, isolating failures.
    ///
    /// A failing item is recorded as [`PartResult::Failed`] in its own slot and the
    /// remaining items are still processed. The output has exactly one entry per
    /// window item.
    pub async fn process_isolated<R, E, F, Fut>(&self, mut op: F) -> Vec<PartResult<R>>
    where
        F: FnMut(usize, &'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let mut results = Vec::with_capacity(self.bounds.len());
        for (index, item) in self.enumerate() {
            let result = match op(index, item).await {
                Ok(value) => PartResult::Ready(value),
                Err(e) => PartResult::failed(e.to_string()),
            };
            results.push(result);
        }
        results
    }

    /// Apply `op` to every item in order, stopping at the first failure.
    ///
    /// On failure the absolute index of the failing item is returned along with
    /// its error and no partial output is kept.
    pub async fn process_strict<R, E, F, Fut>(&self, mut op: F) -> Result<Vec<R>, (usize, E)>
    where
        F: FnMut(usize, &'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let mut results = Vec::with_capacity(self.bounds.len());
        for (index, item) in self.enumerate() {
            let value = op(index, item).await.map_err(|e| (index, e))?;
            results.push(value);
        }
        Ok(results)
    }
}

/// Item types that can represent a failed slot in a batch response.
pub trait FailedItem {
    /// The placeholder emitted for a failed slot (null media, zeroed metadata).
    fn failed(error: String) -> Self;
}

/// Outcome of processing a single batch item.
#[derive(Debug, Clone, PartialEq)]
pub enum PartResult<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> PartResult<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Result for a blank text item.
    pub fn empty_text() -> Self {
        Self::failed(EMPTY_TEXT_ERROR)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed { error } => Some(error),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

impl<T> Serialize for PartResult<T>
where
    T: Serialize + FailedItem,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ready(value) => value.serialize(serializer),
            Self::Failed { error } => T::failed(error.clone()).serialize(serializer),
        }
    }
}

/// Items that are returned under a kind-specific key in a batch response
/// (`audio_batch`, `image_batch`, ...).
pub trait BatchKind {
    const FIELD: &'static str;
}

/// Uniform batch response: the window's results under `T::FIELD` followed by
/// the window geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEnvelope<T> {
    pub items: Vec<PartResult<T>>,
    pub bounds: BatchBounds,
}

impl<T> BatchEnvelope<T> {
    pub fn new(items: Vec<PartResult<T>>, bounds: BatchBounds) -> Self {
        Self { items, bounds }
    }

    /// Number of failed slots in the window.
    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_ready()).count()
    }
}

impl<T> Serialize for BatchEnvelope<T>
where
    T: Serialize + FailedItem + BatchKind,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let b = &self.bounds;
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry(T::FIELD, &self.items)?;
        map.serialize_entry("batch_index", &b.batch_index)?;
        map.serialize_entry("batch_size", &b.batch_size)?;
        map.serialize_entry("batch_start", &b.batch_start)?;
        map.serialize_entry("batch_end", &b.batch_end)?;
        map.serialize_entry("total_parts", &b.total_parts)?;
        map.serialize_entry("has_more", &b.has_more)?;
        map.serialize_entry("next_batch_index", &b.next_batch_index)?;
        map.end()
    }
}
