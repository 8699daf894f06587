//! Mapped hits plus the response metadata they came with.

use serde::Serialize;
use serde_json::Value;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use hitmap_core::types::JsonMap;
use hitmap_core::{Error, HitsMeta, Result, SearchResponse, TotalRelation};

use crate::mapper::ResultMapper;
use crate::registry::ModelRegistry;

/// Response metadata, shared between a collection and its chunks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub took: u64,
    pub timed_out: bool,
    pub shards: JsonMap,
    pub hits: HitsMeta,
    pub aggregations: JsonMap,
}

/// Ordered typed records, one per hit, in response order.
///
/// `offset` is the position of the first item within the collection this
/// one was chunked from; it is 0 for freshly mapped collections.
#[derive(Debug, Clone)]
pub struct MappedCollection<R> {
    items: Vec<R>,
    meta: Arc<ResponseMeta>,
    offset: usize,
}

impl<R> MappedCollection<R> {
    pub fn new(items: Vec<R>, meta: ResponseMeta) -> Self {
        Self { items, meta: Arc::new(meta), offset: 0 }
    }

    pub fn from_response(response: SearchResponse, registry: &ModelRegistry<R>) -> Result<Self> {
        ResultMapper::new(registry).map(response)
    }

    pub fn total_hits(&self) -> u64 {
        self.meta.hits.total
    }

    pub fn total_relation(&self) -> TotalRelation {
        self.meta.hits.total_relation
    }

    /// Absent when the query did not ask for scoring.
    pub fn max_score(&self) -> Result<f64> {
        self.meta.hits.max_score.ok_or_else(|| Error::MissingField("hits.max_score".into()))
    }

    pub fn shards(&self) -> &JsonMap {
        &self.meta.shards
    }

    pub fn took(&self) -> Duration {
        Duration::from_millis(self.meta.took)
    }

    pub fn timed_out(&self) -> bool {
        self.meta.timed_out
    }

    pub fn aggregations(&self) -> &JsonMap {
        &self.meta.aggregations
    }

    pub fn aggregation(&self, name: &str) -> Option<&Value> {
        self.meta.aggregations.get(name)
    }

    /// The `hits` envelope minus the hit list.
    pub fn hits_meta(&self) -> &HitsMeta {
        &self.meta.hits
    }

    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&R> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    /// Items paired with their position in the root collection.
    pub fn iter_positioned(&self) -> impl Iterator<Item = (usize, &R)> + '_ {
        self.items.iter().enumerate().map(move |(i, item)| (self.offset + i, item))
    }

    pub fn as_slice(&self) -> &[R] {
        &self.items
    }

    pub fn slice(&self, range: Range<usize>) -> Option<&[R]> {
        self.items.get(range)
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    /// Splits into consecutive groups of at most `size` items.
    ///
    /// Every chunk shares this collection's metadata. With
    /// `preserve_positions`, a chunk's offset is where it started in the root
    /// collection; otherwise chunk positions restart at 0.
    pub fn into_chunks(self, size: usize, preserve_positions: bool) -> Result<Vec<Self>> {
        check_chunk_size(size)?;
        let Self { items, meta, offset } = self;
        let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
        let mut start = 0;
        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            let group: Vec<R> = items.by_ref().take(size).collect();
            let chunk_offset = if preserve_positions { offset + start } else { 0 };
            start += group.len();
            chunks.push(Self { items: group, meta: Arc::clone(&meta), offset: chunk_offset });
        }
        tracing::debug!(size, chunks = chunks.len(), "chunked collection");
        Ok(chunks)
    }
}

impl<R: Clone> MappedCollection<R> {
    pub fn chunk(&self, size: usize, preserve_positions: bool) -> Result<Vec<Self>> {
        check_chunk_size(size)?;
        let chunks = self
            .items
            .chunks(size)
            .enumerate()
            .map(|(i, group)| Self {
                items: group.to_vec(),
                meta: Arc::clone(&self.meta),
                offset: if preserve_positions { self.offset + i * size } else { 0 },
            })
            .collect::<Vec<_>>();
        tracing::debug!(size, chunks = chunks.len(), "chunked collection");
        Ok(chunks)
    }
}

fn check_chunk_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidArgument("chunk size must be greater than zero".into()));
    }
    Ok(())
}

impl<R> IntoIterator for MappedCollection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a MappedCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
