//! Turns a search response into a `MappedCollection`.

use serde_json::Value;

use hitmap_core::{Error, Result, SearchResponse};

use crate::collection::{MappedCollection, ResponseMeta};
use crate::registry::ModelRegistry;

pub struct ResultMapper<'r, R> {
    registry: &'r ModelRegistry<R>,
}

impl<'r, R> ResultMapper<'r, R> {
    pub fn new(registry: &'r ModelRegistry<R>) -> Self {
        Self { registry }
    }

    /// Builds one record per hit, in response order.
    ///
    /// Fails on the first hit whose type is unregistered or whose factory
    /// errors; no partial collection is returned.
    pub fn map(&self, response: SearchResponse) -> Result<MappedCollection<R>> {
        let SearchResponse { took, timed_out, shards, hits, aggregations } = response;
        let (hits_meta, raw_hits) = hits.into_parts();

        let mut items = Vec::with_capacity(raw_hits.len());
        for hit in &raw_hits {
            let Some(factory) = self.registry.get(&hit.doc_type) else {
                tracing::warn!(doc_type = %hit.doc_type, id = %hit.id, "no factory registered for hit type");
                return Err(Error::UnknownType { doc_type: hit.doc_type.clone() });
            };
            let record = factory.build_from_hit(hit).map_err(|e| Error::Factory {
                doc_type: hit.doc_type.clone(),
                id: hit.id.clone(),
                reason: format!("{e:#}"),
            })?;
            items.push(record);
        }

        tracing::debug!(hits = items.len(), total = hits_meta.total, took_ms = took, "mapped search response");
        let meta = ResponseMeta { took, timed_out, shards, hits: hits_meta, aggregations: aggregations.unwrap_or_default() };
        Ok(MappedCollection::new(items, meta))
    }

    pub fn map_value(&self, value: Value) -> Result<MappedCollection<R>> {
        self.map(SearchResponse::from_value(value)?)
    }

    pub fn map_str(&self, json: &str) -> Result<MappedCollection<R>> {
        self.map(json.parse::<SearchResponse>()?)
    }
}
