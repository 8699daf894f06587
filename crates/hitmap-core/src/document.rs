//! Schemaless record hydrated straight from a hit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::HitFactory;
use crate::types::RawHit;

/// A hit's `_source` attributes plus its identity and scoring data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_type: String,
    pub id: String,
    pub score: Option<f64>,
    pub version: Option<u64>,
    pub attributes: Map<String, Value>,
}

impl Document {
    pub fn from_hit(hit: &RawHit) -> Self {
        Self {
            doc_type: hit.doc_type.clone(),
            id: hit.id.clone(),
            score: hit.score,
            version: hit.version,
            attributes: hit.source.clone(),
        }
    }

    /// Factory that hydrates documents of the given type name.
    pub fn factory(doc_type: impl Into<String>) -> DocumentFactory {
        DocumentFactory { doc_type: doc_type.into() }
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentFactory {
    doc_type: String,
}

impl HitFactory<Document> for DocumentFactory {
    fn build(&self, id: &str, source: &Map<String, Value>, score: Option<f64>) -> anyhow::Result<Document> {
        Ok(Document { doc_type: self.doc_type.clone(), id: id.to_string(), score, version: None, attributes: source.clone() })
    }

    fn build_from_hit(&self, hit: &RawHit) -> anyhow::Result<Document> {
        Ok(Document::from_hit(hit))
    }
}

/// A typed record decoded from `_source`, with the hit's id and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    pub id: String,
    pub score: Option<f64>,
    pub record: T,
}

/// Decodes `_source` into `T` through serde.
pub struct SourceFactory<T> {
    _record: std::marker::PhantomData<fn() -> T>,
}

impl<T> SourceFactory<T> {
    pub fn new() -> Self {
        Self { _record: std::marker::PhantomData }
    }
}

impl<T> Default for SourceFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HitFactory<Scored<T>> for SourceFactory<T>
where
    T: serde::de::DeserializeOwned,
{
    fn build(&self, id: &str, source: &Map<String, Value>, score: Option<f64>) -> anyhow::Result<Scored<T>> {
        let record: T = serde_json::from_value(Value::Object(source.clone()))?;
        Ok(Scored { id: id.to_string(), score, record })
    }
}
