//! Response shapes consumed by the mapper.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub type JsonMap = Map<String, Value>;

const REQUIRED_FIELDS: [&str; 4] = ["took", "timed_out", "_shards", "hits"];

/// A parsed search response, as returned by the engine for one query.
///
/// `took` is in milliseconds. `aggregations` is `None` when the request
/// asked for none; the mapped collection turns that into an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub took: u64,
    pub timed_out: bool,
    #[serde(rename = "_shards")]
    pub shards: JsonMap,
    pub hits: HitsEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<JsonMap>,
}

impl SearchResponse {
    /// Validate the required top-level fields, then decode.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::MalformedResponse("response is not a JSON object".into()))?;
        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(Error::MalformedResponse(format!("missing required field '{field}'")));
            }
        }
        match object.get("hits").and_then(|h| h.get("hits")) {
            Some(Value::Array(_)) => {}
            Some(_) => return Err(Error::MalformedResponse("'hits.hits' must be an array".into())),
            None => return Err(Error::MalformedResponse("missing required field 'hits.hits'".into())),
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn took_duration(&self) -> Duration {
        Duration::from_millis(self.took)
    }
}

impl FromStr for SearchResponse {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

/// The `hits` object: total, max score and the hit list itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<HitsTotal>,
    #[serde(default)]
    pub max_score: Option<f64>,
    pub hits: Vec<RawHit>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl HitsEnvelope {
    /// Split off the hit list, keeping everything else as metadata.
    ///
    /// When the engine skipped total tracking, the returned hit count is
    /// reported as a lower bound.
    pub fn into_parts(self) -> (HitsMeta, Vec<RawHit>) {
        let (total, relation) = match &self.total {
            Some(HitsTotal::Count(n)) => (*n, TotalRelation::Eq),
            Some(HitsTotal::Object { value, relation }) => (*value, *relation),
            None => (self.hits.len() as u64, TotalRelation::Gte),
        };
        let meta = HitsMeta {
            total,
            total_relation: relation,
            raw_total: self.total,
            max_score: self.max_score,
            extra: self.extra,
        };
        (meta, self.hits)
    }
}

/// Legacy engines report a bare integer, newer ones `{value, relation}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
    Count(u64),
    Object { value: u64, relation: TotalRelation },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRelation {
    #[default]
    Eq,
    Gte,
}

/// Hits metadata retained after the hit list has been mapped.
///
/// `total` and `total_relation` are the normalized count. Serializing
/// writes `total` back in the form the engine sent (`raw_total`), and
/// omits it when the engine sent none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitsMeta {
    #[serde(skip)]
    pub total: u64,
    #[serde(skip)]
    pub total_relation: TotalRelation,
    #[serde(rename = "total", skip_serializing_if = "Option::is_none")]
    pub raw_total: Option<HitsTotal>,
    pub max_score: Option<f64>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// One matched document.
///
/// Keys beyond the ones named here (`highlight`, `sort`, `fields`, ...)
/// are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(rename = "_source", default)]
    pub source: JsonMap,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_total_is_exact() {
        let env: HitsEnvelope = serde_json::from_value(json!({"total": 7, "max_score": null, "hits": []})).unwrap();
        let (meta, hits) = env.into_parts();
        assert_eq!(meta.total, 7);
        assert_eq!(meta.total_relation, TotalRelation::Eq);
        assert_eq!(meta.max_score, None);
        assert!(hits.is_empty());
    }

    #[test]
    fn missing_total_falls_back_to_lower_bound() {
        let env: HitsEnvelope = serde_json::from_value(json!({
            "hits": [{"_type": "post", "_id": "1"}]
        }))
        .unwrap();
        let (meta, _) = env.into_parts();
        assert_eq!(meta.total, 1);
        assert_eq!(meta.total_relation, TotalRelation::Gte);
    }

    #[test]
    fn hit_keeps_unknown_keys() {
        let hit: RawHit = serde_json::from_value(json!({
            "_type": "post", "_id": "9", "_score": 0.5,
            "highlight": {"title": ["<em>x</em>"]}
        }))
        .unwrap();
        assert!(hit.source.is_empty());
        assert!(hit.extra.contains_key("highlight"));
        assert!(!hit.extra.contains_key("_id"));
    }

    #[test]
    fn meta_serializes_total_as_received() {
        let env: HitsEnvelope = serde_json::from_value(json!({
            "total": {"value": 10000, "relation": "gte"},
            "max_score": 2.5,
            "hits": []
        }))
        .unwrap();
        let (meta, _) = env.into_parts();
        assert_eq!(meta.total, 10000);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value, json!({"total": {"value": 10000, "relation": "gte"}, "max_score": 2.5}));

        let legacy: HitsEnvelope = serde_json::from_value(json!({"total": 3, "max_score": null, "hits": []})).unwrap();
        let value = serde_json::to_value(&legacy.into_parts().0).unwrap();
        assert_eq!(value, json!({"total": 3, "max_score": null}));
    }
}
