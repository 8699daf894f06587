use serde_json::{Map, Value};

use crate::types::RawHit;

/// Builds one typed record from one hit.
///
/// Closures `Fn(&str, &Map<String, Value>, Option<f64>) -> anyhow::Result<R>`
/// implement this directly. Factories that need the index, version or
/// highlight data override `build_from_hit`.
pub trait HitFactory<R>: Send + Sync {
    fn build(&self, id: &str, source: &Map<String, Value>, score: Option<f64>) -> anyhow::Result<R>;

    fn build_from_hit(&self, hit: &RawHit) -> anyhow::Result<R> {
        self.build(&hit.id, &hit.source, hit.score)
    }
}

impl<R, F> HitFactory<R> for F
where
    F: Fn(&str, &Map<String, Value>, Option<f64>) -> anyhow::Result<R> + Send + Sync,
{
    fn build(&self, id: &str, source: &Map<String, Value>, score: Option<f64>) -> anyhow::Result<R> {
        self(id, source, score)
    }
}
