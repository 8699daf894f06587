use std::collections::HashMap;
use std::fmt;

use hitmap_core::{Document, HitFactory, Scored, SourceFactory};
use serde_json::{Map, Value};

/// Maps a hit's `_type` to the factory that builds its record.
pub struct ModelRegistry<R> {
    factories: HashMap<String, Box<dyn HitFactory<R>>>,
}

impl<R> ModelRegistry<R> {
    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    /// Registers `factory` for `doc_type`, replacing any earlier one.
    pub fn register<F>(&mut self, doc_type: impl Into<String>, factory: F) -> &mut Self
    where
        F: HitFactory<R> + 'static,
    {
        self.factories.insert(doc_type.into(), Box::new(factory));
        self
    }

    pub fn register_fn<F>(&mut self, doc_type: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&str, &Map<String, Value>, Option<f64>) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.register(doc_type, build)
    }

    pub fn with<F>(mut self, doc_type: impl Into<String>, factory: F) -> Self
    where
        F: HitFactory<R> + 'static,
    {
        self.register(doc_type, factory);
        self
    }

    pub fn get(&self, doc_type: &str) -> Option<&dyn HitFactory<R>> {
        self.factories.get(doc_type).map(|f| f.as_ref())
    }

    pub fn contains(&self, doc_type: &str) -> bool {
        self.factories.contains_key(doc_type)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<R> Default for ModelRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for ModelRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry").field("types", &self.type_names()).finish()
    }
}

impl ModelRegistry<Document> {
    /// Every name in `doc_types` hydrates into a schemaless `Document`.
    pub fn documents<I, S>(doc_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for doc_type in doc_types {
            let doc_type = doc_type.into();
            registry.register(doc_type.clone(), Document::factory(doc_type));
        }
        registry
    }
}

impl<T> ModelRegistry<Scored<T>>
where
    T: serde::de::DeserializeOwned + 'static,
{
    /// Decodes `_source` of `doc_type` hits into `T`.
    pub fn register_source(&mut self, doc_type: impl Into<String>) -> &mut Self {
        self.register(doc_type, SourceFactory::<T>::new())
    }
}
