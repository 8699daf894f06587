#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod document;
pub mod error;
pub mod traits;
pub mod types;

pub use document::{Document, DocumentFactory, Scored, SourceFactory};
pub use error::{Error, Result};
pub use traits::HitFactory;
pub use types::{HitsMeta, RawHit, SearchResponse, TotalRelation};
