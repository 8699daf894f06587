//! hitmap-results
//!
//! Maps search responses onto typed records through a `ModelRegistry`, and
//! offers pagination and chunking over the mapped collection.
pub mod collection;
pub mod mapper;
pub mod paginator;
pub mod registry;

pub use collection::{MappedCollection, ResponseMeta};
pub use mapper::ResultMapper;
pub use paginator::{PageLink, PageView};
pub use registry::ModelRegistry;
