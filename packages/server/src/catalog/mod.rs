//! Catalog entries and the media upload workflow that keeps them in step
//! with their image directories.

mod error;
pub mod memory;
mod service;
pub mod store;
mod types;

pub use error::CatalogError;
pub use memory::MemoryCatalogStore;
pub use service::CatalogService;
pub use store::{CatalogStore, SeaOrmCatalogStore};
pub use types::{
    Comic, ComicDraft, ComicPage, ComicPatch, ComicUpdate, ListQuery, collect_labels,
};
