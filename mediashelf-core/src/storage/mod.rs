//! Storage port consumed by list resolution.

pub mod memory;

pub use memory::InMemoryMediaStore;

use crate::{
    error::Result,
    query::{CompiledExpr, SortOrder},
};
use async_trait::async_trait;
use mediashelf_model::MediaRecord;

/// Backend that evaluates a compiled expression and returns ordered records.
///
/// Implementations must honour the evaluation rules of
/// [`CompiledExpr::matches`] and apply `order` in full, including its final
/// tie-break by id.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn fetch(&self, expr: &CompiledExpr, order: &SortOrder) -> Result<Vec<MediaRecord>>;
}
