pub use super::builder::CriteriaBuilder;
pub use super::compiler::{CompiledFilter, PostFetchFilter, PredicateCompiler};
pub use super::criteria::FilterCriteria;
pub use super::expr::{CompiledExpr, Field, Value};
pub use super::sorting::{SortDirection, SortKey, SortOrder, SortSpec};
pub use super::types::ScalarRange;
