//! Filter criteria, predicate compilation and sorting.

pub mod builder;
pub mod compiler;
pub mod criteria;
pub mod eval;
pub mod expr;
pub mod prelude;
pub mod sorting;
pub mod types;

pub use builder::CriteriaBuilder;
pub use compiler::{CompiledFilter, PostFetchFilter, PredicateCompiler};
pub use criteria::FilterCriteria;
pub use eval::{FieldValue, field_value};
pub use expr::{CompiledExpr, Field, Value};
pub use sorting::{SortDescriptor, SortDirection, SortKey, SortOrder, SortSpec};
pub use types::ScalarRange;
