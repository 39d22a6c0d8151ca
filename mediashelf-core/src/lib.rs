//! # MediaShelf Core
//!
//! Filtering, list resolution and sorting for a personal movie and show
//! library.
//!
//! ## Overview
//!
//! - **Filter criteria**: sparse, optional conditions over the collection
//! - **Predicate compiler**: turns criteria into a declarative [`CompiledExpr`]
//!   plus an optional in-memory post-fetch refinement
//! - **Lists**: built-in, saved-filter and curated lists sharing one `resolve`
//! - **Sorting**: keys with default directions and per-key tie-breakers
//! - **Storage port**: async [`MediaStore`] trait with an in-memory backend
//!
//! ## Feature Flags
//!
//! - `database`: Renders compiled expressions into Postgres queries (SQLx)
//!
//! ## Examples
//!
//! ```no_run
//! use mediashelf_core::{
//!     lists::{MediaList, QueryContext, SystemList},
//!     storage::InMemoryMediaStore,
//! };
//!
//! async fn favorites(store: &InMemoryMediaStore) -> mediashelf_core::Result<usize> {
//!     let ctx = QueryContext::current(Default::default());
//!     let records = MediaList::fixed(SystemList::Favorites)
//!         .fetch(store, &ctx, None)
//!         .await?;
//!     Ok(records.len())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Configuration loading
pub mod config;

/// Error types
pub mod error;

/// Built-in, saved-filter and curated lists
pub mod lists;

/// Missing-information classification
pub mod problems;

/// Criteria, predicate compilation and sorting
pub mod query;

/// Postgres rendering of compiled expressions
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod sql;

/// Storage port and in-memory backend
pub mod storage;

pub use config::ShelfConfig;
pub use error::{Result, ShelfError};
pub use lists::{MediaList, QueryContext, ResolvedList};
pub use mediashelf_model as model;
pub use query::{CompiledExpr, CompiledFilter, FilterCriteria, PredicateCompiler};
pub use storage::{InMemoryMediaStore, MediaStore};
