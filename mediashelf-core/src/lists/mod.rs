//! Media lists and their resolution into storage queries.
//!
//! Every list kind resolves to the same [`ResolvedList`]: a compiled filter
//! plus the sort order handed to storage. Resolution performs no I/O;
//! [`MediaList::fetch`] is the convenience path that resolves, queries a
//! [`MediaStore`] and applies the post-fetch refinement.

pub mod custom;
pub mod preferences;
pub mod system;

pub use custom::{DynamicList, MembershipList};
pub use preferences::{SortPreference, SortPreferences};
pub use system::SystemList;

use crate::config::ShelfConfig;
use crate::query::{CompiledExpr, CompiledFilter, PostFetchFilter, PredicateCompiler, SortOrder, SortSpec};
use crate::storage::MediaStore;
use chrono::{NaiveDate, Utc};
use mediashelf_model::{ListId, MediaRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs shared by every resolution: the reference date and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    pub today: NaiveDate,
    pub config: ShelfConfig,
}

impl QueryContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            config: ShelfConfig::default(),
        }
    }

    pub fn with_config(today: NaiveDate, config: ShelfConfig) -> Self {
        Self { today, config }
    }

    /// Context for the current UTC date
    pub fn current(config: ShelfConfig) -> Self {
        Self::with_config(Utc::now().date_naive(), config)
    }

    pub fn compiler(&self) -> PredicateCompiler {
        PredicateCompiler::with_config(self.today, &self.config)
    }
}

/// A list ready to be handed to storage
#[derive(Debug, Clone)]
pub struct ResolvedList {
    pub filter: CompiledFilter,
    pub order: SortOrder,
}

impl ResolvedList {
    pub fn expr(&self) -> &CompiledExpr {
        &self.filter.expr
    }

    pub fn post_fetch(&self) -> Option<&PostFetchFilter> {
        self.filter.post_fetch.as_ref()
    }

    /// Applies the post-fetch filter to storage output, keeping its order.
    pub fn refine(&self, records: Vec<MediaRecord>) -> Vec<MediaRecord> {
        self.filter.refine(records)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaList {
    Fixed { list: SystemList },
    Dynamic(DynamicList),
    Membership(MembershipList),
}

impl MediaList {
    pub fn fixed(list: SystemList) -> Self {
        MediaList::Fixed { list }
    }

    /// Identity for user-owned lists; built-in lists have none
    pub fn id(&self) -> Option<ListId> {
        match self {
            MediaList::Fixed { .. } => None,
            MediaList::Dynamic(list) => Some(list.id),
            MediaList::Membership(list) => Some(list.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MediaList::Fixed { list } => list.name(),
            MediaList::Dynamic(list) => &list.name,
            MediaList::Membership(list) => &list.name,
        }
    }

    pub fn icon_id(&self) -> &str {
        match self {
            MediaList::Fixed { list } => list.icon_id(),
            MediaList::Dynamic(list) => &list.icon_id,
            MediaList::Membership(list) => &list.icon_id,
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, MediaList::Fixed { .. })
    }

    /// Sort used when the caller does not pass one
    pub fn default_sort(&self) -> SortSpec {
        match self {
            MediaList::Fixed { list } => list.default_sort(),
            MediaList::Dynamic(list) => list.sort.spec(),
            MediaList::Membership(list) => list.sort.spec(),
        }
    }

    /// Sort from `preferences`, falling back to the list's own default
    pub fn preferred_sort(&self, preferences: &SortPreferences) -> SortSpec {
        match self.id() {
            Some(id) => preferences.spec_for(id, self.default_sort()),
            None => self.default_sort(),
        }
    }

    pub fn resolve(&self, ctx: &QueryContext, sort: Option<SortSpec>) -> ResolvedList {
        let filter = match self {
            MediaList::Fixed { list } => CompiledFilter::declarative(list.predicate(ctx)),
            MediaList::Dynamic(list) => list.compile(&ctx.compiler()),
            MediaList::Membership(list) => CompiledFilter::declarative(list.predicate()),
        };
        let order = sort.unwrap_or_else(|| self.default_sort()).to_order();
        debug!(
            list = self.name(),
            expr = %filter.expr,
            order = %order,
            post_fetch = filter.post_fetch.is_some(),
            "resolved media list"
        );
        ResolvedList { filter, order }
    }

    /// Resolves the list, fetches from `store` and refines the result.
    pub async fn fetch<S>(
        &self,
        store: &S,
        ctx: &QueryContext,
        sort: Option<SortSpec>,
    ) -> crate::Result<Vec<MediaRecord>>
    where
        S: MediaStore + ?Sized,
    {
        let resolved = self.resolve(ctx, sort);
        let records = store.fetch(resolved.expr(), &resolved.order).await?;
        Ok(resolved.refine(records))
    }
}

impl From<SystemList> for MediaList {
    fn from(list: SystemList) -> Self {
        MediaList::fixed(list)
    }
}

impl From<DynamicList> for MediaList {
    fn from(list: DynamicList) -> Self {
        MediaList::Dynamic(list)
    }
}

impl From<MembershipList> for MediaList {
    fn from(list: MembershipList) -> Self {
        MediaList::Membership(list)
    }
}
