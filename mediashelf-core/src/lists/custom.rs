use super::preferences::SortPreference;
use crate::query::{CompiledExpr, CompiledFilter, Field, FilterCriteria, PredicateCompiler};
use mediashelf_model::{ListId, MediaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Saved filter that re-evaluates against the live collection.
///
/// The list owns its criteria; dropping the list drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicList {
    pub id: ListId,
    pub name: String,
    pub icon_id: String,
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub sort: SortPreference,
}

impl DynamicList {
    pub fn new(name: impl Into<String>, icon_id: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            name: name.into(),
            icon_id: icon_id.into(),
            criteria: FilterCriteria::new(),
            sort: SortPreference::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    /// Compiles the current criteria. Nothing is cached between calls.
    pub fn compile(&self, compiler: &PredicateCompiler) -> CompiledFilter {
        compiler.compile(&self.criteria)
    }
}

/// Explicitly curated set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipList {
    pub id: ListId,
    pub name: String,
    pub icon_id: String,
    pub members: BTreeSet<MediaId>,
    #[serde(default)]
    pub sort: SortPreference,
}

impl MembershipList {
    pub fn new(name: impl Into<String>, icon_id: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            name: name.into(),
            icon_id: icon_id.into(),
            members: BTreeSet::new(),
            sort: SortPreference::default(),
        }
    }

    /// Returns false when the record was already a member.
    pub fn add(&mut self, id: MediaId) -> bool {
        self.members.insert(id)
    }

    pub fn remove(&mut self, id: &MediaId) -> bool {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &MediaId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn predicate(&self) -> CompiledExpr {
        if self.members.is_empty() {
            return CompiledExpr::FALSE;
        }
        CompiledExpr::in_set(Field::Id, self.members.iter().copied())
    }
}
