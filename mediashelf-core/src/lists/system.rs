use super::QueryContext;
use crate::problems::problems_predicate;
use crate::query::{CompiledExpr, Field, SortDirection, SortKey, SortSpec};
use mediashelf_model::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in read-only lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemList {
    Favorites,
    Watchlist,
    Problems,
    Upcoming,
}

impl SystemList {
    pub const ALL: [SystemList; 4] = [
        SystemList::Favorites,
        SystemList::Watchlist,
        SystemList::Problems,
        SystemList::Upcoming,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SystemList::Favorites => "Favorites",
            SystemList::Watchlist => "Watchlist",
            SystemList::Problems => "Problems",
            SystemList::Upcoming => "Upcoming",
        }
    }

    pub fn icon_id(&self) -> &'static str {
        match self {
            SystemList::Favorites => "heart.fill",
            SystemList::Watchlist => "bookmark.fill",
            SystemList::Problems => "exclamationmark.triangle.fill",
            SystemList::Upcoming => "calendar",
        }
    }

    pub fn default_sort(&self) -> SortSpec {
        match self {
            SystemList::Favorites | SystemList::Problems => SortSpec::new(SortKey::Title),
            SystemList::Watchlist => SortSpec::new(SortKey::DateAdded),
            // Soonest release first
            SystemList::Upcoming => {
                SortSpec::with_direction(SortKey::ReleaseDate, SortDirection::Ascending)
            }
        }
    }

    pub fn predicate(&self, ctx: &QueryContext) -> CompiledExpr {
        match self {
            SystemList::Favorites => CompiledExpr::eq(Field::IsFavorite, true),
            SystemList::Watchlist => CompiledExpr::eq(Field::IsOnWatchlist, true),
            SystemList::Problems => problems_predicate(&ctx.config.problems),
            SystemList::Upcoming => {
                let released_later = CompiledExpr::at_least(Field::ReleaseDate, ctx.today);
                if ctx.config.upcoming.include_shows {
                    released_later
                } else {
                    CompiledExpr::and([
                        CompiledExpr::eq(Field::MediaType, MediaType::Movie),
                        released_later,
                    ])
                }
            }
        }
    }
}

impl fmt::Display for SystemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
