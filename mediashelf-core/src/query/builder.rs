use super::criteria::FilterCriteria;
use super::types::ScalarRange;
use mediashelf_model::{GenreId, MediaStatus, MediaType, ShowType, StarRating, TagId};

/// Fluent API for building filter criteria
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    criteria: FilterCriteria,
}

impl CriteriaBuilder {
    /// Create a new builder with every filter unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing criteria
    pub fn from_criteria(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    // === Type filters ===

    pub fn movies_only(mut self) -> Self {
        self.criteria.media_type = Some(MediaType::Movie);
        self
    }

    pub fn shows_only(mut self) -> Self {
        self.criteria.media_type = Some(MediaType::Show);
        self
    }

    pub fn adult(mut self, is_adult: bool) -> Self {
        self.criteria.is_adult = Some(is_adult);
        self
    }

    // === Range filters ===

    /// Filter by personal rating, in whole stars
    pub fn rating_range(mut self, min: u8, max: u8) -> Self {
        self.criteria.rating = Some(ScalarRange::new(StarRating::stars(min), StarRating::stars(max)));
        self
    }

    /// Filter by personal rating with half-star precision
    pub fn rating_between(mut self, min: StarRating, max: StarRating) -> Self {
        self.criteria.rating = Some(ScalarRange::new(min, max));
        self
    }

    /// Filter by release year, both ends inclusive
    pub fn year_range(mut self, start: i32, end: i32) -> Self {
        self.criteria.year = Some(ScalarRange::new(start, end));
        self
    }

    /// Filter shows by season count; movies are unaffected
    pub fn season_count_range(mut self, min: u32, max: u32) -> Self {
        self.criteria.season_count = Some(ScalarRange::new(min, max));
        self
    }

    // === Watch filters ===

    pub fn watched(mut self, watched: bool) -> Self {
        self.criteria.watched = Some(watched);
        self
    }

    pub fn watch_again(mut self, watch_again: bool) -> Self {
        self.criteria.watch_again = Some(watch_again);
        self
    }

    // === Set filters ===

    pub fn genre(mut self, genre: impl Into<GenreId>) -> Self {
        self.criteria.genres.insert(genre.into());
        self
    }

    pub fn genres(mut self, genres: impl IntoIterator<Item = GenreId>) -> Self {
        self.criteria.genres.extend(genres);
        self
    }

    pub fn status(mut self, status: MediaStatus) -> Self {
        self.criteria.statuses.insert(status);
        self
    }

    pub fn show_type(mut self, show_type: ShowType) -> Self {
        self.criteria.show_types.insert(show_type);
        self
    }

    pub fn tag(mut self, tag: TagId) -> Self {
        self.criteria.tags.insert(tag);
        self
    }

    /// Build the final criteria
    pub fn build(self) -> FilterCriteria {
        self.criteria
    }
}

impl FilterCriteria {
    /// Criteria matching watched movies and caught-up shows
    pub fn watched_only() -> Self {
        CriteriaBuilder::new().watched(true).build()
    }

    /// Criteria matching everything released within one year
    pub fn released_in(year: i32) -> Self {
        CriteriaBuilder::new().year_range(year, year).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_each_field_once() {
        let criteria = CriteriaBuilder::new()
            .movies_only()
            .rating_range(5, 3)
            .genre(GenreId(28))
            .genre(GenreId(35))
            .genre(GenreId(28))
            .watched(true)
            .build();

        assert_eq!(criteria.media_type, Some(MediaType::Movie));
        assert_eq!(
            criteria.rating,
            Some(ScalarRange::new(StarRating::stars(3), StarRating::stars(5)))
        );
        assert_eq!(criteria.genres.len(), 2);
        assert_eq!(criteria.active_count(), 4);
    }

    #[test]
    fn from_criteria_keeps_existing_filters() {
        let base = FilterCriteria::released_in(1999);
        let criteria = CriteriaBuilder::from_criteria(base.clone()).shows_only().build();
        assert_eq!(criteria.year, base.year);
        assert_eq!(criteria.media_type, Some(MediaType::Show));
    }
}
