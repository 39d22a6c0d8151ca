//! Tests for sort specifications and the multi-key comparator

use super::*;
use chrono::{NaiveDate, TimeZone, Utc};
use mediashelf_model::{StarRating, WatchState};

fn movie(title: &str, year: Option<i32>, rating: Option<u8>) -> MediaRecord {
    let mut record = MediaRecord::movie(title);
    record.release_date = year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1));
    record.personal_rating = rating.map(StarRating::stars);
    record
}

fn titles(records: &[MediaRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn default_directions() {
    assert_eq!(SortKey::Title.default_direction(), SortDirection::Ascending);
    for key in [SortKey::ReleaseDate, SortKey::Rating, SortKey::WatchState, SortKey::DateAdded] {
        assert!(key.default_direction().is_descending(), "{key}");
    }
}

#[test]
fn spec_expands_with_tie_breaker() {
    let order = SortSpec::new(SortKey::Rating).to_order();
    assert_eq!(
        order.descriptors(),
        &[
            SortDescriptor::new(SortKey::Rating, SortDirection::Descending),
            SortDescriptor::new(SortKey::Title, SortDirection::Ascending),
        ]
    );

    let order = SortSpec::new(SortKey::Title).to_order();
    assert_eq!(
        order.descriptors()[1],
        SortDescriptor::new(SortKey::ReleaseDate, SortDirection::Descending)
    );
    assert_eq!(order.to_string(), "title ASC, release_date DESC");
}

#[test]
fn rating_ties_break_by_title() {
    let mut records = vec![
        movie("Zodiac", None, Some(4)),
        movie("unrated", None, None),
        movie("Alien", None, Some(4)),
        movie("Memento", None, Some(5)),
    ];
    SortSpec::new(SortKey::Rating).to_order().sort(&mut records);
    assert_eq!(titles(&records), ["Memento", "Alien", "Zodiac", "unrated"]);

    SortSpec::with_direction(SortKey::Rating, SortDirection::Ascending)
        .to_order()
        .sort(&mut records);
    assert_eq!(titles(&records), ["Alien", "Zodiac", "Memento", "unrated"]);
}

#[test]
fn title_ties_break_by_newest_release() {
    let mut records = vec![
        movie("Dune", Some(1984), None),
        movie("dune", Some(2021), None),
        movie("Dune", None, None),
    ];
    SortSpec::new(SortKey::Title).to_order().sort(&mut records);
    let years: Vec<_> = records.iter().map(|r| r.release_year()).collect();
    assert_eq!(years, [Some(2021), Some(1984), None]);
}

#[test]
fn full_ties_fall_back_to_id() {
    let a = movie("Same", Some(2000), Some(3));
    let mut b = a.clone();
    b.id = mediashelf_model::MediaId::new();
    let order = SortOrder::default();
    assert_eq!(order.compare(&a, &b), a.id.cmp(&b.id));
    assert_eq!(order.compare(&a, &a), Ordering::Equal);
}

#[test]
fn watch_state_orders_progress() {
    let mut early = MediaRecord::show("Early");
    early.set_watch_state(Some(WatchState::construct(1, Some(4))));
    let mut finished_s1 = MediaRecord::show("Finished");
    finished_s1.set_watch_state(Some(WatchState::construct(1, None)));
    let mut later = MediaRecord::show("Later");
    later.set_watch_state(Some(WatchState::construct(2, Some(1))));
    let unknown = MediaRecord::show("Unknown");

    let mut records = vec![unknown, early, later, finished_s1];
    SortSpec::new(SortKey::WatchState).to_order().sort(&mut records);
    assert_eq!(titles(&records), ["Later", "Finished", "Early", "Unknown"]);
}

#[test]
fn date_added_defaults_to_newest_first() {
    let mut old = movie("Old", None, None);
    old.created_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut new = movie("New", None, None);
    new.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut records = vec![old, new];
    SortSpec::new(SortKey::DateAdded).to_order().sort(&mut records);
    assert_eq!(titles(&records), ["New", "Old"]);
}

#[test]
fn sort_key_ids_round_trip() {
    for key in SortKey::ALL {
        assert_eq!(key.id().parse::<SortKey>().unwrap(), key);
    }
    assert!("popularity".parse::<SortKey>().is_err());
}
