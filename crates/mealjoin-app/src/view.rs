// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Filter/sort pipeline shared by every list screen.
//!
//! A derived view is a pure function of a source slice and a [`FilterState`]:
//! category equality first, then case-insensitive substring search over the
//! item's searchable fields, then an optional stable sort.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::{CollectionKind, CollectionSnapshot, Record, RecordId, SortDirection};

pub const ALL_FILTER: &str = "all";

/// A closed set of values addressable by a stable string name.
pub trait FilterValue: Copy + Eq + Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.as_str() == raw)
    }
}

/// Category type for collections that have no categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCategory {}

impl FilterValue for NoCategory {
    const ALL: &'static [Self] = &[];

    fn as_str(self) -> &'static str {
        match self {}
    }
}

pub trait ListItem: Clone + Debug {
    type Id: Copy + Eq + Debug + Into<RecordId>;
    type Category: FilterValue;
    type SortKey: FilterValue;

    const COLLECTION: CollectionKind;

    fn id(&self) -> Self::Id;

    /// Fields matched by the search term.
    fn search_fields(&self) -> Vec<&str>;

    fn category(&self) -> Option<Self::Category>;

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering;

    /// Short human label used in prompts ("Kevin Asante", "Italian Pasta Night").
    fn display_label(&self) -> &str;

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>>;

    fn from_record(record: Record) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter<C> {
    All,
    Only(C),
}

impl<C> Default for CategoryFilter<C> {
    fn default() -> Self {
        Self::All
    }
}

impl<C: FilterValue> CategoryFilter<C> {
    /// Parses a raw filter value. Anything that is neither `all` nor a known
    /// category falls back to `All`.
    pub fn parse_or_all(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_FILTER {
            return Self::All;
        }
        match C::parse(trimmed) {
            Some(value) => Self::Only(value),
            None => {
                tracing::warn!(value = trimmed, "unknown category filter; showing all");
                Self::All
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL_FILTER,
            Self::Only(value) => value.as_str(),
        }
    }

    pub fn admits(self, value: Option<C>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted),
        }
    }

    /// Cycles `all -> first -> ... -> last -> all`.
    pub fn next(self) -> Self {
        let values = C::ALL;
        match self {
            Self::All => values.first().copied().map_or(Self::All, Self::Only),
            Self::Only(current) => {
                let position = values.iter().position(|value| *value == current);
                match position.and_then(|index| values.get(index + 1)) {
                    Some(value) => Self::Only(*value),
                    None => Self::All,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K> SortSpec<K> {
    pub const fn asc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<C, K> {
    pub search_term: String,
    pub category: CategoryFilter<C>,
    pub sort: Option<SortSpec<K>>,
}

impl<C, K> Default for FilterState<C, K> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: CategoryFilter::All,
            sort: None,
        }
    }
}

impl<C: FilterValue, K: FilterValue> FilterState<C, K> {
    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty() && self.category == CategoryFilter::All && self.sort.is_none()
    }

    /// Cycles `unsorted -> first key -> ... -> last key -> unsorted`, keeping
    /// the current direction.
    pub fn cycle_sort(&mut self) {
        let keys = K::ALL;
        self.sort = match self.sort {
            None => keys.first().map(|key| SortSpec::asc(*key)),
            Some(spec) => keys
                .iter()
                .position(|key| *key == spec.key)
                .and_then(|index| keys.get(index + 1))
                .map(|key| SortSpec {
                    key: *key,
                    direction: spec.direction,
                }),
        };
    }

    pub fn flip_sort_direction(&mut self) {
        if let Some(spec) = self.sort.as_mut() {
            spec.direction = spec.direction.flip();
        }
    }
}

pub type ItemFilter<T> = FilterState<<T as ListItem>::Category, <T as ListItem>::SortKey>;

pub fn derive_view<'a, T: ListItem>(source: &'a [T], filters: &ItemFilter<T>) -> Vec<&'a T> {
    let needle = filters.search_term.to_lowercase();
    let mut view = source
        .iter()
        .filter(|item| filters.category.admits(item.category()))
        .filter(|item| needle.is_empty() || matches_search(*item, &needle))
        .collect::<Vec<&T>>();

    if let Some(spec) = filters.sort {
        // `sort_by` is stable; ties keep their source order in both directions.
        view.sort_by(|left, right| {
            let ordering = left.compare_by(right, spec.key);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    view
}

/// `needle` must already be lower-cased.
pub fn matches_search<T: ListItem>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Count of source items per category, in declaration order. Items without a
/// category are not counted.
pub fn category_counts<T: ListItem>(source: &[T]) -> Vec<(T::Category, usize)> {
    <T::Category as FilterValue>::ALL
        .iter()
        .map(|category| {
            let count = source
                .iter()
                .filter(|item| item.category() == Some(*category))
                .count();
            (*category, count)
        })
        .collect()
}
