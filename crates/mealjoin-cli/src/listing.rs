// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! One-shot `--list` output: fetch a collection, derive the view, print it.

use anyhow::{Context, Result, anyhow, bail};
use mealjoin_app::{
    CancelToken, CategoryFilter, CollectionKind, CollectionSnapshot, DataSupplier, FilterState,
    FilterValue, ItemFilter, ListItem, SortSpec, derive_view,
};
use mealjoin_tui::TableRows;
use serde::Serialize;
use tracing::debug;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub kind: CollectionKind,
    pub search: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub descending: bool,
    pub json: bool,
}

impl ListOptions {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            search: None,
            filter: None,
            sort: None,
            descending: false,
            json: false,
        }
    }
}

pub fn render_listing(supplier: &dyn DataSupplier, options: &ListOptions) -> Result<String> {
    let snapshot = supplier
        .fetch_collection(options.kind, &CancelToken::new())
        .with_context(|| format!("list {}", options.kind.as_str()))?;
    debug!(
        kind = options.kind.as_str(),
        rows = snapshot.len(),
        "listing fetched"
    );
    match snapshot {
        CollectionSnapshot::Meals(rows) => render_rows(&rows, options),
        CollectionSnapshot::Users(rows) => render_rows(&rows, options),
        CollectionSnapshot::Sessions(rows) => render_rows(&rows, options),
        CollectionSnapshot::Reports(rows) => render_rows(&rows, options),
        CollectionSnapshot::Conversations(rows) => render_rows(&rows, options),
        CollectionSnapshot::Bookings(rows) => render_rows(&rows, options),
    }
}

fn render_rows<T: TableRows + Serialize>(rows: &[T], options: &ListOptions) -> Result<String> {
    let filters = build_filters::<T>(options)?;
    let view = derive_view(rows, &filters);
    if options.json {
        let mut encoded = serde_json::to_string_pretty(&view)
            .context("encode listing as JSON")?;
        encoded.push('\n');
        return Ok(encoded);
    }
    if view.is_empty() {
        return Ok(format!("No {} found\n", T::COLLECTION.as_str()));
    }
    let cells = view.iter().map(|item| item.cells()).collect::<Vec<_>>();
    Ok(format_table(T::HEADERS, &cells))
}

fn build_filters<T: ListItem>(options: &ListOptions) -> Result<ItemFilter<T>> {
    let mut filters: ItemFilter<T> = FilterState::default();
    if let Some(term) = &options.search {
        filters.search_term = term.clone();
    }
    if let Some(raw) = &options.filter {
        filters.category = CategoryFilter::parse_or_all(raw);
    }
    filters.sort = match &options.sort {
        Some(raw) => {
            let key = <T::SortKey as FilterValue>::parse(raw.trim()).ok_or_else(|| {
                anyhow!(
                    "unknown sort key {raw:?} for {}; expected one of: {}",
                    T::COLLECTION.as_str(),
                    sort_key_names::<T>()
                )
            })?;
            Some(if options.descending {
                SortSpec::desc(key)
            } else {
                SortSpec::asc(key)
            })
        }
        None if options.descending => bail!("--desc needs --sort <key>"),
        None => None,
    };
    Ok(filters)
}

fn sort_key_names<T: ListItem>() -> String {
    <T::SortKey as FilterValue>::ALL
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| {
        let padded = cells
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        format!("{}\n", padded.trim_end())
    };

    let mut out = line(&mut headers.iter().copied());
    for row in rows {
        out.push_str(&line(&mut row.iter().map(String::as_str)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ListOptions, format_table, render_listing};
    use anyhow::Result;
    use mealjoin_app::CollectionKind;
    use mealjoin_store::{MockStore, StoreOptions};

    fn demo_store() -> MockStore {
        MockStore::demo(StoreOptions::instant())
    }

    #[test]
    fn filtered_meals_sort_by_price_descending() -> Result<()> {
        let options = ListOptions {
            filter: Some("african".to_owned()),
            sort: Some("price".to_owned()),
            descending: true,
            json: true,
            ..ListOptions::new(CollectionKind::Meals)
        };
        let output = render_listing(&demo_store(), &options)?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&output)?;
        let titles = rows
            .iter()
            .filter_map(|row| row["title"].as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![
                "Fufu & Light Soup",
                "Homemade Banku & Tilapia",
                "Traditional Jollof Rice Feast"
            ]
        );
        Ok(())
    }

    #[test]
    fn table_output_has_header_and_matching_rows() -> Result<()> {
        let options = ListOptions {
            search: Some("WILSON".to_owned()),
            ..ListOptions::new(CollectionKind::Users)
        };
        let output = render_listing(&demo_store(), &options)?;
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].contains("james@example.com"));
        assert!(lines[1].ends_with("suspended"));
        Ok(())
    }

    #[test]
    fn empty_view_prints_placeholder() -> Result<()> {
        let options = ListOptions {
            search: Some("nobody by this name".to_owned()),
            ..ListOptions::new(CollectionKind::Reports)
        };
        assert_eq!(
            render_listing(&demo_store(), &options)?,
            "No reports found\n"
        );
        Ok(())
    }

    #[test]
    fn unknown_filter_value_shows_everything() -> Result<()> {
        let options = ListOptions {
            filter: Some("martian".to_owned()),
            json: true,
            ..ListOptions::new(CollectionKind::Sessions)
        };
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&render_listing(&demo_store(), &options)?)?;
        assert_eq!(rows.len(), 5);
        Ok(())
    }

    #[test]
    fn unknown_sort_key_lists_valid_keys() {
        let options = ListOptions {
            sort: Some("vibes".to_owned()),
            ..ListOptions::new(CollectionKind::Users)
        };
        let error = render_listing(&demo_store(), &options).expect_err("bad sort key");
        let message = error.to_string();
        assert!(message.contains("unknown sort key \"vibes\" for users"));
        assert!(message.contains("joined, name"));
    }

    #[test]
    fn desc_without_sort_is_rejected() {
        let options = ListOptions {
            descending: true,
            ..ListOptions::new(CollectionKind::Meals)
        };
        let error = render_listing(&demo_store(), &options).expect_err("desc alone");
        assert!(error.to_string().contains("--desc needs --sort"));
    }

    #[test]
    fn fetch_failures_carry_context() {
        let store = MockStore::demo(StoreOptions {
            fail_fetches: true,
            ..StoreOptions::instant()
        });
        let error = render_listing(&store, &ListOptions::new(CollectionKind::Meals))
            .expect_err("injected failure");
        let message = format!("{error:#}");
        assert_eq!(message, "list meals: failed to load meals");
    }

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let table = format_table(
            &["A", "Longer"],
            &[
                vec!["wide cell".to_owned(), "x".to_owned()],
                vec!["b".to_owned(), "y".to_owned()],
            ],
        );
        assert_eq!(table, "A          Longer\nwide cell  x\nb          y\n");
    }
}
