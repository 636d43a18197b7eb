//! Pure filter/sort/paginate engine over an in-memory entry collection.
//!
//! No I/O and no errors: malformed entries degrade gracefully (missing tags
//! behave as empty, entries without a timestamp never match a time window).

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};

use crate::entity::LogEntry;

/// Fixed page size of the reference behavior.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Title,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "title" => Ok(SortKey::Title),
            _ => Err(format!("Invalid sort key: {} (expected date or title)", s)),
        }
    }
}

/// Inclusive calendar-day range, interpreted in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// View state driving one rendered page.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Case-insensitive title substring; empty matches all.
    pub search_query: String,
    /// Exact, case-sensitive tag match.
    pub tag_filter: Option<String>,
    /// Explicit window; `None` falls back to the current week.
    pub date_range: Option<DateRange>,
    /// `None` leaves the filtered entries in store insertion order.
    pub sort_key: Option<SortKey>,
    /// 1-based. Out-of-range pages yield an empty slice; callers reset to 1
    /// when filters change.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            tag_filter: None,
            date_range: None,
            sort_key: Some(SortKey::Date),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

/// One displayable page of filtered and sorted entries.
#[derive(Debug, Clone)]
pub struct PageView {
    pub page_items: Vec<LogEntry>,
    pub total_matched: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

/// The week containing `today`: Sunday 00:00:00.000 through the following
/// Saturday 23:59:59.999, local calendar time.
pub fn week_window(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let back = today.weekday().num_days_from_sunday() as i64;
    let start = today - Duration::days(back);
    let end = start + Duration::days(6);
    (day_start(start), day_end(end))
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap()
}

fn in_window(entry: &LogEntry, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    match entry.timestamp {
        Some(ts) => {
            let local = ts.with_timezone(&Local).naive_local();
            local >= start && local <= end
        }
        None => false,
    }
}

/// Produce the page for `config`, with the default time window anchored at
/// `today`. Filters are AND-combined and commutative.
pub fn page_view_at(entries: &[LogEntry], config: &ViewConfig, today: NaiveDate) -> PageView {
    let (start, end) = match config.date_range {
        Some(range) => (day_start(range.start), day_end(range.end)),
        None => week_window(today),
    };

    let query = config.search_query.to_lowercase();

    let mut matched: Vec<LogEntry> = entries
        .iter()
        .filter(|e| query.is_empty() || e.title.to_lowercase().contains(&query))
        .filter(|e| match &config.tag_filter {
            Some(tag) => e.tags.iter().any(|t| t == tag),
            None => true,
        })
        .filter(|e| in_window(e, start, end))
        .cloned()
        .collect();

    match config.sort_key {
        Some(SortKey::Date) => matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        Some(SortKey::Title) => {
            matched.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        None => {}
    }

    let total_matched = matched.len();
    let first = config.page.saturating_sub(1).saturating_mul(config.page_size);
    let last = config.page.saturating_mul(config.page_size);
    let page_items: Vec<LogEntry> = matched
        .into_iter()
        .skip(first)
        .take(config.page_size)
        .collect();

    PageView {
        page_items,
        total_matched,
        has_prev_page: config.page > 1,
        has_next_page: last < total_matched,
    }
}

/// `page_view_at` anchored at the current local date.
pub fn page_view(entries: &[LogEntry], config: &ViewConfig) -> PageView {
    page_view_at(entries, config, Local::now().date_naive())
}

/// All entries falling in the week containing `today`, insertion order.
/// This is the activity set the post generator summarizes.
pub fn week_entries_at(entries: &[LogEntry], today: NaiveDate) -> Vec<LogEntry> {
    let (start, end) = week_window(today);
    entries
        .iter()
        .filter(|e| in_window(e, start, end))
        .cloned()
        .collect()
}

/// `week_entries_at` anchored at the current local date.
pub fn week_entries(entries: &[LogEntry]) -> Vec<LogEntry> {
    week_entries_at(entries, Local::now().date_naive())
}

/// Entry counts per local calendar day, for the contribution heatmap.
/// Entries without a timestamp are skipped.
pub fn daily_counts(entries: &[LogEntry]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        if let Some(ts) = entry.timestamp {
            let day = ts.with_timezone(&Local).date_naive();
            *counts.entry(day).or_insert(0) += 1;
        }
    }
    counts
}
