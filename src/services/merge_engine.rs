use std::collections::{HashMap, HashSet};

use crate::domain::company::{CompanyRecord, ListingEntry};

/// Listing entries not yet in the table, in listing order. Runs before
/// enrichment so known companies are never scraped again.
pub fn new_entries(existing: &[CompanyRecord], listing: Vec<ListingEntry>) -> Vec<ListingEntry> {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.name.clone()).collect();

    listing
        .into_iter()
        .filter(|entry| seen.insert(entry.name.clone()))
        .collect()
}

/// Union of both tables; when names collide the `fresh` record wins.
pub fn merge(existing: Vec<CompanyRecord>, fresh: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    let mut combined = existing;
    combined.extend(fresh);
    dedup_keep_last(combined)
}

/// Keeps the last row for each company name, at that row's position.
pub fn dedup_keep_last(rows: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    let last_index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.name.clone(), i))
        .collect();

    rows.into_iter()
        .enumerate()
        .filter(|(i, row)| last_index.get(&row.name) == Some(i))
        .map(|(_, row)| row)
        .collect()
}
