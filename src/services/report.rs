use std::f64::consts::{FRAC_PI_2, PI, TAU};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    dal::company_store::{to_csv_bytes, StoreError},
    domain::company::CompanyRecord,
};

pub const EXPORT_FILE_NAME: &str = "yc_s25_companies.csv";
pub const EXPORT_MIME: &str = "text/csv";

pub const STOPWORDS: [&str; 16] = [
    "the", "and", "with", "for", "that", "this", "are", "from", "our", "its", "we", "on", "a",
    "to", "in", "their",
];
const STRIP_CHARS: &[char] = &['.', ',', '(', ')', '[', ']'];

pub const CHART_SIZE: f64 = 300.0;
const CHART_RADIUS: f64 = 140.0;
const CHART_HOLE: f64 = 0.4;

pub const CLOUD_WIDTH: u32 = 800;
pub const CLOUD_HEIGHT: u32 = 400;
const CLOUD_PADDING: u32 = 8;
const CLOUD_GAP: u32 = 6;
const MIN_FONT: u32 = 14;
const MAX_FONT: u32 = 64;
const MAX_CLOUD_WORDS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub with_website: usize,
    pub mentions: usize,
}

pub fn summarize(table: &[CompanyRecord]) -> Summary {
    Summary {
        total: table.len(),
        with_website: table.iter().filter(|r| r.website.is_some()).count(),
        mentions: table.iter().filter(|r| r.mentions_batch).count(),
    }
}

/// One bucket of the mention donut chart, with its SVG geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    pub count: usize,
    pub percent: f64,
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl PieSlice {
    pub fn annotation(&self) -> String {
        format!("{} {:.1}%", self.label, self.percent)
    }
}

/// Empty buckets are left out; an empty table has no slices.
pub fn mention_split(table: &[CompanyRecord]) -> Vec<PieSlice> {
    let yes = table.iter().filter(|r| r.mentions_batch).count();
    let buckets = [("No", table.len() - yes), ("Yes", yes)];
    let total = table.len() as f64;

    let mut start = -FRAC_PI_2;
    let mut slices = vec![];
    for (label, count) in buckets.into_iter().filter(|(_, count)| *count > 0) {
        let fraction = count as f64 / total;
        let end = start + fraction * TAU;
        let middle = (start + end) / 2.0;
        let label_radius = CHART_RADIUS * (1.0 + CHART_HOLE) / 2.0;
        let (label_x, label_y) = polar(label_radius, middle);

        slices.push(PieSlice {
            label,
            count,
            percent: fraction * 100.0,
            path: donut_segment(start, end),
            label_x,
            label_y,
        });
        start = end;
    }

    slices
}

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    let center = CHART_SIZE / 2.0;
    (center + radius * angle.cos(), center + radius * angle.sin())
}

fn donut_segment(start: f64, end: f64) -> String {
    // A single arc cannot draw a full circle.
    if end - start >= TAU - 1e-9 {
        let half = start + PI;
        return format!("{} {}", annular_sector(start, half), annular_sector(half, end));
    }
    annular_sector(start, end)
}

fn annular_sector(start: f64, end: f64) -> String {
    let outer = CHART_RADIUS;
    let inner = CHART_RADIUS * CHART_HOLE;
    let large_arc = u8::from(end - start > PI);

    let (ox1, oy1) = polar(outer, start);
    let (ox2, oy2) = polar(outer, end);
    let (ix2, iy2) = polar(inner, end);
    let (ix1, iy1) = polar(inner, start);

    format!(
        "M {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} Z",
        ox1, oy1, outer, outer, large_arc, ox2, oy2, ix2, iy2, inner, inner, large_arc, ix1, iy1
    )
}

/// Case-insensitive substring match on company name. A blank term shows
/// nothing rather than the whole table.
pub fn search_by_name<'a>(
    table: &'a [CompanyRecord],
    term: &str,
) -> Option<Vec<&'a CompanyRecord>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }

    Some(
        table
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Most frequent first, ties alphabetical.
pub fn word_frequencies(table: &[CompanyRecord]) -> Vec<WordCount> {
    let all_text = table
        .iter()
        .filter_map(|r| r.description.as_deref())
        .join(" ")
        .to_lowercase();

    all_text
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word) && word.chars().count() > 3)
        .map(|word| word.trim_matches(STRIP_CHARS))
        .filter(|word| !word.is_empty())
        .counts()
        .into_iter()
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudWord {
    pub text: String,
    pub count: usize,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
}

/// Packs words into rows on a fixed canvas, biggest first. Font size is
/// linear in frequency; whatever does not fit is dropped.
pub fn word_cloud(frequencies: &[WordCount]) -> Vec<CloudWord> {
    let Some(top) = frequencies.first().map(|w| w.count) else {
        return vec![];
    };

    let mut placed = vec![];
    let mut cursor_x = CLOUD_PADDING;
    let mut row_top = CLOUD_PADDING;
    let mut row_height = 0;

    for word in frequencies.iter().take(MAX_CLOUD_WORDS) {
        let font_size = MIN_FONT + ((MAX_FONT - MIN_FONT) as usize * word.count / top) as u32;
        let width = estimated_width(&word.word, font_size);
        if width > CLOUD_WIDTH - 2 * CLOUD_PADDING {
            continue;
        }

        if row_height > 0 && cursor_x + width > CLOUD_WIDTH - CLOUD_PADDING {
            row_top += row_height + CLOUD_GAP;
            cursor_x = CLOUD_PADDING;
            row_height = 0;
        }
        if row_height == 0 {
            if row_top + font_size > CLOUD_HEIGHT - CLOUD_PADDING {
                break;
            }
            row_height = font_size;
        }

        placed.push(CloudWord {
            text: word.word.clone(),
            count: word.count,
            font_size,
            x: cursor_x,
            y: row_top + row_height,
        });
        cursor_x += width + CLOUD_GAP;
    }

    placed
}

fn estimated_width(word: &str, font_size: u32) -> u32 {
    (word.chars().count() as f64 * font_size as f64 * 0.6).ceil() as u32
}

pub fn export_csv(table: &[CompanyRecord]) -> Result<Vec<u8>, StoreError> {
    to_csv_bytes(table)
}
