//! Candidate rows for search result selection.
//!
//! Each row is two halves joined by [`ROW_SEPARATOR`]: the visible table line
//! and a hidden preview payload of [`PAYLOAD_DELIMITER`]-separated fields
//! (`name|artists|year|duration|quality|explicit`) used by the picker preview.

use crate::model::{MediaType, SearchResult};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ROW_SEPARATOR: char = '\t';
pub const PAYLOAD_DELIMITER: char = '|';

const NAME_LIMIT: usize = 38;
const NAME_COLUMN: usize = 40;
const ELLIPSIS: char = '…';
const YEAR_PLACEHOLDER: &str = "----";
const DURATION_PLACEHOLDER: &str = "--:--";
const QUALITY_PLACEHOLDER: &str = "----";
const QUALITY_CODE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `index. name` only.
    Simple,
    /// Fixed-width table with year, length, explicit marker and quality.
    Detailed,
}

impl Layout {
    pub fn for_media_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Artist => Layout::Simple,
            _ => Layout::Detailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub visible: String,
    pub hidden: String,
}

impl CandidateRow {
    /// The row as fed to the picker: both halves joined by the separator.
    pub fn line(&self) -> String {
        format!("{}{}{}", self.visible, ROW_SEPARATOR, self.hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTable {
    pub header: String,
    pub rows: Vec<CandidateRow>,
}

impl CandidateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows joined by newlines, ready for a picker's stdin.
    pub fn picker_input(&self) -> String {
        self.rows
            .iter()
            .map(CandidateRow::line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_candidates(items: &[SearchResult], media_type: MediaType) -> CandidateTable {
    let layout = Layout::for_media_type(media_type);
    let label = media_type.as_str().to_uppercase();

    let header = match layout {
        Layout::Detailed => format!(
            "{:<3} {} {:<6} {:<8} {:<3} QUAL",
            "#",
            pad_to_width(&label, NAME_COLUMN),
            "YEAR",
            "LENGTH",
            "[E]"
        ),
        Layout::Simple => format!("{:<3} {}", "#", label),
    };

    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| format_row(i + 1, item, layout))
        .collect();

    CandidateTable { header, rows }
}

fn format_row(index: usize, item: &SearchResult, layout: Layout) -> CandidateRow {
    // Modules report unknown years and lengths as 0.
    let year = item.year.filter(|&y| y > 0).map(|y| y.to_string());
    let full_duration = item.duration.filter(|&d| d > 0).map(format_duration);
    let quality = item.quality();
    let position = format!("{}.", index);

    let visible = match layout {
        Layout::Detailed => format!(
            "{:<4} {} {:<6} {:<8} {:<3} {}",
            position,
            pad_to_width(&truncate_name(&item.name), NAME_COLUMN),
            year.as_deref().unwrap_or(YEAR_PLACEHOLDER),
            full_duration
                .as_deref()
                .map(short_duration)
                .unwrap_or(DURATION_PLACEHOLDER),
            if item.explicit { "E" } else { " " },
            quality
                .map(quality_code)
                .unwrap_or_else(|| QUALITY_PLACEHOLDER.to_string()),
        ),
        Layout::Simple => format!("{:<4} {}", position, item.name),
    };

    let hidden = [
        item.name.clone(),
        item.artists.joined(),
        year.unwrap_or_default(),
        full_duration.unwrap_or_default(),
        quality.unwrap_or_default().to_string(),
        if item.explicit { "1" } else { "0" }.to_string(),
    ]
    .iter()
    .map(|field| sanitize(field))
    .collect::<Vec<_>>()
    .join(PAYLOAD_DELIMITER.to_string().as_str());

    CandidateRow {
        visible: sanitize(&visible),
        hidden,
    }
}

/// Keeps names within the column: wider than 38 columns is cut to at most 37
/// plus an ellipsis. Widths are terminal display widths.
pub fn truncate_name(name: &str) -> String {
    if name.width() <= NAME_LIMIT {
        return name.to_string();
    }

    let budget = NAME_LIMIT - ELLIPSIS.width().unwrap_or(1);
    let mut used = 0;
    let mut truncated = String::new();
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(c);
    }
    truncated.push(ELLIPSIS);
    truncated
}

/// `MM:SS` below an hour, `H:MM:SS` from one hour on.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Drops the seconds of an hour-long duration to fit the table column.
pub fn short_duration(full: &str) -> &str {
    if full.matches(':').count() >= 2 {
        full.rfind(':').map(|i| &full[..i]).unwrap_or(full)
    } else {
        full
    }
}

pub fn quality_code(quality: &str) -> String {
    if quality.contains("Dolby Atmos") {
        "DA".to_string()
    } else if quality.contains("Master") {
        "Mast".to_string()
    } else if quality.contains("HiFi") {
        "HiFi".to_string()
    } else {
        quality.chars().take(QUALITY_CODE_LEN).collect()
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

// Separators inside a field would shift the picker's columns.
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            ROW_SEPARATOR | PAYLOAD_DELIMITER | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
