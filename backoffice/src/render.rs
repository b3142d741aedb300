//! Plain-text rendering of a [`TableView`].

use datagrid::{CheckState, SortDirection, TableView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Pixels per character cell when converting column widths.
pub const PX_PER_CHAR: u32 = 8;

const MIN_CHARS: usize = 3;
const SEPARATOR: &str = " | ";

pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Column width in character cells for a pixel width.
pub fn chars_for(px: u32) -> usize {
    ((px / PX_PER_CHAR) as usize).max(MIN_CHARS)
}

/// Cut `s` to at most `max_width` cells, ending in `…` when shortened.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > target {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// Truncate or right-pad `s` to exactly `width` cells.
pub fn fit(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let pad = width.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

fn sort_marker(sort: Option<SortDirection>) -> &'static str {
    match sort {
        Some(SortDirection::Asc) => " ^",
        Some(SortDirection::Desc) => " v",
        None => "",
    }
}

/// Lay the view out as a fixed-width text table.
///
/// Layout: header line, rule, one line per row (or the empty-state line),
/// rule, footer, and the bulk action bar when rows are selected.
pub fn render_text<T>(view: &TableView<T>) -> String {
    let widths: Vec<usize> = view.headers.iter().map(|h| chars_for(h.width)).collect();
    let with_checkbox = view.select_all.is_some();

    let mut header_cells: Vec<String> = Vec::with_capacity(widths.len() + 1);
    if let Some(state) = view.select_all {
        header_cells.push(checkbox(state).to_string());
    }
    for (header, &width) in view.headers.iter().zip(&widths) {
        let text = format!("{}{}", header.text, sort_marker(header.sort));
        header_cells.push(fit(&text, width));
    }
    let header_line = header_cells.join(SEPARATOR);
    let line_width = display_width(header_line.trim_end()).max(1);
    let rule = "-".repeat(line_width);

    let mut lines = vec![header_line.trim_end().to_string(), rule.clone()];

    match &view.empty_state {
        Some(empty) => lines.push(fit(&empty.text, line_width).trim_end().to_string()),
        None => {
            for row in &view.rows {
                let mut cells: Vec<String> = Vec::with_capacity(widths.len() + 1);
                if with_checkbox {
                    let state = if row.selected {
                        CheckState::Checked
                    } else {
                        CheckState::Unchecked
                    };
                    cells.push(checkbox(state).to_string());
                }
                for (cell, &width) in row.cells.iter().zip(&widths) {
                    cells.push(fit(&cell.text, width));
                }
                lines.push(cells.join(SEPARATOR).trim_end().to_string());
            }
        }
    }

    lines.push(rule);
    lines.push(format!(
        "{}  {}  ({} per page)",
        view.footer.text,
        view.footer.page_label(),
        view.footer.page_size
    ));

    if let Some(bar) = &view.bulk_bar {
        let actions: Vec<&str> = bar.actions.iter().map(|a| a.label.as_str()).collect();
        lines.push(format!("{} selected: {}", bar.count, actions.join(" / ")));
    }

    lines.join("\n")
}
