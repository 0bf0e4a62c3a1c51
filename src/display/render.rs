use ansi_term::Colour;

use crate::utils::percentage::seconds_percentage;

use super::{
    format::{format_chart_label, format_time},
    DomainEntry,
};

/// The palette cycles when there are more domains than colours.
const PALETTE: [Colour; 5] = [
    Colour::RGB(0xFF, 0x63, 0x84),
    Colour::RGB(0x36, 0xA2, 0xEB),
    Colour::RGB(0xFF, 0xCE, 0x56),
    Colour::RGB(0x4B, 0xC0, 0xC0),
    Colour::RGB(0x99, 0x66, 0xFF),
];

pub const EMPTY_STATE: &str = "No time tracked yet. Browse a little and check back.";

pub fn render_list(entries: &[DomainEntry]) -> String {
    let width = entries.iter().map(|e| e.domain.len()).max().unwrap_or(0);
    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            entry.domain,
            format_time(entry.seconds)
        ));
    }
    output
}

/// Horizontal bar chart. Bars are scaled against the largest entry so that it spans `width`
/// cells; every non-empty entry gets at least one cell.
pub fn render_chart(entries: &[DomainEntry], width: usize, colored: bool) -> String {
    let max = entries.iter().map(|e| e.seconds).max().unwrap_or(0);
    let whole = entries.iter().map(|e| e.seconds).sum::<u64>();
    let domain_width = entries.iter().map(|e| e.domain.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (index, entry) in entries.iter().enumerate() {
        let cells = if max == 0 {
            0
        } else {
            ((entry.seconds as u128 * width as u128 / max as u128) as usize).max(1)
        };
        let bar = "█".repeat(cells);
        let bar = if colored {
            PALETTE[index % PALETTE.len()].paint(bar).to_string()
        } else {
            bar
        };
        output.push_str(&format!(
            "{:<domain_width$}  {}{} {} ({})\n",
            entry.domain,
            bar,
            " ".repeat(width.saturating_sub(cells)),
            seconds_percentage(entry.seconds, whole),
            format_chart_label(entry.seconds),
        ));
    }
    output
}
