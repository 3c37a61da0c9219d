use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a similarity score, green when it reaches `threshold`
pub fn format_score(score: u8, threshold: u8) -> String {
    let text = format!("{}%", score);
    if score >= threshold {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Mask an API key for display
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Format timestamp in human-readable format
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Cut `text` to at most `width` terminal columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // keep one column for the ellipsis
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Lay out one table row. Hangul is two columns wide, so padding is computed
/// on display width rather than `char` count.
pub fn format_table_row(columns: &[&str], widths: &[usize]) -> String {
    let mut row = String::new();
    for (col, width) in columns.iter().zip(widths) {
        let cell = truncate_to_width(col, *width);
        let padding = width.saturating_sub(cell.width());
        row.push_str(&cell);
        row.push_str(&" ".repeat(padding + 2));
    }
    row.trim_end().to_string()
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    println!("{}", format_table_row(columns, widths));
}
