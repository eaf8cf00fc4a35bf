//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use console::{measure_text_width, pad_str, Alignment};
use matprice_store::MaterialRecord;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header, underlined to its display width
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(measure_text_width(message)));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.1}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format a unit price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

const HEADERS: [&str; 5] = ["Month", "Material", "Specification", "Unit", "Unit price"];

/// Render records as an aligned table.
///
/// Column widths are measured in terminal cells, so CJK names line up.
pub fn render_records(records: &[MaterialRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.year_month().to_string(),
                r.material_name().to_string(),
                r.specification().to_string(),
                r.unit().to_string(),
                format_price(r.unit_price()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(measure_text_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 5]) {
    let last = cells.len().saturating_sub(1);
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // Prices are right-aligned.
            let align = if i == last { Alignment::Right } else { Alignment::Left };
            pad_str(cell.as_ref(), *width, align, None).into_owned()
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Print records as a table, or a note when there are none
pub fn print_records(records: &[MaterialRecord]) {
    if records.is_empty() {
        Status::info("No matching records");
        return;
    }
    print!("{}", render_records(records));
    println!("{}", format_count(records.len(), "record", "records").dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use matprice_store::YearMonth;
    use std::time::Duration;

    fn record(name: &str, spec: &str, price: f64) -> MaterialRecord {
        MaterialRecord::new(YearMonth::parse_compact("202301").unwrap(), name, spec, "吨", price)
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "record", "records"), "1 record");
        assert_eq!(format_count(5, "record", "records"), "5 records");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(450.0), "450.00");
        assert_eq!(format_price(5200.256), "5200.26");
    }

    #[test]
    fn test_render_aligns_wide_characters() {
        let table = render_records(&[record("水泥", "P.O 42.5", 450.0), record("cement", "P.O 42.5", 5200.0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Month"));

        // Both rows put the specification at the same display column.
        let column = |line: &str| measure_text_width(&line[..line.find("P.O").unwrap()]);
        assert_eq!(column(lines[2]), column(lines[3]));
        assert!(lines[2].ends_with("450.00"));
    }
}
