//! Result table rendering.

use setupscan_core::ScreenResult;
use std::fmt::Write;

const HEADERS: [&str; 5] = [
    "Instrument",
    "Signal",
    "Entry Price",
    "Stop Loss",
    "30m Confirmation",
];

pub const NOTHING_ACTIONABLE: &str = "No 'Strong' or 'Super Strong' signals found.";

fn price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "N/A".to_string(),
    }
}

fn cells(result: &ScreenResult) -> [String; 5] {
    [
        result.instrument.clone(),
        result.signal.label().to_string(),
        price(result.entry_price),
        price(result.stop_loss),
        result.confirmation.label().to_string(),
    ]
}

/// Left-aligned table, columns sized to their widest cell.
pub fn format_table<'a>(results: impl IntoIterator<Item = &'a ScreenResult>) -> String {
    let rows: Vec<[String; 5]> = results.into_iter().map(cells).collect();
    if rows.is_empty() {
        return format!("{NOTHING_ACTIONABLE}\n");
    }

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&HEADERS));
    let _ = writeln!(
        out,
        "{}",
        widths.map(|w| "-".repeat(w)).join("-|-")
    );
    for row in &rows {
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", line(&refs));
    }
    out
}
