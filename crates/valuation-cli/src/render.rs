//! Output rendering for valuation results

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use valuation_core::Valuation;

/// Render a valuation as a table
pub fn table(valuation: &Valuation, explain: bool) -> String {
    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Estimate", "Value"]);

    let interval = &valuation.interval;
    summary.add_row(vec!["Minimum value".to_string(), format_amount(interval.min_value)]);
    summary.add_row(vec!["Maximum value".to_string(), format_amount(interval.max_value)]);
    summary.add_row(vec![
        "Confidence".to_string(),
        format!("{:.1}%", interval.confidence_percent),
    ]);
    summary.add_row(vec!["Comparables".to_string(), valuation.comparables.to_string()]);
    summary.add_row(vec!["As of".to_string(), valuation.as_of.to_string()]);

    if !explain {
        return summary.to_string();
    }

    let mut steps = Table::new();
    steps
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Step", "Factor", "Price after"]);
    steps.add_row(vec![
        "seed (subject sale)".to_string(),
        "-".to_string(),
        format_amount(valuation.seed_price),
    ]);
    for adjustment in &valuation.adjustments {
        steps.add_row(vec![
            adjustment.kind.label().to_string(),
            format!("{:.4}", adjustment.factor),
            format_amount(adjustment.price_after),
        ]);
    }

    format!("{summary}\n{steps}")
}

/// Render a valuation as pretty JSON
///
/// Without `explain` only the interval is emitted.
pub fn json(valuation: &Valuation, explain: bool) -> serde_json::Result<String> {
    if explain {
        serde_json::to_string_pretty(valuation)
    } else {
        serde_json::to_string_pretty(&valuation.interval)
    }
}

/// Whole currency units with thousands separators
fn format_amount(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        grouped.insert(0, '-');
    }
    grouped
}
