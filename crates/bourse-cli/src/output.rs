use bourse_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

const RANKING_COLUMNS: [&str; 7] = ["name", "last", "high", "low", "change_pct", "change", "turnover"];

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(envelope)?),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<String, CliError> {
    let mut out = String::new();
    out.push_str(&format!("request_id  : {}\n", envelope.meta.request_id));
    out.push_str(&format!("schema      : {}\n", envelope.meta.schema_version));
    out.push_str(&format!("generated_at: {}\n", envelope.meta.generated_at));
    out.push_str(&format!("source      : {}\n", envelope.meta.source));
    out.push_str(&format!("latency_ms  : {}\n", envelope.meta.latency_ms));

    if !envelope.meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &envelope.meta.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out.push_str("data:\n");
    if let Some(markdown) = envelope.data.get("markdown").and_then(Value::as_str) {
        for line in markdown.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    } else if let Some(rows) = envelope.data.pointer("/ranking/rows").and_then(Value::as_array) {
        out.push_str(&ranking_table(rows));
    } else if let Some(stocks) = envelope.data.get("stocks").and_then(Value::as_array) {
        for stock in stocks {
            if let Some(label) = stock.get("label").and_then(Value::as_str) {
                out.push_str(&format!("  {label}\n"));
            }
        }
    } else {
        let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
        for line in pretty_data.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }

    if !envelope.errors.is_empty() {
        out.push_str("errors:\n");
        for error in &envelope.errors {
            out.push_str(&format!("  - {}: {}\n", error.code, error.message));
        }
    }

    Ok(out)
}

/// Column-aligned ranking rows.
fn ranking_table(rows: &[Value]) -> String {
    let cells = rows
        .iter()
        .map(|row| {
            RANKING_COLUMNS
                .iter()
                .map(|column| match row.get(*column) {
                    Some(Value::String(text)) => text.clone(),
                    Some(Value::Number(number)) => number.to_string(),
                    _ => String::from("-"),
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = RANKING_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let line = |values: Vec<&str>| {
        let padded = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("  {}\n", padded.trim_end())
    };

    let mut out = line(RANKING_COLUMNS.to_vec());
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
