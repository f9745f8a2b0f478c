//! Plain-text profile report.

use serde::Serialize;

use crate::{FinancialSummary, Symbol};

const NO_PROFILES: &str = "No profiles encountered.";

/// Profile text of one stock with its latest results, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSection {
    pub symbol: Symbol,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<FinancialSummary>,
}

/// Markdown body listing each profile followed by its latest results line:
///
/// ```text
/// <description>
/// Results from 2023/12/31: Net Income: 123.4  Total Revenue: 999  
/// ```
pub fn render_markdown(sections: &[ProfileSection]) -> String {
    if sections.is_empty() {
        return String::from(NO_PROFILES);
    }

    let mut text = String::new();
    for section in sections {
        text.push_str(section.description.trim());
        text.push_str(" \n");

        if let Some(period) = section.summary.as_ref().and_then(FinancialSummary::latest) {
            text.push_str(&format!(
                "Results from {:04}/{:02}/{:02}: ",
                period.period_end.year(),
                u8::from(period.period_end.month()),
                period.period_end.day()
            ));
            for (item, value) in &period.items {
                match value {
                    Some(value) => text.push_str(&format!("{item}: {value}  ")),
                    None => text.push_str(&format!("{item}: -  ")),
                }
            }
        }
        text.push_str("\n\n");
    }
    text
}
