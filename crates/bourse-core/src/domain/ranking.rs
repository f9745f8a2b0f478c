use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Country, Symbol, ValidationError};

/// Rows kept in a ranking.
pub const TOP_N: usize = 10;

/// Ordering applied to a country's market overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMetric {
    /// Turnover, largest first.
    Turnover,
    /// Change %, largest gain first.
    PriceIncrease,
    /// Change %, largest loss first.
    PriceDecrease,
}

impl SortMetric {
    pub const ALL: [Self; 3] = [Self::Turnover, Self::PriceIncrease, Self::PriceDecrease];

    /// Label shown to users.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Turnover => "Higher Turnover",
            Self::PriceIncrease => "Higher price increase",
            Self::PriceDecrease => "Higher price decrease",
        }
    }

    fn compare(self, a: &RankingRow, b: &RankingRow) -> Ordering {
        match self {
            Self::Turnover => b.turnover.total_cmp(&a.turnover),
            Self::PriceIncrease => b.change_pct.total_cmp(&a.change_pct),
            Self::PriceDecrease => a.change_pct.total_cmp(&b.change_pct),
        }
    }
}

impl Display for SortMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMetric {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "higher turnover" | "turnover" => Ok(Self::Turnover),
            "higher price increase" | "increase" | "gain" | "gainers" => Ok(Self::PriceIncrease),
            "higher price decrease" | "decrease" | "loss" | "losers" => Ok(Self::PriceDecrease),
            other => Err(ValidationError::InvalidSortMetric {
                value: other.to_owned(),
            }),
        }
    }
}

/// Market overview row exactly as the upstream renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    pub last: String,
    pub high: String,
    pub low: String,
    pub change: String,
    pub change_pct: String,
    pub turnover: String,
}

/// Parsed ranking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    pub last: f64,
    pub high: f64,
    pub low: f64,
    /// Percentage change, e.g. `1.25` for `+1.25%`.
    pub change_pct: f64,
    /// Daily change in currency units.
    pub change: f64,
    pub turnover: f64,
}

impl TryFrom<&OverviewRow> for RankingRow {
    type Error = String;

    fn try_from(row: &OverviewRow) -> Result<Self, Self::Error> {
        let field = |name: &str, raw: &str| {
            parse_decorated_number(raw)
                .ok_or_else(|| format!("unparsable {name} '{raw}' for '{}'", row.name))
        };

        Ok(Self {
            name: row.name.trim().to_owned(),
            symbol: row.symbol.clone(),
            last: field("last", &row.last)?,
            high: field("high", &row.high)?,
            low: field("low", &row.low)?,
            change_pct: field("change %", &row.change_pct)?,
            change: field("change", &row.change)?,
            turnover: field("turnover", &row.turnover)?,
        })
    }
}

/// Top stocks of a country under one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRanking {
    pub country: Country,
    pub metric: SortMetric,
    pub rows: Vec<RankingRow>,
}

impl TopRanking {
    /// Sort by `metric` and keep the first [`TOP_N`] rows. The sort is
    /// stable, so ties keep upstream order.
    pub fn rank(country: Country, metric: SortMetric, mut rows: Vec<RankingRow>) -> Self {
        rows.sort_by(|a, b| metric.compare(a, b));
        rows.truncate(TOP_N);
        Self {
            country,
            metric,
            rows,
        }
    }
}

/// Parse upstream numeric text such as `+1.25%`, `-0.030`, `1,234.5`,
/// `12.3K` or `4.56M`. A lone `-` (no trade) parses as zero.
pub fn parse_decorated_number(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_end_matches('%')
        .trim_start_matches('+')
        .replace([',', '\u{a0}', ' '], "");

    if cleaned.is_empty() || cleaned == "-" {
        return Some(0.0);
    }

    let (digits, scale) = match cleaned.chars().last() {
        Some('K' | 'k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M' | 'm') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B' | 'b') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value * scale)
}
