//! Calendar-date helpers shared by the domain models.
//!
//! Every date in bourse is a plain calendar [`Date`] rendered as
//! `YYYY-MM-DD`. Upstream timestamps are reduced to their UTC date.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Today's date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), ISO_DATE).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

pub fn format_date(date: Date) -> String {
    // `[year]-[month]-[day]` cannot fail for a valid `Date`.
    date.format(ISO_DATE)
        .unwrap_or_else(|_| format!("{}-{:02}-{:02}", date.year(), date.month() as u8, date.day()))
}

/// UTC calendar date of a unix timestamp in seconds.
pub fn date_from_unix(seconds: i64) -> Option<Date> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .map(OffsetDateTime::date)
}

/// `#[serde(with = "iso")]` for `Date` fields.
pub mod iso {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_date(&value).map_err(D::Error::custom)
    }

    /// `#[serde(with = "iso::option")]` for `Option<Date>` fields.
    pub mod option {
        use serde::de::Error as DeError;
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(date) => serializer.serialize_some(&super::super::format_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|value| super::super::parse_date(&value).map_err(D::Error::custom))
                .transpose()
        }
    }
}
