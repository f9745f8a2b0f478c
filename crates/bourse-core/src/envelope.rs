use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{DataUnavailable, ProviderId, ValidationError};

/// Schema version stamped on every envelope.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for all `bourse` machine-readable outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        for error in &errors {
            error.validate()?;
        }

        Ok(Self { meta, data, errors })
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub source: ProviderId,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        source: ProviderId,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: now_rfc3339(),
            source,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

/// Structured error payload for failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderId>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            source: None,
        };
        error.validate()?;
        Ok(error)
    }

    pub fn with_source(mut self, source: ProviderId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }

        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(())
    }
}

impl From<&DataUnavailable> for EnvelopeError {
    fn from(error: &DataUnavailable) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            source: None,
        }
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let parts = version.split('.').collect::<Vec<_>>();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Country, Operation};

    #[test]
    fn new_meta_carries_current_schema() {
        let meta = EnvelopeMeta::new("request-12345", ProviderId::Offline, 3).expect("valid meta");
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert!(meta.generated_at.ends_with('Z'));
    }

    #[test]
    fn rejects_short_request_id() {
        let err = EnvelopeMeta::new("short", ProviderId::Offline, 0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidRequestId));
    }

    #[test]
    fn rejects_bad_schema_version() {
        let mut meta = EnvelopeMeta::new("request-12345", ProviderId::Investing, 0).expect("valid");
        meta.schema_version = String::from("1.0");
        assert!(matches!(
            meta.validate(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn data_unavailable_maps_to_its_code() {
        let error = DataUnavailable::new(
            Operation::Dividends,
            Country::parse("spain").expect("country"),
            None,
            "no dividends",
        );
        let payload = EnvelopeError::from(&error);

        assert_eq!(payload.code, "data.unavailable");
        assert!(payload.message.contains("dividends"));
    }

    #[test]
    fn serializes_without_empty_errors() {
        let meta = EnvelopeMeta::new("request-12345", ProviderId::Offline, 0).expect("valid");
        let json = serde_json::to_value(Envelope::success(meta, 7)).expect("serializable");

        assert_eq!(json["data"], 7);
        assert!(json.get("errors").is_none());
        assert_eq!(json["meta"]["source"], "offline");
    }
}
