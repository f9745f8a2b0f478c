use std::fmt::{Display, Formatter};
use std::time::Instant;

use bourse_core::{EnvelopeMeta, ProviderId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request identifier (UUID v4) stamped on every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Per-invocation metadata collected while a command runs.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub request_id: RequestId,
    pub source: ProviderId,
    started: Instant,
}

impl Metadata {
    pub fn start(source: ProviderId) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            source,
            started: Instant::now(),
        }
    }

    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn into_envelope_meta(self, warnings: Vec<String>) -> Result<EnvelopeMeta, ValidationError> {
        let mut meta = EnvelopeMeta::new(self.request_id.to_string(), self.source, self.latency_ms())?;
        for warning in warnings {
            meta.push_warning(warning);
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        let request_id = RequestId::new_v4();
        assert_eq!(request_id.0.get_version_num(), 4);
    }

    #[test]
    fn envelope_meta_keeps_source_and_warnings() {
        let meta = Metadata::start(ProviderId::Offline)
            .into_envelope_meta(vec![String::from("no stocks available for narnia")])
            .expect("valid meta");

        assert_eq!(meta.source, ProviderId::Offline);
        assert_eq!(meta.warnings.len(), 1);
        assert_eq!(meta.request_id.len(), 36);
    }
}
