use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifiers of the upstream data sources bourse can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Investing,
    Offline,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investing => "investing",
            Self::Offline => "offline",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
