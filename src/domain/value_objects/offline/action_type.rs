use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kind of mutation recorded in the offline action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfflineActionType {
    Create,
    Update,
    Delete,
}

impl OfflineActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfflineActionType::Create => "CREATE",
            OfflineActionType::Update => "UPDATE",
            OfflineActionType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OfflineActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OfflineActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(OfflineActionType::Create),
            "UPDATE" => Ok(OfflineActionType::Update),
            "DELETE" => Ok(OfflineActionType::Delete),
            other => Err(format!("Unknown offline action type: {other}")),
        }
    }
}
