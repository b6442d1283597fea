use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Entity family an offline action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Material,
    Order,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Material => "MATERIAL",
            EntityType::Order => "ORDER",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MATERIAL" => Ok(EntityType::Material),
            "ORDER" => Ok(EntityType::Order),
            other => Err(format!("Unknown entity type: {other}")),
        }
    }
}
