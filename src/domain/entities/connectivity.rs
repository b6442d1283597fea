use crate::domain::value_objects::ConnectivityState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One platform connectivity reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObservation {
    pub is_connected: bool,
    /// `None` while the platform has not finished its internet check.
    pub is_internet_reachable: Option<bool>,
    pub transport: Option<String>,
}

impl NetworkObservation {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn reachable(transport: impl Into<String>) -> Self {
        Self {
            is_connected: true,
            is_internet_reachable: Some(true),
            transport: Some(transport.into()),
        }
    }

    pub fn unreachable(transport: impl Into<String>) -> Self {
        Self {
            is_connected: true,
            is_internet_reachable: Some(false),
            transport: Some(transport.into()),
        }
    }

    pub fn classify(&self) -> ConnectivityState {
        if !self.is_connected {
            ConnectivityState::Offline
        } else if self.is_internet_reachable == Some(true) {
            ConnectivityState::OnlineReachable
        } else {
            ConnectivityState::OnlineUnreachable
        }
    }
}

/// Persisted view of the last transition, stored under the
/// `connectivity_snapshot` sync-status key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivitySnapshot {
    pub state: ConnectivityState,
    pub is_connected: bool,
    pub is_internet_reachable: Option<bool>,
    pub transport: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl ConnectivitySnapshot {
    pub fn from_observation(observation: &NetworkObservation, changed_at: DateTime<Utc>) -> Self {
        Self {
            state: observation.classify(),
            is_connected: observation.is_connected,
            is_internet_reachable: observation.is_internet_reachable,
            transport: observation.transport.clone(),
            changed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_reachability() {
        assert_eq!(
            NetworkObservation::offline().classify(),
            ConnectivityState::Offline
        );
        assert_eq!(
            NetworkObservation::reachable("wifi").classify(),
            ConnectivityState::OnlineReachable
        );
        assert_eq!(
            NetworkObservation::unreachable("cellular").classify(),
            ConnectivityState::OnlineUnreachable
        );

        let pending = NetworkObservation {
            is_connected: true,
            is_internet_reachable: None,
            transport: None,
        };
        assert_eq!(pending.classify(), ConnectivityState::OnlineUnreachable);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot =
            ConnectivitySnapshot::from_observation(&NetworkObservation::reachable("wifi"), Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "online_reachable");
        assert_eq!(json["isInternetReachable"], true);
        assert!(json.get("changedAt").is_some());
    }
}
