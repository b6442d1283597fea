use serde::{Deserialize, Serialize};
use std::fmt;

/// Reachability as classified by the connectivity monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    #[default]
    Unknown,
    Offline,
    /// Link layer is up but internet reachability is unconfirmed (captive portal, etc).
    OnlineUnreachable,
    OnlineReachable,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Unknown => "unknown",
            ConnectivityState::Offline => "offline",
            ConnectivityState::OnlineUnreachable => "online_unreachable",
            ConnectivityState::OnlineReachable => "online_reachable",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectivityState::OnlineReachable)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
