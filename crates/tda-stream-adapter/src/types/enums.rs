/*
[INPUT]:  Streamer protocol verbs and level codes
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for streamer communication
[UPDATE]: When the streamer protocol adds commands or levels
*/

use serde::{Deserialize, Serialize};

/// Control verb applied to a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Subs,
    Unsubs,
    Login,
    Logout,
    Qos,
}

impl Command {
    pub const fn as_str(self) -> &'static str {
        match self {
            Command::Subs => "SUBS",
            Command::Unsubs => "UNSUBS",
            Command::Login => "LOGIN",
            Command::Logout => "LOGOUT",
            Command::Qos => "QOS",
        }
    }
}

/// Server-side update cadence, fastest to slowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QosLevel {
    /// 500ms between updates. Fastest available
    Express,
    /// 750ms between updates
    RealTime,
    /// 1000ms between updates. Default value
    #[default]
    Fast,
    /// 1500ms between updates
    Moderate,
    /// 3000ms between updates
    Slow,
    /// 5000ms between updates
    Delayed,
}

impl QosLevel {
    /// Single-character level code sent in the QOS request
    pub const fn code(self) -> &'static str {
        match self {
            QosLevel::Express => "0",
            QosLevel::RealTime => "1",
            QosLevel::Fast => "2",
            QosLevel::Moderate => "3",
            QosLevel::Slow => "4",
            QosLevel::Delayed => "5",
        }
    }

    /// Approximate update interval the level selects
    pub const fn update_interval_ms(self) -> u64 {
        match self {
            QosLevel::Express => 500,
            QosLevel::RealTime => 750,
            QosLevel::Fast => 1000,
            QosLevel::Moderate => 1500,
            QosLevel::Slow => 3000,
            QosLevel::Delayed => 5000,
        }
    }
}

/// Liveness of one streamer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No socket, or the session was terminated
    #[default]
    Disconnected,
    /// Socket open, login not (or no longer) accepted
    Connected,
    /// Login accepted with code 0
    LoggedIn,
}
