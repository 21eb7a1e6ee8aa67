use serde::{Deserialize, Serialize};

/// One rosterable person. Serialized with the host's camelCase field names so
/// the stored roster stays readable by other clients of the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub display_name: String,
    pub user_id: String,
    /// Channel used to message this contact directly.
    pub direct_channel_id: String,
}

impl Contact {
    pub fn new(
        display_name: impl Into<String>,
        user_id: impl Into<String>,
        direct_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            user_id: user_id.into(),
            direct_channel_id: direct_channel_id.into(),
        }
    }
}

/// Where the user was before an invite action started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAnchor {
    pub guild_id: String,
    pub channel_id: String,
}

impl NavigationAnchor {
    pub fn new(guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Router path understood by the host's navigation service.
    pub fn path(&self) -> String {
        format!("/channels/{}/{}", self.guild_id, self.channel_id)
    }
}

/// Host channel types. Numeric codes follow the host's wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    DirectMessage,
    Voice,
    Other(u8),
}

impl ChannelKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Text,
            1 => Self::DirectMessage,
            2 => Self::Voice,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Text => 0,
            Self::DirectMessage => 1,
            Self::Voice => 2,
            Self::Other(code) => *code,
        }
    }
}

/// Read-only view of a channel as handed to menu callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub guild_id: Option<String>,
}

impl ChannelRef {
    pub fn is_voice(&self) -> bool {
        self.kind == ChannelKind::Voice
    }

    pub fn is_direct(&self) -> bool {
        self.kind == ChannelKind::DirectMessage
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}
