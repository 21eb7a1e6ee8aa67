//! Error types shared across the roster, host adapters and invite workflow.

use thiserror::Error;

/// Durable key-value storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("roster serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by a host collaborator (REST API, router, ...).
#[derive(Debug, Error)]
pub enum HostError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("host returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Generic text shown for any remote step of the invite workflow.
pub const INVITE_FAILED_NOTICE: &str = "Failed to create invite";

/// Why an invite workflow stopped. One variant per step so the failing step is
/// never ambiguous in logs, even though users see a single generic notice.
#[derive(Debug, Error)]
pub enum InviteError {
    #[error("missing invite permission for {room}")]
    PermissionDenied { room: String },

    #[error("invite creation failed: {0}")]
    CreateInvite(#[source] HostError),

    #[error("opening direct conversation failed: {0}")]
    OpenConversation(#[source] HostError),

    #[error("sending invite message failed: {0}")]
    SendMessage(#[source] HostError),
}

impl InviteError {
    /// User-visible notification text.
    pub fn notice(&self) -> String {
        match self {
            Self::PermissionDenied { room } => {
                format!("You don't have permission to create an invite for {room}")
            }
            Self::CreateInvite(_) | Self::OpenConversation(_) | Self::SendMessage(_) => {
                INVITE_FAILED_NOTICE.to_string()
            }
        }
    }

    /// Short step name used as a structured log field.
    pub fn step(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "permission",
            Self::CreateInvite(_) => "create_invite",
            Self::OpenConversation(_) => "open_conversation",
            Self::SendMessage(_) => "send_message",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
