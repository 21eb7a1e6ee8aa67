//! Collaborators provided by the host application. The core only ever talks
//! to these traits; `http` and `console` are the adapters the binary uses.

pub mod console;
pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::HostError;

/// Result of a successful invite creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedInvite {
    pub code: String,
}

/// Options forwarded to the invite service. Empty means host defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteOptions {
    pub max_age_secs: Option<u64>,
    pub max_uses: Option<u32>,
}

#[async_trait]
pub trait InviteService: Send + Sync {
    async fn create_invite(
        &self,
        channel_id: &str,
        options: &InviteOptions,
    ) -> Result<CreatedInvite, HostError>;
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Open, or reuse, the direct conversation with `user_id`. Returns its channel id.
    async fn open_direct_conversation(&self, user_id: &str) -> Result<String, HostError>;

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), HostError>;
}

pub trait Navigator: Send + Sync {
    fn transition_to(&self, path: &str);
}

/// The channel and guild the user is currently looking at.
pub trait SelectionProvider: Send + Sync {
    fn current_channel_id(&self) -> Option<String>;
    fn current_guild_id(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
}

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity: Severity::Failure,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}
