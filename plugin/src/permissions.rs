use async_trait::async_trait;
use bitflags::bitflags;
use dashmap::DashMap;

use crate::model::ChannelRef;

bitflags! {
    /// Channel capability bits as reported by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        const VIEW_CHANNELS   = 1 << 0;
        const CREATE_INVITES  = 1 << 4;
        const ADMINISTRATOR   = 1 << 7;
        const SEND_MESSAGES   = 1 << 10;
        const CONNECT         = 1 << 20;
    }
}

impl Permissions {
    /// Whether `self` grants `needed`. ADMINISTRATOR grants everything.
    pub fn allows(&self, needed: Permissions) -> bool {
        self.contains(Permissions::ADMINISTRATOR) || self.contains(needed)
    }
}

/// Authority answering capability checks for the acting user.
#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    async fn can(&self, needed: Permissions, channel: &ChannelRef) -> bool;
}

/// In-process authority with per-channel grants and a fallback grant.
pub struct StaticPermissions {
    channels: DashMap<String, Permissions>,
    fallback: Permissions,
}

impl StaticPermissions {
    pub fn new(fallback: Permissions) -> Self {
        Self {
            channels: DashMap::new(),
            fallback,
        }
    }

    pub fn grant(&self, channel_id: &str, perms: Permissions) {
        self.channels.insert(channel_id.to_string(), perms);
    }
}

#[async_trait]
impl PermissionAuthority for StaticPermissions {
    async fn can(&self, needed: Permissions, channel: &ChannelRef) -> bool {
        let perms = self
            .channels
            .get(&channel.id)
            .map(|p| *p)
            .unwrap_or(self.fallback);
        perms.allows(needed)
    }
}
