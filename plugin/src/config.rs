use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::orchestrator::{DEFAULT_LINK_BASE, InviteSettings};
use crate::roster::ROSTER_KEY;
use crate::template::{DEFAULT_TEMPLATE, InviteTemplate};

/// Plugin configuration, loaded from invite-friends.toml. Read once at
/// startup, so edits take effect on restart.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PluginConfig {
    pub invite: InviteSection,
    pub storage: StorageSection,
    pub host: HostSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InviteSection {
    /// Message sent to the contact. Supports `${channel.name}` and `${inviteLink}`.
    pub message_template: String,
    pub link_base: String,
    pub restore_delay_ms: u64,
    pub max_age_secs: Option<u64>,
    pub max_uses: Option<u32>,
}

impl Default for InviteSection {
    fn default() -> Self {
        Self {
            message_template: DEFAULT_TEMPLATE.into(),
            link_base: DEFAULT_LINK_BASE.into(),
            restore_delay_ms: 3000,
            max_age_secs: None,
            max_uses: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub database_url: String,
    pub roster_key: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database_url: "sqlite:invite-friends.db?mode=rwc".into(),
            roster_key: ROSTER_KEY.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HostSection {
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".into(),
            token: None,
        }
    }
}

impl PluginConfig {
    /// Load config from a TOML file, falling back to defaults if it doesn't
    /// exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
            Self::parse(path, &contents)?
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("INVITE_MESSAGE_TEMPLATE") {
            self.invite.message_template = v;
        }
        if let Ok(v) = std::env::var("INVITE_LINK_BASE") {
            self.invite.link_base = v;
        }
        if let Ok(v) = std::env::var("INVITE_RESTORE_DELAY_MS")
            && let Ok(ms) = v.parse()
        {
            self.invite.restore_delay_ms = ms;
        }
        if let Ok(v) = std::env::var("DATABASE_URL") {
            self.storage.database_url = v;
        }
        if let Ok(v) = std::env::var("HOST_API_URL") {
            self.host.api_url = v;
        }
        if let Ok(v) = std::env::var("HOST_TOKEN") {
            self.host.token = Some(v);
        }
    }

    /// Convert into the orchestrator's settings.
    pub fn invite_settings(&self) -> InviteSettings {
        InviteSettings {
            template: InviteTemplate::new(self.invite.message_template.clone()),
            link_base: self.invite.link_base.clone(),
            restore_delay: Duration::from_millis(self.invite.restore_delay_ms),
            invite_options: crate::host::InviteOptions {
                max_age_secs: self.invite.max_age_secs,
                max_uses: self.invite.max_uses,
            },
        }
    }
}
