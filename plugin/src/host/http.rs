use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CreatedInvite, InviteOptions, InviteService, Messenger};
use crate::error::HostError;
use crate::model::ChannelRef;
use crate::permissions::{PermissionAuthority, Permissions};

#[derive(Serialize)]
struct CreateInviteBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_uses: Option<u32>,
}

#[derive(Deserialize)]
struct InviteResponse {
    code: String,
}

#[derive(Serialize)]
struct OpenDmBody<'a> {
    recipient_id: &'a str,
}

#[derive(Deserialize)]
struct ChannelResponse {
    id: String,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct PermissionsResponse {
    permissions: u64,
}

/// REST client for the chat host's API. Implements every remote collaborator
/// the invite workflow needs.
#[derive(Clone)]
pub struct HttpHost {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpHost {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.header(reqwest::header::AUTHORIZATION, token),
            None => builder,
        }
    }

    /// Send a request and map non-2xx responses to `HostError::Status`.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, HostError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HostError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl InviteService for HttpHost {
    async fn create_invite(
        &self,
        channel_id: &str,
        options: &InviteOptions,
    ) -> Result<CreatedInvite, HostError> {
        let body = CreateInviteBody {
            max_age: options.max_age_secs,
            max_uses: options.max_uses,
        };
        let resp = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("/channels/{channel_id}/invites"),
                )
                .json(&body),
            )
            .await?;
        let invite: InviteResponse = resp.json().await?;
        debug!(channel_id, code = %invite.code, "invite created");
        Ok(CreatedInvite { code: invite.code })
    }
}

#[async_trait]
impl Messenger for HttpHost {
    async fn open_direct_conversation(&self, user_id: &str) -> Result<String, HostError> {
        let resp = self
            .send(
                self.request(reqwest::Method::POST, "/users/@me/channels")
                    .json(&OpenDmBody {
                        recipient_id: user_id,
                    }),
            )
            .await?;
        let channel: ChannelResponse = resp.json().await?;
        Ok(channel.id)
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), HostError> {
        self.send(
            self.request(
                reqwest::Method::POST,
                &format!("/channels/{channel_id}/messages"),
            )
            .json(&MessageBody { content }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PermissionAuthority for HttpHost {
    async fn can(&self, needed: Permissions, channel: &ChannelRef) -> bool {
        let path = format!("/channels/{}/permissions", channel.id);
        let result = async {
            let resp = self.send(self.request(reqwest::Method::GET, &path)).await?;
            let body: PermissionsResponse = resp.json().await?;
            Ok::<_, HostError>(Permissions::from_bits_truncate(body.permissions))
        }
        .await;

        match result {
            Ok(perms) => perms.allows(needed),
            Err(e) => {
                warn!(channel_id = %channel.id, error = %e, "permission lookup failed, treating as denied");
                false
            }
        }
    }
}
