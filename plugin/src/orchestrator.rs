use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::InviteError;
use crate::host::{
    InviteOptions, InviteService, Messenger, Notification, Notifier, SelectionProvider,
};
use crate::model::{ChannelRef, Contact, NavigationAnchor};
use crate::navigation::NavigationMemory;
use crate::permissions::{PermissionAuthority, Permissions};
use crate::template::InviteTemplate;

/// How long the success toast stays visible before navigating back.
pub const DEFAULT_RESTORE_DELAY: Duration = Duration::from_secs(3);

pub const DEFAULT_LINK_BASE: &str = "https://discord.gg";

/// Host services the invite workflow calls out to.
pub struct InviteCollaborators {
    pub permissions: Arc<dyn PermissionAuthority>,
    pub invites: Arc<dyn InviteService>,
    pub messenger: Arc<dyn Messenger>,
    pub selection: Arc<dyn SelectionProvider>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone)]
pub struct InviteSettings {
    pub template: InviteTemplate,
    /// Invite links are `{link_base}/{code}`.
    pub link_base: String,
    pub restore_delay: Duration,
    pub invite_options: InviteOptions,
}

impl Default for InviteSettings {
    fn default() -> Self {
        Self {
            template: InviteTemplate::default(),
            link_base: DEFAULT_LINK_BASE.to_string(),
            restore_delay: DEFAULT_RESTORE_DELAY,
            invite_options: InviteOptions::default(),
        }
    }
}

/// One in-flight invite action.
#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub contact: Contact,
    pub room: ChannelRef,
    /// Location captured when the action began.
    pub anchor: Option<NavigationAnchor>,
}

/// What a successful invite produced.
#[derive(Debug)]
pub struct InviteReceipt {
    pub room_name: String,
    pub invite_link: String,
    pub message: String,
    /// Location captured when the action began; the restore returns there
    /// unless a later invite overwrote the shared anchor first.
    pub anchor: Option<NavigationAnchor>,
    /// The pending navigation restore. Dropping the handle does not cancel it.
    pub restore: JoinHandle<()>,
}

/// Drives the invite-a-contact-to-a-room workflow.
pub struct InviteOrchestrator {
    host: InviteCollaborators,
    memory: Arc<NavigationMemory>,
    settings: InviteSettings,
}

impl InviteOrchestrator {
    pub fn new(
        host: InviteCollaborators,
        memory: Arc<NavigationMemory>,
        settings: InviteSettings,
    ) -> Self {
        Self {
            host,
            memory,
            settings,
        }
    }

    pub fn memory(&self) -> &Arc<NavigationMemory> {
        &self.memory
    }

    /// Capture the current location and remember it before anything else runs.
    fn begin(&self, contact: &Contact, room: &ChannelRef) -> InviteRequest {
        let anchor = match (
            self.host.selection.current_guild_id(),
            self.host.selection.current_channel_id(),
        ) {
            (Some(guild_id), Some(channel_id)) => Some(NavigationAnchor {
                guild_id,
                channel_id,
            }),
            _ => None,
        };
        self.memory.remember(anchor.clone());
        InviteRequest {
            contact: contact.clone(),
            room: room.clone(),
            anchor,
        }
    }

    /// Invite `contact` to `room`: check permission, create the invite, message
    /// the contact, notify, then schedule the navigation restore.
    ///
    /// Every outcome produces exactly one notification. Failures are reported
    /// and returned; nothing after the failing step runs.
    pub async fn invite_contact(
        &self,
        contact: &Contact,
        room: &ChannelRef,
    ) -> Result<InviteReceipt, InviteError> {
        let request = self.begin(contact, room);

        match self.run(&request).await {
            Ok((invite_link, message)) => {
                self.host.notifier.show(Notification::success(format!(
                    "Invite created for {}: {}",
                    room.name, invite_link
                )));
                let restore = self.schedule_restore();
                let return_to = request.anchor.as_ref().map(NavigationAnchor::path);
                info!(
                    user_id = %contact.user_id,
                    channel_id = %room.id,
                    link = %invite_link,
                    return_to = ?return_to,
                    "invite sent"
                );
                Ok(InviteReceipt {
                    room_name: room.name.clone(),
                    invite_link,
                    message,
                    anchor: request.anchor,
                    restore,
                })
            }
            Err(e) => {
                warn!(
                    user_id = %contact.user_id,
                    channel_id = %room.id,
                    step = e.step(),
                    return_to = ?request.anchor.as_ref().map(NavigationAnchor::path),
                    error = %e,
                    "invite workflow aborted"
                );
                self.host.notifier.show(Notification::failure(e.notice()));
                Err(e)
            }
        }
    }

    async fn run(&self, request: &InviteRequest) -> Result<(String, String), InviteError> {
        let InviteRequest { contact, room, .. } = request;

        if !self
            .host
            .permissions
            .can(Permissions::CREATE_INVITES, room)
            .await
        {
            return Err(InviteError::PermissionDenied {
                room: room.name.clone(),
            });
        }

        let invite = self
            .host
            .invites
            .create_invite(&room.id, &self.settings.invite_options)
            .await
            .map_err(InviteError::CreateInvite)?;

        let opened = self
            .host
            .messenger
            .open_direct_conversation(&contact.user_id)
            .await
            .map_err(InviteError::OpenConversation)?;
        if opened != contact.direct_channel_id {
            debug!(
                stored = %contact.direct_channel_id,
                opened = %opened,
                "direct channel differs from rostered one"
            );
        }

        let invite_link = format!(
            "{}/{}",
            self.settings.link_base.trim_end_matches('/'),
            invite.code
        );
        let message = self.settings.template.render(&room.name, &invite_link);
        self.host
            .messenger
            .send_message(&contact.direct_channel_id, &message)
            .await
            .map_err(InviteError::SendMessage)?;

        Ok((invite_link, message))
    }

    fn schedule_restore(&self) -> JoinHandle<()> {
        let memory = self.memory.clone();
        let delay = self.settings.restore_delay;
        debug!(delay_ms = delay.as_millis() as u64, "navigation restore scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            memory.restore();
        })
    }
}
