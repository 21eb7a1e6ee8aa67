use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{InviteError, StoreError};
use crate::host::{Notification, Notifier};
use crate::model::{ChannelRef, Contact, UserRef};
use crate::orchestrator::{InviteOrchestrator, InviteReceipt};
use crate::roster::RosterStore;

/// Index a contributed entry is first inserted at.
pub const INSERT_INDEX: usize = 1;
/// Index the entry is moved to once the host menu holds more than two entries.
pub const DISPLAY_INDEX: usize = 2;

/// Number of distinct per-contact style classes (`user1` .. `user19`).
const CONTACT_STYLE_CLASSES: usize = 19;

/// What activating a menu entry does. Entries carry data, not closures, so the
/// host can hold them freely and hand them back to [`MenuContributor::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Invite { contact: Contact, room: ChannelRef },
    ClearRoster,
    AddContact(Contact),
    RemoveContact(Contact),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub class_name: Option<String>,
    pub action: Option<MenuAction>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            class_name: None,
            action: None,
            children: Vec::new(),
        }
    }

    fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    fn action(mut self, action: MenuAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Context for the channel menu.
#[derive(Debug, Clone, Default)]
pub struct RoomMenuContext {
    pub channel: Option<ChannelRef>,
}

/// Context for the user menu. `channel` is the conversation it was opened from.
#[derive(Debug, Clone, Default)]
pub struct UserMenuContext {
    pub user: Option<UserRef>,
    pub channel: Option<ChannelRef>,
}

#[derive(Debug)]
pub enum ActionOutcome {
    Invited(InviteReceipt),
    InviteFailed(InviteError),
    RosterUpdated { changed: bool },
}

/// Insert `item` at [`INSERT_INDEX`] and, when the menu then holds more than
/// two entries, move it to [`DISPLAY_INDEX`]. Hosts that want the same visual
/// order must apply exactly this rule.
pub fn insert_entry(children: &mut Vec<MenuItem>, item: MenuItem) {
    let at = INSERT_INDEX.min(children.len());
    children.insert(at, item);
    if children.len() > DISPLAY_INDEX {
        let item = children.remove(INSERT_INDEX);
        children.insert(DISPLAY_INDEX, item);
    }
}

/// Projects the roster into host menus and carries out their actions.
pub struct MenuContributor {
    roster: Arc<RosterStore>,
    orchestrator: Arc<InviteOrchestrator>,
    notifier: Arc<dyn Notifier>,
}

impl MenuContributor {
    pub fn new(
        roster: Arc<RosterStore>,
        orchestrator: Arc<InviteOrchestrator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            roster,
            orchestrator,
            notifier,
        }
    }

    /// Add the "Invite Friends" submenu to a voice channel's menu.
    pub fn contribute_room_menu(&self, children: &mut Vec<MenuItem>, ctx: &RoomMenuContext) {
        let Some(room) = ctx.channel.as_ref().filter(|c| c.is_voice()) else {
            return;
        };

        let mut submenu =
            MenuItem::new("invite-friends", "Invite Friends").class("invite-friends-button");
        for (index, contact) in self.roster.snapshot().into_iter().enumerate() {
            submenu.children.push(
                MenuItem::new(
                    format!("invite-friends-{index}"),
                    format!("Invite {}", contact.display_name),
                )
                .class(format!("user{}", (index % CONTACT_STYLE_CLASSES) + 1))
                .action(MenuAction::Invite {
                    contact,
                    room: room.clone(),
                }),
            );
        }
        submenu.children.push(
            MenuItem::new("clear-friends-list", "Clear List")
                .class("clear-friends-list-button")
                .action(MenuAction::ClearRoster),
        );

        insert_entry(children, submenu);
    }

    /// Add the add/remove toggle to a user's menu inside their direct conversation.
    pub fn contribute_user_menu(&self, children: &mut Vec<MenuItem>, ctx: &UserMenuContext) {
        let (Some(user), Some(channel)) = (ctx.user.as_ref(), ctx.channel.as_ref()) else {
            return;
        };
        if !channel.is_direct() {
            return;
        }

        let contact = Contact::new(&user.username, &user.id, &channel.id);
        let entry = if self.roster.contains_user(&user.id) {
            MenuItem::new("add-to-invite-friends", "Remove from invite friends")
                .class("remove-to-invite-friends-button")
                .action(MenuAction::RemoveContact(contact))
        } else {
            MenuItem::new("add-to-invite-friends", "Add to invite friends")
                .class("add-to-invite-friends-button")
                .action(MenuAction::AddContact(contact))
        };

        insert_entry(children, entry);
    }

    /// Run the action behind an activated entry. Each action shows exactly one
    /// notification. Persistence failures are logged; the in-memory roster
    /// keeps the change.
    pub async fn activate(&self, action: MenuAction) -> ActionOutcome {
        match action {
            MenuAction::Invite { contact, room } => {
                match self.orchestrator.invite_contact(&contact, &room).await {
                    Ok(receipt) => ActionOutcome::Invited(receipt),
                    Err(e) => ActionOutcome::InviteFailed(e),
                }
            }
            MenuAction::ClearRoster => {
                let changed = settle("clear", self.roster.clear().await.map(|_| true));
                self.notifier
                    .show(Notification::failure("Friends list was cleared"));
                ActionOutcome::RosterUpdated { changed }
            }
            MenuAction::AddContact(contact) => {
                let name = contact.display_name.clone();
                let changed = settle("add", self.roster.add(contact).await);
                let message = if changed {
                    format!("{name} was added to invite friends")
                } else {
                    debug!(name = %name, "contact already rostered");
                    format!("{name} is already in invite friends")
                };
                self.notifier.show(Notification::success(message));
                ActionOutcome::RosterUpdated { changed }
            }
            MenuAction::RemoveContact(contact) => {
                let changed = settle("remove", self.roster.remove(&contact).await);
                self.notifier.show(Notification::failure(format!(
                    "{} was removed from invite friends",
                    contact.display_name
                )));
                ActionOutcome::RosterUpdated { changed }
            }
        }
    }
}

/// A failed save still means the in-memory roster changed.
fn settle(op: &str, result: Result<bool, StoreError>) -> bool {
    result.unwrap_or_else(|e| {
        warn!(op, error = %e, "failed to persist roster");
        true
    })
}
