use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use invite_friends::config::PluginConfig;
use invite_friends::host::console::{ConsoleNotifier, FixedSelection, LoggingNavigator};
use invite_friends::host::http::HttpHost;
use invite_friends::menu::{ActionOutcome, MenuAction, MenuContributor, MenuItem, RoomMenuContext};
use invite_friends::model::{ChannelKind, ChannelRef, Contact};
use invite_friends::navigation::NavigationMemory;
use invite_friends::orchestrator::{InviteCollaborators, InviteOrchestrator};
use invite_friends::roster::RosterStore;
use invite_friends::store::SqliteStore;

#[derive(Parser)]
#[command(name = "invite-friends", about = "Invite rostered friends to a voice channel")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "invite-friends.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the roster in menu order.
    List,
    /// Add a contact to the roster.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        user_id: String,
        /// Direct conversation channel with this contact.
        #[arg(long)]
        dm_channel: String,
    },
    /// Remove a contact from the roster.
    Remove {
        #[arg(long)]
        user_id: String,
    },
    /// Empty the roster.
    Clear,
    /// Print the channel menu entries the roster produces.
    Menu {
        #[arg(long)]
        channel_id: String,
        #[arg(long)]
        name: String,
        /// Host channel type code (2 = voice).
        #[arg(long, default_value_t = 2)]
        kind: u8,
    },
    /// Invite a rostered contact to a voice channel.
    Invite {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        channel_id: String,
        #[arg(long)]
        channel_name: String,
        #[arg(long)]
        guild_id: String,
        /// Channel to return to afterwards.
        #[arg(long)]
        from_channel: Option<String>,
        /// Guild to return to afterwards.
        #[arg(long)]
        from_guild: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PluginConfig::load(&cli.config)?;

    let store = Arc::new(
        SqliteStore::connect(&config.storage.database_url)
            .await
            .context("failed to open roster store")?,
    );
    let roster = Arc::new(RosterStore::new(store, config.storage.roster_key.clone()));
    if let Err(e) = roster.load().await {
        warn!(error = %e, "failed to load roster, starting empty");
    }

    let (from_channel, from_guild) = match &cli.command {
        Command::Invite {
            from_channel,
            from_guild,
            ..
        } => (from_channel.clone(), from_guild.clone()),
        _ => (None, None),
    };

    let host = Arc::new(HttpHost::new(
        config.host.api_url.clone(),
        config.host.token.clone(),
    ));
    let notifier = Arc::new(ConsoleNotifier);
    let memory = Arc::new(NavigationMemory::new(Arc::new(LoggingNavigator)));
    let orchestrator = Arc::new(InviteOrchestrator::new(
        InviteCollaborators {
            permissions: host.clone(),
            invites: host.clone(),
            messenger: host,
            selection: Arc::new(FixedSelection {
                channel_id: from_channel,
                guild_id: from_guild,
            }),
            notifier: notifier.clone(),
        },
        memory,
        config.invite_settings(),
    ));
    let menu = MenuContributor::new(roster.clone(), orchestrator, notifier);

    match cli.command {
        Command::List => {
            for (index, contact) in roster.snapshot().iter().enumerate() {
                println!(
                    "{index}: {} ({}) dm={}",
                    contact.display_name, contact.user_id, contact.direct_channel_id
                );
            }
        }
        Command::Add {
            name,
            user_id,
            dm_channel,
        } => {
            menu.activate(MenuAction::AddContact(Contact::new(name, user_id, dm_channel)))
                .await;
        }
        Command::Remove { user_id } => {
            let Some(contact) = roster
                .snapshot()
                .into_iter()
                .find(|c| c.user_id == user_id)
            else {
                println!("{user_id} is not in invite friends");
                return Ok(());
            };
            menu.activate(MenuAction::RemoveContact(contact)).await;
        }
        Command::Clear => {
            menu.activate(MenuAction::ClearRoster).await;
        }
        Command::Menu {
            channel_id,
            name,
            kind,
        } => {
            let mut children = Vec::new();
            menu.contribute_room_menu(
                &mut children,
                &RoomMenuContext {
                    channel: Some(ChannelRef {
                        id: channel_id,
                        name,
                        kind: ChannelKind::from_code(kind),
                        guild_id: None,
                    }),
                },
            );
            print_menu(&children, 0);
        }
        Command::Invite {
            user_id,
            channel_id,
            channel_name,
            guild_id,
            ..
        } => {
            let contact = roster
                .snapshot()
                .into_iter()
                .find(|c| c.user_id == user_id)
                .with_context(|| format!("{user_id} is not in invite friends"))?;
            let room = ChannelRef {
                id: channel_id,
                name: channel_name,
                kind: ChannelKind::Voice,
                guild_id: Some(guild_id),
            };
            match menu.activate(MenuAction::Invite { contact, room }).await {
                ActionOutcome::Invited(receipt) => {
                    info!("waiting to navigate back");
                    receipt.restore.await.context("navigation restore task failed")?;
                }
                ActionOutcome::InviteFailed(e) => return Err(e.into()),
                ActionOutcome::RosterUpdated { .. } => {}
            }
        }
    }

    Ok(())
}

fn print_menu(items: &[MenuItem], depth: usize) {
    for item in items {
        println!("{:indent$}- {} [{}]", "", item.label, item.id, indent = depth * 2);
        print_menu(&item.children, depth + 1);
    }
}
