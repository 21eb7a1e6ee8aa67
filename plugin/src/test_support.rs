//! Recording fakes for every host collaborator, plus a harness wiring them
//! into a roster, orchestrator and menu contributor.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::{HostError, StoreError};
use crate::host::{
    CreatedInvite, InviteOptions, InviteService, Messenger, Navigator, Notification, Notifier,
    SelectionProvider,
};
use crate::menu::MenuContributor;
use crate::model::{ChannelKind, ChannelRef, UserRef};
use crate::navigation::NavigationMemory;
use crate::orchestrator::{InviteCollaborators, InviteOrchestrator, InviteSettings};
use crate::permissions::{Permissions, StaticPermissions};
use crate::roster::{ROSTER_KEY, RosterStore};
use crate::store::{KeyValueStore, MemoryStore};
use crate::template::InviteTemplate;

pub fn voice_room(id: &str, name: &str) -> ChannelRef {
    ChannelRef {
        id: id.into(),
        name: name.into(),
        kind: ChannelKind::Voice,
        guild_id: Some("g1".into()),
    }
}

pub fn dm_channel(id: &str) -> ChannelRef {
    ChannelRef {
        id: id.into(),
        name: String::new(),
        kind: ChannelKind::DirectMessage,
        guild_id: None,
    }
}

pub fn user(id: &str, username: &str) -> UserRef {
    UserRef {
        id: id.into(),
        username: username.into(),
    }
}

/// Yield to other tasks until `cond` holds.
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn transition_to(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct TestSelection {
    guild: Mutex<Option<String>>,
    channel: Mutex<Option<String>>,
}

impl TestSelection {
    pub fn set(&self, guild: Option<&str>, channel: Option<&str>) {
        *self.guild.lock().unwrap() = guild.map(String::from);
        *self.channel.lock().unwrap() = channel.map(String::from);
    }
}

impl SelectionProvider for TestSelection {
    fn current_channel_id(&self) -> Option<String> {
        self.channel.lock().unwrap().clone()
    }

    fn current_guild_id(&self) -> Option<String> {
        self.guild.lock().unwrap().clone()
    }
}

/// Returns invite code `abc`. When gated, each call waits for a permit.
pub struct FakeInvites {
    calls: AtomicUsize,
    fail: AtomicBool,
    gated: AtomicBool,
    gate: Semaphore,
}

impl Default for FakeInvites {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }
}

impl FakeInvites {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl InviteService for FakeInvites {
    async fn create_invite(
        &self,
        _channel_id: &str,
        _options: &InviteOptions,
    ) -> Result<CreatedInvite, HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.unwrap().forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::Unavailable("invite service down".into()));
        }
        Ok(CreatedInvite { code: "abc".into() })
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    opened: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
    fail_open: AtomicBool,
    fail_send: AtomicBool,
}

impl FakeMessenger {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_open(&self) {
        self.fail_open.store(true, Ordering::SeqCst);
    }

    pub fn fail_send(&self) {
        self.fail_send.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn open_direct_conversation(&self, user_id: &str) -> Result<String, HostError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(HostError::Unavailable("cannot open dm".into()));
        }
        self.opened.lock().unwrap().push(user_id.to_string());
        Ok(format!("dm-{user_id}"))
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), HostError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(HostError::Status {
                status: 500,
                body: "send failed".into(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), content.to_string()));
        Ok(())
    }
}

/// A store whose backing database is gone.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub roster: Arc<RosterStore>,
    pub permissions: Arc<StaticPermissions>,
    pub invites: Arc<FakeInvites>,
    pub messenger: Arc<FakeMessenger>,
    pub selection: Arc<TestSelection>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub orchestrator: Arc<InviteOrchestrator>,
    pub menu: MenuContributor,
}

impl Harness {
    pub fn new(template: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        let roster = Arc::new(RosterStore::new(store.clone(), ROSTER_KEY));
        let permissions = Arc::new(StaticPermissions::new(Permissions::CREATE_INVITES));
        let invites = Arc::new(FakeInvites::default());
        let messenger = Arc::new(FakeMessenger::default());
        let selection = Arc::new(TestSelection::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let memory = Arc::new(NavigationMemory::new(navigator.clone()));
        let orchestrator = Arc::new(InviteOrchestrator::new(
            InviteCollaborators {
                permissions: permissions.clone(),
                invites: invites.clone(),
                messenger: messenger.clone(),
                selection: selection.clone(),
                notifier: notifier.clone(),
            },
            memory,
            InviteSettings {
                template: InviteTemplate::new(template),
                ..InviteSettings::default()
            },
        ));
        let menu = MenuContributor::new(roster.clone(), orchestrator.clone(), notifier.clone());

        Self {
            store,
            roster,
            permissions,
            invites,
            messenger,
            selection,
            notifier,
            navigator,
            orchestrator,
            menu,
        }
    }
}
