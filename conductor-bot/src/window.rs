//! # Conversation window store
//!
//! Remembers, per user, the last answered question and the bot's answer so both can be deleted
//! when the next question arrives. Entries live in a sharded map; each entry sits behind its own
//! async mutex, so turns of one user run one after another while different users never wait on
//! each other.
//!
//! The store is bounded: windows older than the TTL read as absent and are swept periodically,
//! and when `max_users` is reached the least recently touched idle entries are evicted.

use std::sync::Arc;
use std::time::Duration;

use conductor_core::Chat;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Telegram only lets bots delete messages younger than 48 hours.
pub const DEFAULT_WINDOW_TTL: Duration = Duration::from_secs(48 * 60 * 60);
pub const DEFAULT_MAX_USERS: usize = 10_000;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// The most recent question/answer pair of one user. Both ids are always set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationWindow {
    pub chat: Chat,
    pub question_message_id: String,
    pub answer_message_id: String,
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub ttl: Duration,
    pub max_users: usize,
    pub sweep_interval: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_WINDOW_TTL,
            max_users: DEFAULT_MAX_USERS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct Slot {
    window: Option<ConversationWindow>,
    touched: Instant,
}

impl Slot {
    fn new() -> Self {
        Self {
            window: None,
            touched: Instant::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        self.window.is_none() || self.touched.elapsed() >= ttl
    }
}

/// Exclusive access to one user's window for the duration of a turn.
pub struct WindowGuard {
    slot: OwnedMutexGuard<Slot>,
}

impl WindowGuard {
    pub fn window(&self) -> Option<&ConversationWindow> {
        self.slot.window.as_ref()
    }

    /// Replaces the stored pair in one step and restarts its TTL.
    pub fn replace(&mut self, window: ConversationWindow) {
        self.slot.window = Some(window);
        self.slot.touched = Instant::now();
    }
}

pub struct WindowStore {
    slots: DashMap<i64, Arc<Mutex<Slot>>>,
    config: WindowConfig,
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}

impl WindowStore {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            slots: DashMap::new(),
            config,
        }
    }

    /// Waits for and takes the user's slot, creating it on first use. A window older than the
    /// TTL is dropped before the guard is returned.
    pub async fn lock(&self, user_id: i64) -> WindowGuard {
        if !self.slots.contains_key(&user_id) {
            self.make_room();
        }
        let slot = self
            .slots
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(Slot::new())))
            .clone();

        let mut slot = slot.lock_owned().await;
        if slot.window.is_some() && slot.touched.elapsed() >= self.config.ttl {
            debug!(user_id, "Conversation window expired");
            slot.window = None;
        }
        WindowGuard { slot }
    }

    /// Current window of `user_id`, if any and not expired. Waits for an in-flight turn.
    pub async fn get(&self, user_id: i64) -> Option<ConversationWindow> {
        let slot = self.slots.get(&user_id).map(|entry| entry.value().clone())?;
        let slot = slot.lock().await;
        if slot.touched.elapsed() >= self.config.ttl {
            return None;
        }
        slot.window.clone()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes idle entries that are expired or hold no window. Entries with a turn in flight
    /// are kept. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let ttl = self.config.ttl;
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(s) => !s.is_stale(ttl),
                Err(_) => true,
            }
        });
        before.saturating_sub(self.slots.len())
    }

    /// Sweeps, then evicts the least recently touched idle entries until there is room for one
    /// more user.
    fn make_room(&self) {
        if self.slots.len() < self.config.max_users {
            return;
        }
        self.sweep();
        let excess = (self.slots.len() + 1).saturating_sub(self.config.max_users);
        if excess == 0 {
            return;
        }

        let mut idle: Vec<(i64, Instant)> = self
            .slots
            .iter()
            .filter(|entry| Arc::strong_count(entry.value()) == 1)
            .filter_map(|entry| {
                let touched = entry.value().try_lock().ok()?.touched;
                Some((*entry.key(), touched))
            })
            .collect();
        idle.sort_by_key(|(_, touched)| *touched);

        let mut evicted = 0;
        for (user_id, _) in idle {
            if evicted == excess {
                break;
            }
            let removed = self.slots.remove_if(&user_id, |_, slot| {
                Arc::strong_count(slot) == 1 && slot.try_lock().is_ok()
            });
            if removed.is_some() {
                evicted += 1;
            }
        }
        info!(evicted, max_users = self.config.max_users, "Window store at capacity");
    }

    /// Runs [`WindowStore::sweep`] every `sweep_interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        let period = self.config.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = self.sweep();
                if removed > 0 {
                    debug!(removed, remaining = self.len(), "Swept conversation windows");
                }
            }
        })
    }
}
