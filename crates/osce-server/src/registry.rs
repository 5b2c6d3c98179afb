//! In-memory registry of live sessions.
//!
//! Each entry pairs the session with a broadcast channel for its events and
//! the driver task that advances its clock. Every mutation goes through
//! [`SessionHandle::with_session`], which publishes whatever events the
//! call produced before releasing the lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use osce_practice::session::{PracticeSession, SessionEvent};

use crate::driver;

const EVENT_CAPACITY: usize = 64;

/// Cheap, cloneable access to one live session.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    /// Bearer subject of the caller that started the session.
    pub owner: String,
    session: Arc<Mutex<PracticeSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Run `f` against the session under its lock, then publish the events
    /// it produced.
    pub async fn with_session<T>(&self, f: impl FnOnce(&mut PracticeSession) -> T) -> T {
        let mut session = self.session.lock().await;
        let out = f(&mut session);
        for event in session.drain_events() {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
        out
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

struct Entry {
    handle: SessionHandle,
    driver: JoinHandle<()>,
}

pub struct SessionRegistry {
    entries: Mutex<HashMap<Uuid, Entry>>,
    tick: Duration,
}

impl SessionRegistry {
    pub fn new(tick: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            tick,
        }
    }

    /// Register a session and start its driver.
    pub async fn insert(self: &Arc<Self>, session: PracticeSession, owner: String) -> SessionHandle {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let handle = SessionHandle {
            id: session.id(),
            owner,
            session: Arc::new(Mutex::new(session)),
            events,
        };

        // Hold the map lock across the spawn so the driver cannot observe a
        // teardown and forget the id before it is inserted.
        let mut entries = self.entries.lock().await;
        let driver = driver::spawn(Arc::clone(self), handle.clone(), self.tick);
        entries.insert(
            handle.id,
            Entry {
                handle: handle.clone(),
                driver,
            },
        );
        tracing::info!(session_id = %handle.id, live = entries.len(), "session registered");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.entries.lock().await.get(&id).map(|e| e.handle.clone())
    }

    /// Tear the session down, stop its driver and drop it from the registry.
    /// Returns `false` if the id was not registered.
    pub async fn close(&self, id: Uuid) -> bool {
        let Some(entry) = self.entries.lock().await.remove(&id) else {
            return false;
        };
        entry.driver.abort();
        entry.handle.with_session(|s| s.teardown()).await;
        tracing::info!(session_id = %id, "session closed");
        true
    }

    /// Drop a session whose driver saw it tear itself down.
    pub(crate) async fn forget(&self, id: Uuid) {
        if self.entries.lock().await.remove(&id).is_some() {
            tracing::debug!(session_id = %id, "session forgotten after teardown");
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
