//! In-memory sessions, one per open analysis page.
//!
//! Pages are expected to DELETE their session on unload, but that request is
//! best-effort. Sessions idle for longer than the configured TTL are swept.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::clipboard::CopyTracker;
use super::gate::GateState;
use super::lock;
use super::notify::{Notification, NotificationLog};
use crate::analysis::orchestrator::AnalysisSession;
use crate::render::{build_view, ResultView};

/// Everything one page needs: the analysis state machine, its toast queue
/// and the copied indicator.
#[derive(Debug)]
pub struct Session {
    pub analysis: AnalysisSession,
    pub notifications: NotificationLog,
    pub copies: CopyTracker,
    last_seen: Mutex<Instant>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            analysis: AnalysisSession::default(),
            notifications: NotificationLog::default(),
            copies: CopyTracker::default(),
            last_seen: Mutex::new(Instant::now()),
        }
    }
}

/// Snapshot returned to the page on every interaction.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub gate: GateState,
    pub result: Option<ResultView>,
    pub notifications: Vec<Notification>,
}

impl Session {
    fn touch(&self) {
        *lock(&self.last_seen) = Instant::now();
    }

    /// A session with a request in flight is never idle.
    fn is_idle(&self, ttl: Duration) -> bool {
        !self.analysis.is_in_flight() && lock(&self.last_seen).elapsed() >= ttl
    }

    /// Builds the view and drains pending notifications.
    ///
    /// Only peeks at the scroll request; the report fragment consumes it.
    pub fn view(&self, session_id: Uuid) -> SessionView {
        let result = self.analysis.result().map(|r| {
            build_view(
                &r,
                self.copies.copied_index(),
                self.analysis.scroll_requested(),
            )
        });

        SessionView {
            session_id,
            gate: self.analysis.gate(),
            result,
            notifications: self.notifications.drain(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::default());
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::clone(&session));
        (id, session)
    }

    /// Looks up a session and marks it as seen.
    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()?;
        session.touch();
        Some(session)
    }

    /// Drops the session. A request still in flight keeps its own `Arc` and
    /// finishes into a session nobody can read any more.
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    pub fn count(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Removes sessions not seen for at least `ttl`. Returns how many went.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(ttl));
        before - sessions.len()
    }

    /// Sweeps idle sessions every quarter of `ttl` for the life of the process.
    pub fn spawn_sweeper(store: Arc<SessionStore>, ttl: Duration) -> JoinHandle<()> {
        let period = (ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl);
                if evicted > 0 {
                    info!(evicted, remaining = store.count(), "Evicted idle sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::notify::Notifier;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let (id, _) = store.create();
        assert!(store.get(id).is_some());
        assert_eq!(store.count(), 1);
        assert!(store.remove(id));
        assert!(store.get(id).is_none());
        assert!(!store.remove(id));
    }

    const TTL: Duration = Duration::from_secs(600);

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted_after_ttl() {
        let store = SessionStore::new();
        let (stale, _) = store.create();
        tokio::time::sleep(Duration::from_secs(300)).await;
        let (fresh, _) = store.create();

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(store.evict_idle(TTL), 1);
        assert!(store.get(stale).is_none());
        assert!(store.get(fresh).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reading_a_session_keeps_it_alive() {
        let store = SessionStore::new();
        let (id, _) = store.create();

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_secs(500)).await;
            assert!(store.get(id).is_some());
            assert_eq!(store.evict_idle(TTL), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reclaims_abandoned_sessions() {
        let store = Arc::new(SessionStore::new());
        for _ in 0..1000 {
            store.create();
        }
        let sweeper = SessionStore::spawn_sweeper(Arc::clone(&store), TTL);

        tokio::time::sleep(TTL + TTL / 4 + Duration::from_secs(1)).await;
        assert_eq!(store.count(), 0);
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_view_drains_notifications() {
        let store = SessionStore::new();
        let (id, session) = store.create();
        session.notifications.notify(Notification::success("hello", ""));

        let first = session.view(id);
        assert_eq!(first.notifications.len(), 1);
        assert!(first.result.is_none());
        assert!(!first.gate.enabled);

        assert!(session.view(id).notifications.is_empty());
    }
}
