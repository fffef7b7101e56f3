//! Live reading sessions.
//!
//! A reading session is ephemeral; it is never persisted and disappears on
//! restart. Each entry remembers which story it was opened from so that the
//! HTTP layer can report it back.
//!
//! Readers rarely say goodbye, so sessions idle for longer than the TTL are
//! treated as gone. Expired entries are dropped when touched, and
//! `cleanup_expired()` sweeps the rest.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use branchtale_domain::{ReadingSession, StoryId};

use crate::infrastructure::ports::ClockPort;

/// Idle seconds after which a session is forgotten.
pub const DEFAULT_READING_SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// One reader's session plus the story it belongs to.
#[derive(Debug, Clone)]
pub struct ActiveReading {
    pub story_id: StoryId,
    pub session: ReadingSession,
}

struct TrackedReading {
    reading: ActiveReading,
    last_touched: DateTime<Utc>,
}

/// Concurrent map of session id to active reading, with idle expiry.
pub struct ReadingSessionStore {
    sessions: DashMap<Uuid, TrackedReading>,
    clock: Arc<dyn ClockPort>,
    ttl: Duration,
}

impl ReadingSessionStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
            ttl: Duration::seconds(DEFAULT_READING_SESSION_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Register a new session and return its id.
    pub fn open(&self, story_id: StoryId, session: ReadingSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            TrackedReading {
                reading: ActiveReading { story_id, session },
                last_touched: self.clock.now(),
            },
        );
        id
    }

    /// Snapshot of a live session. Counts as activity.
    pub fn get(&self, id: Uuid) -> Option<ActiveReading> {
        self.update(id, |reading| reading.clone())
    }

    /// Run `f` against the live session while holding its shard lock.
    ///
    /// Returns `None` if there is no such session or it has expired.
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut ActiveReading) -> R) -> Option<R> {
        let now = self.clock.now();
        {
            let mut entry = self.sessions.get_mut(&id)?;
            if !self.is_expired(&entry, now) {
                entry.last_touched = now;
                return Some(f(&mut entry.reading));
            }
        }
        // Shard lock released above; remove only if nobody refreshed it meanwhile.
        if self
            .sessions
            .remove_if(&id, |_, tracked| self.is_expired(tracked, now))
            .is_some()
        {
            tracing::debug!(session_id = %id, "Reading session expired");
        }
        None
    }

    pub fn close(&self, id: Uuid) -> Option<ActiveReading> {
        self.sessions.remove(&id).map(|(_, tracked)| tracked.reading)
    }

    /// Remove all idle sessions and return how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, tracked| !self.is_expired(tracked, now));
        before.saturating_sub(self.sessions.len())
    }

    /// Number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, tracked: &TrackedReading, now: DateTime<Utc>) -> bool {
        now - tracked.last_touched >= self.ttl
    }
}

#[cfg(test)]
pub(crate) fn test_store() -> ReadingSessionStore {
    ReadingSessionStore::new(Arc::new(crate::infrastructure::clock::SystemClock::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockClockPort;
    use branchtale_domain::{Choice, Scene, StoryGraph};
    use std::sync::Mutex;

    fn session() -> ReadingSession {
        let graph = StoryGraph::from_scenes(vec![
            Scene::new("start", "Begin").with_choice(Choice::new("on", "end")),
            Scene::new("end", "Done"),
        ]);
        ReadingSession::start(Arc::new(graph)).unwrap()
    }

    /// Clock whose current time the test can move forward.
    fn manual_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, Arc<dyn ClockPort>) {
        let now = Arc::new(Mutex::new(start));
        let reader = now.clone();
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(move || *reader.lock().unwrap());
        (now, Arc::new(clock))
    }

    #[test]
    fn open_get_close() {
        let store = test_store();
        let story_id = StoryId::new();
        let id = store.open(story_id, session());

        assert_eq!(store.get(id).unwrap().story_id, story_id);
        assert_eq!(store.len(), 1);

        assert!(store.close(id).is_some());
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn update_mutates_in_place() {
        let store = test_store();
        let id = store.open(StoryId::new(), session());

        let moved = store
            .update(id, |reading| reading.session.select_choice(0).is_ok())
            .unwrap();

        assert!(moved);
        let reading = store.get(id).unwrap();
        assert_eq!(reading.session.current_scene().id(), "end");
        assert_eq!(reading.session.depth(), 1);
    }

    #[test]
    fn update_unknown_session_is_none() {
        let store = test_store();
        assert!(store.update(Uuid::new_v4(), |_| ()).is_none());
    }

    #[test]
    fn idle_session_is_evicted_on_access() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let store = ReadingSessionStore::new(clock).with_ttl(Duration::minutes(30));
        let id = store.open(StoryId::new(), session());

        *now.lock().unwrap() = start + Duration::minutes(31);

        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn activity_keeps_session_alive() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let store = ReadingSessionStore::new(clock).with_ttl(Duration::minutes(30));
        let id = store.open(StoryId::new(), session());

        *now.lock().unwrap() = start + Duration::minutes(20);
        assert!(store.update(id, |_| ()).is_some());

        *now.lock().unwrap() = start + Duration::minutes(40);
        assert!(store.get(id).is_some());
    }

    #[test]
    fn cleanup_removes_only_idle_sessions() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let store = ReadingSessionStore::new(clock).with_ttl(Duration::minutes(30));
        let abandoned: Vec<Uuid> = (0..1000)
            .map(|_| store.open(StoryId::new(), session()))
            .collect();

        *now.lock().unwrap() = start + Duration::minutes(25);
        let active = store.open(StoryId::new(), session());

        *now.lock().unwrap() = start + Duration::minutes(35);
        assert_eq!(store.cleanup_expired(), abandoned.len());
        assert_eq!(store.len(), 1);
        assert!(store.get(active).is_some());
    }
}
