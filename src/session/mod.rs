// src/session/mod.rs

//! In-memory per-session state: action history plus mistake/warning tallies.
//! Sessions live for the life of the process, bounded by a TTL sweep and a
//! hard cap with least-recently-seen eviction.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// One recorded `(step, action)` pair. Field names match the wire format
/// of the action log returned by the debrief endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub step: String,
    pub action: String,
}

/// Mutable per-session record. History is append-only and chronological.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    pub actions: Vec<ActionRecord>,
    pub mistakes: u32,
    pub warnings: u32,
}

impl Session {
    pub fn record(&mut self, step_id: &str, action: &str) {
        self.actions.push(ActionRecord {
            step: step_id.to_string(),
            action: action.to_string(),
        });
    }
}

struct Entry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Owns all session records. The outer lock covers only map access; callers
/// hold the returned per-session lock for the duration of an evaluation so
/// concurrent calls on one session serialize without blocking other sessions.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Existing session, or a freshly zeroed one. First access for an id is
    /// the sole creation point; the map lock makes concurrent first accesses
    /// agree on a single record.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        let mut map = self.sessions.lock().await;
        let now = Instant::now();

        if let Some(entry) = map.get_mut(session_id) {
            entry.last_seen = now;
            return entry.session.clone();
        }

        self.sweep(&mut map, now);

        let session = Arc::new(Mutex::new(Session::default()));
        map.insert(
            session_id.to_string(),
            Entry {
                session: session.clone(),
                last_seen: now,
            },
        );
        session
    }

    /// Read-only view for debrief generation. An unknown (or evicted) id
    /// yields a zeroed session; the store is never mutated.
    ///
    /// The map guard is released before awaiting the per-session lock: that
    /// lock may be held across a suspended coach call, and waiting on it
    /// must never stall other sessions' map access.
    pub async fn snapshot(&self, session_id: &str) -> Session {
        let handle = {
            let map = self.sessions.lock().await;
            map.get(session_id).map(|entry| entry.session.clone())
        };
        match handle {
            Some(session) => session.lock().await.clone(),
            None => Session::default(),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // Runs on the creation path, before inserting: drop idle sessions, then
    // enforce the cap by evicting the least-recently-seen record.
    fn sweep(&self, map: &mut HashMap<String, Entry>, now: Instant) {
        let before = map.len();
        map.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        if map.len() < before {
            debug!("evicted {} idle session(s)", before - map.len());
        }

        while map.len() >= self.max_sessions {
            let oldest = map
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    debug!("session cap reached, evicting '{}'", id);
                    map.remove(&id);
                }
                None => break,
            }
        }
    }
}
