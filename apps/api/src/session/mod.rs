pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ats::{AtsResult, HistoricalScoreSeries};

/// Per-visitor analysis state. Lives only in memory.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ats_result: Option<AtsResult>,
    pub history: HistoricalScoreSeries,
    pub last_evaluation: Option<String>,
    /// Refreshed on every lookup; drives idle expiry.
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            ats_result: None,
            history: HistoricalScoreSeries::new(),
            last_evaluation: None,
            last_seen: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > ttl
    }

    /// Stores the latest result and appends its score to the history.
    pub fn record_score(&mut self, result: AtsResult) {
        self.history.record(result.match_score);
        self.ats_result = Some(result);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// What a client sees when it looks up its own session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub scores: HistoricalScoreSeries,
    pub has_ats_result: bool,
    pub last_evaluation: Option<String>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            scores: session.history.clone(),
            has_ats_result: session.ats_result.is_some(),
            last_evaluation: session.last_evaluation.clone(),
        }
    }
}

/// Shared, cloneable handle to every open session.
///
/// A session idle for longer than `ttl` is gone: lookups treat it as unknown
/// and it is dropped on the next sweep.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

/// Returns the live session for `id`, refreshing its idle clock, or removes it
/// if it has expired.
fn live_session(sessions: &mut HashMap<Uuid, Session>, id: Uuid, ttl: Duration) -> Option<&mut Session> {
    let now = Instant::now();
    if sessions.get(&id)?.is_expired(now, ttl) {
        sessions.remove(&id);
        info!("Session expired: {id}");
        return None;
    }
    let session = sessions.get_mut(&id)?;
    session.last_seen = now;
    Some(session)
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self) -> SessionInfo {
        self.purge_expired().await;

        let session = Session::new();
        let info = SessionInfo {
            session_id: session.id,
            created_at: session.created_at,
        };
        self.inner.write().await.insert(session.id, session);
        info!("Session started: {}", info.session_id);
        info
    }

    pub async fn end(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session ended: {id}"))
            .ok_or_else(|| not_found(id))
    }

    /// Drops every idle session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Expired {removed} idle session(s), {} open", sessions.len());
        }
        removed
    }

    /// Fails with `NotFound` for unknown ids, so handlers can check before
    /// doing expensive work.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<(), AppError> {
        self.update(id, |_| ()).await
    }

    /// Runs `f` with a shared borrow of the session. Counts as activity.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Result<T, AppError> {
        self.update(id, |s| f(s)).await
    }

    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        live_session(&mut sessions, id, self.ttl)
            .map(f)
            .ok_or_else(|| not_found(id))
    }
}

/// Sweeps idle sessions every `period` for as long as the process runs.
pub fn spawn_expiry_sweeper(store: SessionStore, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = store.purge_expired().await;
            debug!("Session sweep removed {removed}");
        }
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
