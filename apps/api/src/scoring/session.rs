//! Scoring sessions — debounced recomputation for a live resume editor.
//!
//! Each input change is stored immediately and a recompute is scheduled after
//! the quiet period. Only the last change in a burst triggers scoring. The
//! checklist is memoised against the input and score versions it was built from.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::ResumeData;
use crate::scoring::calculator::{calculate_resume_score, ScoreBreakdown};
use crate::scoring::checklist::{generate_checklist, ChecklistItem};
use crate::scoring::debounce::Debouncer;

/// Everything a score depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringInputs {
    pub resume: ResumeData,
    pub job_description: Option<String>,
    pub extracted_keywords: Option<Vec<String>>,
    pub primary_keywords: Option<Vec<String>>,
}

impl ScoringInputs {
    pub fn score(&self) -> ScoreBreakdown {
        calculate_resume_score(
            &self.resume,
            self.job_description.as_deref(),
            self.extracted_keywords.as_deref(),
            self.primary_keywords.as_deref(),
        )
    }

    pub fn checklist(&self, scores: &ScoreBreakdown) -> Vec<ChecklistItem> {
        generate_checklist(
            &self.resume,
            scores,
            self.job_description.as_deref(),
            self.extracted_keywords.as_deref(),
            self.primary_keywords.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub scores: Option<ScoreBreakdown>,
    pub previous_score: Option<u32>,
    pub score_delta: Option<i64>,
    pub checklist: Vec<ChecklistItem>,
    pub recompute_count: u64,
    pub pending: bool,
    pub updated_at: DateTime<Utc>,
}

struct ChecklistMemo {
    key: (u64, u64),
    items: Vec<ChecklistItem>,
}

struct SessionState {
    inputs: ScoringInputs,
    inputs_version: u64,
    scores: Option<ScoreBreakdown>,
    scores_version: u64,
    previous_score: Option<u32>,
    recompute_count: u64,
    checklist: Option<ChecklistMemo>,
    updated_at: DateTime<Utc>,
    last_touched: Instant,
}

impl SessionState {
    fn new() -> Self {
        Self {
            inputs: ScoringInputs::default(),
            inputs_version: 0,
            scores: None,
            scores_version: 0,
            previous_score: None,
            recompute_count: 0,
            checklist: None,
            updated_at: Utc::now(),
            last_touched: Instant::now(),
        }
    }

    fn recompute(&mut self) {
        let scores = self.inputs.score();
        self.previous_score = self.scores.as_ref().map(|s| s.overall);
        self.scores = Some(scores);
        self.scores_version += 1;
        self.recompute_count += 1;
        self.updated_at = Utc::now();
    }

    fn checklist(&mut self) -> Vec<ChecklistItem> {
        let Some(scores) = &self.scores else {
            return Vec::new();
        };
        let key = (self.inputs_version, self.scores_version);
        if let Some(memo) = &self.checklist {
            if memo.key == key {
                return memo.items.clone();
            }
        }

        let items = self.inputs.checklist(scores);
        self.checklist = Some(ChecklistMemo {
            key,
            items: items.clone(),
        });
        items
    }
}

pub struct ScoringSession {
    id: Uuid,
    state: Arc<Mutex<SessionState>>,
    debouncer: Debouncer,
}

impl ScoringSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(SessionState::new())),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stores new inputs and schedules a debounced recompute.
    pub async fn update(&self, inputs: ScoringInputs) {
        {
            let mut state = self.state.lock().await;
            state.inputs = inputs;
            state.inputs_version += 1;
            state.last_touched = Instant::now();
        }

        let state = Arc::clone(&self.state);
        let session_id = self.id;
        self.debouncer.schedule(move || async move {
            let mut state = state.lock().await;
            state.recompute();
            debug!(
                %session_id,
                recompute = state.recompute_count,
                overall = state.scores.as_ref().map(|s| s.overall),
                "Session rescored"
            );
        });
        debug!(
            session_id = %self.id,
            delay_ms = self.debouncer.delay().as_millis() as u64,
            "Rescore scheduled"
        );
    }

    /// Scores the current inputs immediately, superseding any pending recompute.
    pub async fn recalculate_now(&self) -> SessionSnapshot {
        // an empty job supersedes (and aborts) whatever is waiting
        let handle = self.debouncer.schedule(|| async {});
        self.debouncer.cancel(handle);

        {
            let mut state = self.state.lock().await;
            state.recompute();
            state.last_touched = Instant::now();
        }
        self.snapshot().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let pending = self.debouncer.is_pending();
        let mut state = self.state.lock().await;
        state.last_touched = Instant::now();

        let checklist = state.checklist();
        let scores = state.scores.clone();
        let score_delta = match (&scores, state.previous_score) {
            (Some(s), Some(prev)) => Some(s.overall as i64 - prev as i64),
            _ => None,
        };

        SessionSnapshot {
            session_id: self.id,
            scores,
            previous_score: state.previous_score,
            score_delta,
            checklist,
            recompute_count: state.recompute_count,
            pending,
            updated_at: state.updated_at,
        }
    }

    async fn idle_for(&self) -> Duration {
        self.state.lock().await.last_touched.elapsed()
    }
}

/// Live sessions keyed by id. Idle sessions are evicted on access.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<ScoringSession>>>,
    debounce: Duration,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(debounce: Duration, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            debounce,
            ttl,
        }
    }

    pub async fn create(&self) -> Arc<ScoringSession> {
        self.evict_idle().await;
        let session = Arc::new(ScoringSession::new(self.debounce));
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id(), Arc::clone(&session));
        debug!(session_id = %session.id(), active = sessions.len(), "Scoring session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<ScoringSession>> {
        self.evict_idle().await;
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    async fn evict_idle(&self) {
        let snapshot: Vec<Arc<ScoringSession>> =
            self.sessions.read().await.values().cloned().collect();

        let mut expired = Vec::new();
        for session in snapshot {
            if session.idle_for().await >= self.ttl {
                expired.push(session.id());
            }
        }
        if expired.is_empty() {
            return;
        }

        let mut sessions = self.sessions.write().await;
        for id in &expired {
            sessions.remove(id);
        }
        debug!(evicted = expired.len(), "Idle scoring sessions evicted");
    }
}
