//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They record every call so tests can verify what the engine asked for.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::oneshot;

use crate::app::trigger_router::Direction;
use crate::domain::entities::{Micropost, MicropostId, UserId};
use crate::domain::ports::{FeedPort, MicropostPort, Navigator, SessionPort};
use crate::error::FetchError;

use super::fixtures::test_post;

type FetchResult = Result<Vec<Micropost>, FetchError>;
type Script = HashMap<Option<MicropostId>, VecDeque<FetchResult>>;

// ============================================================================
// Scripted Feed Port
// ============================================================================

/// Answers each fetch from a per-cursor queue of responses.
/// Unscripted calls return an empty page.
#[derive(Default)]
pub struct ScriptedFeedPort {
    newer: Arc<RwLock<Script>>,
    older: Arc<RwLock<Script>>,
    newer_calls: Arc<RwLock<Vec<Option<MicropostId>>>>,
    older_calls: Arc<RwLock<Vec<Option<MicropostId>>>>,
}

impl ScriptedFeedPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `fetch_newer(cursor)`
    pub fn on_newer(self, cursor: Option<i64>, response: FetchResult) -> Self {
        script(&self.newer, cursor, response);
        self
    }

    /// Queue a response for `fetch_older(cursor)`
    pub fn on_older(self, cursor: Option<i64>, response: FetchResult) -> Self {
        script(&self.older, cursor, response);
        self
    }

    pub fn newer_calls(&self) -> Vec<Option<MicropostId>> {
        self.newer_calls.read().unwrap().clone()
    }

    pub fn older_calls(&self) -> Vec<Option<MicropostId>> {
        self.older_calls.read().unwrap().clone()
    }
}

fn script(script: &RwLock<Script>, cursor: Option<i64>, response: FetchResult) {
    script
        .write()
        .unwrap()
        .entry(cursor.map(MicropostId))
        .or_default()
        .push_back(response);
}

fn answer(
    script: &RwLock<Script>,
    calls: &RwLock<Vec<Option<MicropostId>>>,
    cursor: Option<MicropostId>,
) -> FetchResult {
    calls.write().unwrap().push(cursor);
    script
        .write()
        .unwrap()
        .get_mut(&cursor)
        .and_then(|queue| queue.pop_front())
        .unwrap_or_else(|| Ok(Vec::new()))
}

#[async_trait]
impl FeedPort for ScriptedFeedPort {
    async fn fetch_newer(&self, cursor: Option<MicropostId>) -> FetchResult {
        answer(&self.newer, &self.newer_calls, cursor)
    }

    async fn fetch_older(&self, cursor: Option<MicropostId>) -> FetchResult {
        answer(&self.older, &self.older_calls, cursor)
    }
}

// ============================================================================
// Gated Feed Port
// ============================================================================

/// Holds every fetch in flight until the test releases it, oldest first
#[derive(Default)]
pub struct GatedFeedPort {
    waiting: Mutex<HashMap<Direction, VecDeque<oneshot::Sender<FetchResult>>>>,
    calls: Mutex<HashMap<Direction, usize>>,
}

impl GatedFeedPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches currently held open
    pub fn pending(&self, direction: Direction) -> usize {
        self.waiting
            .lock()
            .unwrap()
            .get(&direction)
            .map(|queue| queue.iter().filter(|gate| !gate.is_closed()).count())
            .unwrap_or(0)
    }

    /// Total fetches ever issued in `direction`
    pub fn calls(&self, direction: Direction) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&direction)
            .copied()
            .unwrap_or(0)
    }

    /// Complete the oldest open fetch in `direction`
    pub fn release(&self, direction: Direction, result: FetchResult) {
        let mut waiting = self.waiting.lock().unwrap();
        let queue = waiting.entry(direction).or_default();
        while let Some(gate) = queue.pop_front() {
            if !gate.is_closed() {
                let _ = gate.send(result);
                return;
            }
        }
        panic!("no {} fetch in flight", direction);
    }

    async fn hold(&self, direction: Direction) -> FetchResult {
        let (tx, rx) = oneshot::channel();
        {
            self.waiting
                .lock()
                .unwrap()
                .entry(direction)
                .or_default()
                .push_back(tx);
            *self.calls.lock().unwrap().entry(direction).or_default() += 1;
        }
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Request("gate dropped".to_string())))
    }
}

#[async_trait]
impl FeedPort for GatedFeedPort {
    async fn fetch_newer(&self, _cursor: Option<MicropostId>) -> FetchResult {
        self.hold(Direction::Newer).await
    }

    async fn fetch_older(&self, _cursor: Option<MicropostId>) -> FetchResult {
        self.hold(Direction::Older).await
    }
}

// ============================================================================
// Mock Micropost Port
// ============================================================================

pub struct MockMicropostPort {
    created: RwLock<Vec<String>>,
    failure: Option<FetchError>,
    next_id: AtomicI64,
}

impl MockMicropostPort {
    pub fn new() -> Self {
        Self {
            created: RwLock::new(Vec::new()),
            failure: None,
            next_id: AtomicI64::new(100),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.created.read().unwrap().clone()
    }
}

#[async_trait]
impl MicropostPort for MockMicropostPort {
    async fn create(&self, content: &str) -> Result<Micropost, FetchError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.created.write().unwrap().push(content.to_string());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(test_post(id, content))
    }
}

// ============================================================================
// Session & Navigation
// ============================================================================

pub struct StaticSession {
    authenticated: AtomicBool,
    user: Option<UserId>,
    logouts: AtomicUsize,
}

impl StaticSession {
    pub fn authenticated() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            user: Some(UserId(1)),
            logouts: AtomicUsize::new(0),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authenticated: AtomicBool::new(false),
            user: None,
            logouts: AtomicUsize::new(0),
        }
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl SessionPort for StaticSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn is_myself(&self, user: UserId) -> bool {
        self.is_authenticated() && self.user == Some(user)
    }

    fn logout(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    to_top: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_top_count(&self) -> usize {
        self.to_top.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to_top(&self) {
        self.to_top.fetch_add(1, Ordering::SeqCst);
    }
}
