//! Feed sync service
//!
//! Runs one `SyncEngine` on a dedicated tokio task. Triggers arrive over a
//! command channel, each fetch runs in its own task and posts its completion
//! back to the owner task, so the engine is only ever touched from one place
//! and needs no lock. Consumers read immutable views through a watch channel
//! and follow changes on a broadcast stream. Failures go to every failure
//! subscriber over its own unbounded channel, so none is ever dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

use crate::app::feed_store::FeedSnapshot;
use crate::app::sync_engine::{FeedView, SyncEngine, SyncStatus};
use crate::app::trigger_router::{Direction, FetchTicket, Trigger};
use crate::config::EngineConfig;
use crate::domain::entities::Micropost;
use crate::domain::ports::{FeedPort, Navigator, SessionPort};
use crate::error::{AppError, FetchError};

const CHANGE_CAPACITY: usize = 64;

/// A failed fetch attempt, delivered exactly once to each failure subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub direction: Direction,
    pub error: FetchError,
}

type FailureSender = mpsc::UnboundedSender<FetchFailure>;
type FailureSubscribers = Arc<Mutex<Vec<FailureSender>>>;

fn lock(subscribers: &FailureSubscribers) -> MutexGuard<'_, Vec<FailureSender>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
enum Command {
    Trigger(Trigger),
    Shutdown,
}

#[derive(Debug)]
struct Completion {
    ticket: FetchTicket,
    result: Result<Vec<Micropost>, FetchError>,
}

/// Owner of a running feed engine
pub struct FeedSyncService<F>
where
    F: FeedPort + 'static,
{
    feed: Arc<F>,
    engine: SyncEngine,
    fetch_timeout: Duration,
    view: watch::Sender<FeedView>,
    changes: broadcast::Sender<FeedView>,
    failures: FailureSubscribers,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<F> FeedSyncService<F>
where
    F: FeedPort + 'static,
{
    /// Check the session gate, then spawn the engine and issue `start()`.
    ///
    /// When the session is not authenticated the engine is never created;
    /// control goes to `navigator.navigate_to_top()` instead.
    pub fn launch<S, N>(
        feed: Arc<F>,
        session: &S,
        navigator: &N,
        config: EngineConfig,
    ) -> Result<FeedHandle, AppError>
    where
        S: SessionPort + ?Sized,
        N: Navigator + ?Sized,
    {
        if !session.is_authenticated() {
            info!("Not authenticated, leaving feed");
            navigator.navigate_to_top();
            return Err(AppError::Unauthenticated);
        }

        let handle = Self::spawn(feed, config);
        handle.start()?;
        Ok(handle)
    }

    /// Spawn the owner task without issuing any trigger
    pub fn spawn(feed: Arc<F>, config: EngineConfig) -> FeedHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(FeedView::default());
        let (changes_tx, _) = broadcast::channel(CHANGE_CAPACITY);
        let failures = FailureSubscribers::default();

        let service = Self {
            feed,
            engine: SyncEngine::new(config),
            fetch_timeout: config.fetch_timeout,
            view: view_tx,
            changes: changes_tx.clone(),
            failures: Arc::clone(&failures),
            completions: completions_tx,
        };
        tokio::spawn(service.run(commands_rx, completions_rx));

        FeedHandle {
            commands: commands_tx,
            view: view_rx,
            changes: changes_tx,
            failures,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        info!("Feed sync started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Trigger(trigger)) => self.on_trigger(trigger),
                    Some(Command::Shutdown) | None => break,
                },
                Some(completion) = completions.recv() => self.on_completion(completion),
            }
        }

        info!("Feed sync stopped");
    }

    fn on_trigger(&mut self, trigger: Trigger) {
        if let Some(ticket) = self.engine.handle(trigger) {
            self.publish();
            self.dispatch(ticket);
        }
    }

    fn dispatch(&self, ticket: FetchTicket) {
        let feed = Arc::clone(&self.feed);
        let completions = self.completions.clone();
        let fetch_timeout = self.fetch_timeout;

        tokio::spawn(async move {
            let fetch = async {
                match ticket.direction {
                    Direction::Newer => feed.fetch_newer(ticket.cursor).await,
                    Direction::Older => feed.fetch_older(ticket.cursor).await,
                }
            };
            let result = tokio::time::timeout(fetch_timeout, fetch)
                .await
                .unwrap_or(Err(FetchError::Timeout));

            if completions.send(Completion { ticket, result }).is_err() {
                debug!(ticket = %ticket.id, "Feed sync stopped before fetch completed");
            }
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        let Completion { ticket, result } = completion;

        let changed = match result {
            Ok(batch) => self.engine.complete(&ticket, batch),
            Err(error) => {
                let changed = self.engine.fail(&ticket, &error);
                self.report(FetchFailure {
                    direction: ticket.direction,
                    error,
                });
                changed
            }
        };

        if changed {
            self.publish();
        }
    }

    fn publish(&self) {
        let view = self.engine.view();
        self.view.send_replace(view.clone());
        // no subscribers is fine, the watch channel holds the latest view
        let _ = self.changes.send(view);
    }

    /// Hand the failure to every live subscriber, dropping closed ones
    fn report(&self, failure: FetchFailure) {
        let mut subscribers = lock(&self.failures);
        subscribers.retain(|tx| tx.send(failure.clone()).is_ok());
    }
}

/// Cheap, clonable handle to a running feed
#[derive(Clone)]
pub struct FeedHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<FeedView>,
    changes: broadcast::Sender<FeedView>,
    failures: FailureSubscribers,
}

impl FeedHandle {
    pub fn start(&self) -> Result<(), AppError> {
        self.trigger(Trigger::Start)
    }

    pub fn refresh(&self) -> Result<(), AppError> {
        self.trigger(Trigger::Refresh)
    }

    pub fn scrolled_to_bottom(&self) -> Result<(), AppError> {
        self.trigger(Trigger::ScrolledToBottom)
    }

    pub fn item_created(&self) -> Result<(), AppError> {
        self.trigger(Trigger::ItemCreated)
    }

    pub fn trigger(&self, trigger: Trigger) -> Result<(), AppError> {
        self.commands
            .send(Command::Trigger(trigger))
            .map_err(|_| AppError::EngineStopped)
    }

    /// Current ordered items, newest first
    pub fn snapshot(&self) -> FeedSnapshot {
        self.view.borrow().items.clone()
    }

    pub fn status(&self) -> SyncStatus {
        self.view.borrow().status
    }

    pub fn tail_exhausted(&self) -> bool {
        self.view.borrow().tail_exhausted
    }

    pub fn view(&self) -> FeedView {
        self.view.borrow().clone()
    }

    /// Follow the latest view
    pub fn watch(&self) -> watch::Receiver<FeedView> {
        self.view.clone()
    }

    /// Change notification stream. A lagging receiver skips stale views;
    /// `view()` always has the latest one.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedView> {
        self.changes.subscribe()
    }

    /// Every fetch failure from now on, none dropped however late the
    /// receiver reads
    pub fn failures(&self) -> mpsc::UnboundedReceiver<FetchFailure> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.failures).push(tx);
        rx
    }

    /// Stop the owner task. Fetches still in flight are dropped on arrival.
    pub fn shutdown(&self) -> Result<(), AppError> {
        self.commands
            .send(Command::Shutdown)
            .map_err(|_| AppError::EngineStopped)
    }
}
