use std::fmt;
use std::future::{Future, IntoFuture};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use lode_core::{mark_failed, mark_ready, LoadError, Loadable};
use lode_types::Failure;

use crate::config::CompletionConfig;
use crate::error::{CompletionError, CompletionResult};
use crate::state::CompletionState;

type Observer<L> = Box<dyn FnMut(&L) + Send>;

/// Outcome delivered to awaiters.
pub type Outcome<L> = Result<L, LoadError<L>>;

/// State shared between a completion, its clones and its resolver.
struct Shared<L> {
    state: CompletionState<L>,
    observers: Vec<Observer<L>>,
}

fn lock<L>(shared: &Mutex<Shared<L>>) -> MutexGuard<'_, Shared<L>> {
    // Observers never run under the lock, so a poisoned guard still holds
    // consistent state.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Observable, awaitable outcome of one in-flight fetch.
///
/// Awaiting a completion yields `Ok(ready)` or `Err(LoadError)`. Clones share
/// the same outcome.
pub struct Completion<L> {
    loading: L,
    shared: Arc<Mutex<Shared<L>>>,
    settled: watch::Receiver<bool>,
}

impl<L> Completion<L>
where
    L: Loadable + Clone,
    L::Item: Clone,
{
    /// Track `loading` with the default configuration.
    ///
    /// Fails with [`CompletionError::NotLoading`] unless `loading` has its
    /// `loading` flag set.
    pub fn new(loading: L) -> CompletionResult<(Self, Resolver<L>)> {
        Self::with_config(loading, CompletionConfig::default())
    }

    /// Track `loading`, applying `config` to the returned resolver.
    pub fn with_config(
        loading: L,
        config: CompletionConfig,
    ) -> CompletionResult<(Self, Resolver<L>)> {
        let status = loading.loadable_status();
        if !status.loading {
            return Err(CompletionError::NotLoading(status.clone()));
        }

        let shared = Arc::new(Mutex::new(Shared {
            state: CompletionState::Loading(loading.clone()),
            observers: Vec::new(),
        }));
        let (notify, settled) = watch::channel(false);
        let completion = Self {
            loading: loading.clone(),
            shared: Arc::clone(&shared),
            settled,
        };
        let resolver = Resolver {
            loading,
            shared,
            notify,
            config,
        };
        Ok((completion, resolver))
    }

    /// Adapt an already running operation.
    ///
    /// `operation` is spawned on the current tokio runtime and its result is
    /// forwarded to the resolver. A terminal item that does not match its
    /// channel (a non-ready success or an error-free failure) becomes a
    /// rejection whose cause is the contract violation.
    pub fn from_future<F>(loading: L, operation: F) -> CompletionResult<Self>
    where
        F: Future<Output = Outcome<L>> + Send + 'static,
        L: Send + 'static,
    {
        Self::from_future_with_config(loading, CompletionConfig::default(), operation)
    }

    /// [`Completion::from_future`] with an explicit configuration.
    pub fn from_future_with_config<F>(
        loading: L,
        config: CompletionConfig,
        operation: F,
    ) -> CompletionResult<Self>
    where
        F: Future<Output = Outcome<L>> + Send + 'static,
        L: Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| CompletionError::NoRuntime)?;
        let (completion, resolver) = Self::with_config(loading, config)?;
        handle.spawn(async move {
            let attempt = match operation.await {
                Ok(ready) => resolver.try_resolve(ready),
                Err(error) => resolver.try_reject(error.into_loadable()),
            };
            resolver.fail_on_violation(&attempt);
        });
        Ok(completion)
    }

    /// Observe the lifecycle.
    ///
    /// If the completion has not settled yet, `callback` runs immediately
    /// with the loading item, and once more with the terminal item when it
    /// settles. If it has already settled, `callback` runs once, immediately,
    /// with the terminal item. Returns `self` for chaining.
    ///
    /// A callback that panics on the terminal item does not keep other
    /// observers or awaiters from seeing the outcome.
    pub fn subscribe<F>(&self, mut callback: F) -> &Self
    where
        F: FnMut(&L) + Send + 'static,
    {
        let settled = lock(&self.shared).state.terminal_item().cloned();
        if let Some(terminal) = settled {
            callback(&terminal);
            return self;
        }

        callback(&self.loading);

        let mut shared = lock(&self.shared);
        let settled = shared.state.terminal_item().cloned();
        match settled {
            // Settled while the loading notification ran.
            Some(terminal) => {
                drop(shared);
                callback(&terminal);
            }
            None => shared.observers.push(Box::new(callback)),
        }
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CompletionState<L> {
        lock(&self.shared).state.clone()
    }
}

impl<L> Completion<L> {
    /// The loading item this completion was created from.
    pub fn loading_item(&self) -> &L {
        &self.loading
    }

    /// Returns `true` once the completion has settled.
    pub fn is_settled(&self) -> bool {
        lock(&self.shared).state.is_settled()
    }
}

impl<L: Clone> Completion<L> {
    /// Wait for the outcome without consuming the completion.
    pub fn settled(&self) -> impl Future<Output = Outcome<L>> {
        wait(Arc::clone(&self.shared), self.settled.clone())
    }
}

async fn wait<L: Clone>(
    shared: Arc<Mutex<Shared<L>>>,
    mut settled: watch::Receiver<bool>,
) -> Outcome<L> {
    let closed = settled.wait_for(|done| *done).await.is_err();
    match outcome(&shared) {
        Some(outcome) => outcome,
        None => {
            // The resolver went away without being able to settle.
            warn!(closed, "completion can never settle");
            std::future::pending().await
        }
    }
}

fn outcome<L: Clone>(shared: &Mutex<Shared<L>>) -> Option<Outcome<L>> {
    match &lock(shared).state {
        CompletionState::Fulfilled(ready) => Some(Ok(ready.clone())),
        CompletionState::Rejected(error) => Some(Err(error.clone())),
        CompletionState::Loading(_) => None,
    }
}

impl<L: Clone> Clone for Completion<L> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading.clone(),
            shared: Arc::clone(&self.shared),
            settled: self.settled.clone(),
        }
    }
}

impl<L> fmt::Debug for Completion<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("Completion")
            .field("state", &shared.state.label())
            .field("observers", &shared.observers.len())
            .finish()
    }
}

impl<L> IntoFuture for Completion<L>
where
    L: Clone + Send + 'static,
{
    type Output = Outcome<L>;
    type IntoFuture = Pin<Box<dyn Future<Output = Outcome<L>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(wait(self.shared, self.settled))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// One-shot handle that settles a [`Completion`].
///
/// Every settling method consumes the resolver. A terminal item that does not
/// match its channel is refused with an error, and the completion is rejected
/// with that error as the cause. A resolver dropped without settling rejects
/// the completion with [`CompletionConfig::abandon_message`].
pub struct Resolver<L>
where
    L: Loadable + Clone,
    L::Item: Clone,
{
    loading: L,
    shared: Arc<Mutex<Shared<L>>>,
    notify: watch::Sender<bool>,
    config: CompletionConfig,
}

impl<L> Resolver<L>
where
    L: Loadable + Clone,
    L::Item: Clone,
{
    /// The loading item being resolved.
    pub fn loading_item(&self) -> &L {
        &self.loading
    }

    /// Fulfil with a terminal item whose status is `ready`.
    pub fn resolve(self, ready: L) -> CompletionResult<()> {
        let attempt = self.try_resolve(ready);
        self.fail_on_violation(&attempt);
        attempt
    }

    /// Reject with a terminal item whose status records an error.
    pub fn reject(self, failed: L) -> CompletionResult<()> {
        let attempt = self.try_reject(failed);
        self.fail_on_violation(&attempt);
        attempt
    }

    /// Mark the loading item ready with `item` and fulfil.
    pub fn succeed(self, item: L::Item) -> CompletionResult<()> {
        let attempt = mark_ready(&self.loading, Some(item))
            .map_err(CompletionError::from)
            .and_then(|ready| self.try_resolve(ready));
        self.fail_on_violation(&attempt);
        attempt
    }

    /// Mark the loading item failed with `cause` and reject.
    pub fn fail(self, cause: Failure) -> CompletionResult<()> {
        self.try_fail(cause)
    }

    pub(crate) fn try_resolve(&self, ready: L) -> CompletionResult<()> {
        let status = ready.loadable_status();
        if !status.ready {
            return Err(CompletionError::NotReady(status.clone()));
        }
        self.settle(CompletionState::Fulfilled(ready));
        Ok(())
    }

    pub(crate) fn try_reject(&self, failed: L) -> CompletionResult<()> {
        let status = failed.loadable_status().clone();
        let error = LoadError::new(failed).map_err(|_| CompletionError::NotFailed(status))?;
        self.settle(CompletionState::Rejected(error));
        Ok(())
    }

    pub(crate) fn try_fail(&self, cause: Failure) -> CompletionResult<()> {
        let failed = mark_failed(&self.loading, cause)?;
        self.try_reject(failed)
    }

    /// Turn a refused settlement into a rejection carrying the violation.
    pub(crate) fn fail_on_violation(&self, attempt: &CompletionResult<()>) {
        if let Err(violation) = attempt {
            warn!(error = %violation, "terminal item refused; rejecting completion");
            if let Err(e) = self.try_fail(Failure::new(violation.clone())) {
                warn!(error = %e, "could not record refused terminal item");
            }
        }
    }

    fn settle(&self, next: CompletionState<L>) {
        let (observers, terminal) = {
            let mut shared = lock(&self.shared);
            if shared.state.is_settled() {
                return;
            }
            let terminal = next.item().clone();
            if self.config.trace_transitions {
                debug!(
                    outcome = next.label(),
                    phase = %terminal.loadable_status().phase(),
                    "completion settled"
                );
            }
            shared.state = next;
            (mem::take(&mut shared.observers), terminal)
        };

        for mut observer in observers {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer(&terminal)));
            if delivered.is_err() {
                warn!("completion observer panicked");
            }
        }
        self.notify.send_replace(true);
    }
}

impl<L> Drop for Resolver<L>
where
    L: Loadable + Clone,
    L::Item: Clone,
{
    fn drop(&mut self) {
        if lock(&self.shared).state.is_settled() {
            return;
        }
        warn!(
            reason = %self.config.abandon_message,
            "resolver dropped before settling"
        );
        let cause = Failure::msg(self.config.abandon_message.clone());
        if let Err(e) = self.try_fail(cause) {
            warn!(error = %e, "could not reject abandoned completion");
        }
    }
}

impl<L> fmt::Debug for Resolver<L>
where
    L: Loadable + Clone,
    L::Item: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &lock(&self.shared).state.is_settled())
            .field("config", &self.config)
            .finish()
    }
}
