use std::error::Error;
use std::future::Future;

use tokio::runtime::Handle;

use lode_core::{mark_loading, mark_ready, Loadable};
use lode_types::Failure;

use crate::completion::Completion;
use crate::config::CompletionConfig;
use crate::error::{CompletionError, CompletionResult};

/// Start fetching into `source`.
///
/// Marks `source` loading, spawns `operation` on the current tokio runtime,
/// and settles the returned completion with `mark_ready` on success or
/// `mark_failed` on error. `source` itself is left untouched.
pub fn fetch<L, F, E>(source: &L, operation: F) -> CompletionResult<Completion<L>>
where
    L: Loadable + Clone + Send + 'static,
    L::Item: Clone,
    F: Future<Output = Result<L::Item, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    fetch_with_config(source, CompletionConfig::default(), operation)
}

/// [`fetch`] with an explicit configuration.
pub fn fetch_with_config<L, F, E>(
    source: &L,
    config: CompletionConfig,
    operation: F,
) -> CompletionResult<Completion<L>>
where
    L: Loadable + Clone + Send + 'static,
    L::Item: Clone,
    F: Future<Output = Result<L::Item, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    let handle = Handle::try_current().map_err(|_| CompletionError::NoRuntime)?;
    let loading = mark_loading(source)?;
    let (completion, resolver) = Completion::with_config(loading, config)?;
    handle.spawn(async move {
        let attempt = match operation.await {
            Ok(item) => mark_ready(resolver.loading_item(), Some(item))
                .map_err(CompletionError::from)
                .and_then(|ready| resolver.try_resolve(ready)),
            Err(error) => resolver.try_fail(Failure::new(error)),
        };
        resolver.fail_on_violation(&attempt);
    });
    Ok(completion)
}
