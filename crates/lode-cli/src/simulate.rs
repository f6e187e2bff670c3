//! Scripted fetch lifecycle used by `lode simulate`.
//!
//! Round 0 fetches into an empty loadable; every later round refreshes the
//! result of the previous one. When `fail` is set the last round fails, so
//! the final observation is `stale` (or `failed` with no earlier rounds).

use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use lode_completion::fetch_with_config;
use lode_core::{Failure, Loadable, LoadableProxy, LoadableRecord, Phase, Status};

use crate::config::{Representation, SimulationConfig};

/// One snapshot seen by a subscriber.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub round: usize,
    pub phase: Phase,
    pub item: Option<String>,
    pub status: Status,
}

impl Observation {
    fn of<L: Loadable<Item = String>>(round: usize, loadable: &L) -> Self {
        let status = loadable.loadable_status().clone();
        Self {
            round,
            phase: status.phase(),
            item: loadable.loadable_item().cloned(),
            status,
        }
    }
}

pub async fn run(config: &SimulationConfig) -> anyhow::Result<Vec<Observation>> {
    match config.representation {
        Representation::Record => drive(LoadableRecord::empty(), config).await,
        Representation::Proxy => drive(LoadableProxy::empty(), config).await,
    }
}

async fn drive<L>(mut current: L, config: &SimulationConfig) -> anyhow::Result<Vec<Observation>>
where
    L: Loadable<Item = String> + Clone + Send + 'static,
{
    let observed = Arc::new(Mutex::new(Vec::new()));

    for round in 0..=config.rounds {
        let failure = (config.fail && round == config.rounds)
            .then(|| config.failure_message.clone());
        let operation = simulated_fetch(
            format!("{} #{}", config.value, round),
            Duration::from_millis(config.delay_ms),
            failure,
        );

        let completion = fetch_with_config(&current, config.completion.clone(), operation)?;
        let sink = Arc::clone(&observed);
        completion.subscribe(move |loadable: &L| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Observation::of(round, loadable));
        });

        current = match completion.await {
            Ok(ready) => {
                info!(round, "fetch succeeded");
                ready
            }
            Err(error) => {
                warn!(round, %error, "fetch failed");
                error.into_loadable()
            }
        };
    }

    let mut observed = observed.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(mem::take(&mut *observed))
}

async fn simulated_fetch(
    item: String,
    delay: Duration,
    failure: Option<String>,
) -> Result<String, Failure> {
    tokio::time::sleep(delay).await;
    match failure {
        Some(message) => Err(Failure::msg(message)),
        None => Ok(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rounds: usize, fail: bool, representation: Representation) -> SimulationConfig {
        SimulationConfig {
            delay_ms: 0,
            rounds,
            fail,
            representation,
            ..Default::default()
        }
    }

    fn phases(observed: &[Observation]) -> Vec<Phase> {
        observed.iter().map(|o| o.phase).collect()
    }

    #[tokio::test]
    async fn fetch_then_refresh() {
        let observed = run(&config(1, false, Representation::Record)).await.unwrap();
        assert_eq!(
            phases(&observed),
            vec![Phase::Fetching, Phase::Ready, Phase::Refreshing, Phase::Ready]
        );
        assert_eq!(observed[0].item, None);
        assert_eq!(observed[1].item.as_deref(), Some("hello #0"));
        // The refresh keeps the previous item visible while loading.
        assert_eq!(observed[2].item.as_deref(), Some("hello #0"));
        assert_eq!(observed[3].item.as_deref(), Some("hello #1"));
        assert_eq!(observed[3].round, 1);
    }

    #[tokio::test]
    async fn failed_refresh_goes_stale() {
        let observed = run(&config(2, true, Representation::Proxy)).await.unwrap();
        assert_eq!(observed.len(), 6);
        let last = &observed[5];
        assert_eq!(last.phase, Phase::Stale);
        assert_eq!(last.item.as_deref(), Some("hello #1"));
        assert_eq!(
            last.status.error.as_ref().map(Failure::message),
            Some("simulated failure".to_string())
        );
    }

    #[tokio::test]
    async fn failed_first_fetch_has_no_item() {
        let observed = run(&config(0, true, Representation::Record)).await.unwrap();
        assert_eq!(phases(&observed), vec![Phase::Fetching, Phase::Failed]);
        assert!(observed[1].item.is_none());
    }

    #[tokio::test]
    async fn observations_serialize_as_snapshots() {
        let observed = run(&config(0, false, Representation::Proxy)).await.unwrap();
        let json = serde_json::to_value(&observed[1]).unwrap();
        assert_eq!(json["phase"], "ready");
        assert_eq!(json["item"], "hello #0");
        assert_eq!(
            json["status"],
            serde_json::json!({ "ready": true, "loading": false, "error": null })
        );
    }
}
