use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use lode_completion::CompletionConfig;

use crate::cli::SimulateArgs;

/// Which loadable shape `lode simulate` drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    #[default]
    Record,
    Proxy,
}

/// Settings for `lode simulate`, loadable from TOML.
///
/// ```toml
/// value = "hello"
/// delay_ms = 50
/// rounds = 2
/// fail = true
/// failure_message = "upstream unavailable"
/// representation = "proxy"
///
/// [completion]
/// abandon_message = "cancelled"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub value: String,
    pub delay_ms: u64,
    pub rounds: usize,
    pub fail: bool,
    pub failure_message: String,
    pub representation: Representation,
    pub completion: CompletionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            value: "hello".into(),
            delay_ms: 20,
            rounds: 1,
            fail: false,
            failure_message: "simulated failure".into(),
            representation: Representation::Record,
            completion: CompletionConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolve the effective configuration: file first, then flags.
    pub fn from_args(args: &SimulateArgs) -> anyhow::Result<Self> {
        let base = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.overridden_by(args))
    }

    fn overridden_by(mut self, args: &SimulateArgs) -> Self {
        if let Some(value) = &args.value {
            self.value = value.clone();
        }
        if let Some(delay_ms) = args.delay_ms {
            self.delay_ms = delay_ms;
        }
        if let Some(rounds) = args.rounds {
            self.rounds = rounds;
        }
        if args.fail {
            self.fail = true;
        }
        if args.no_fail {
            self.fail = false;
        }
        if let Some(representation) = args.representation {
            self.representation = representation;
        }
        self
    }
}
