use serde::{Deserialize, Serialize};

/// Configuration applied to a completion's resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Failure message recorded when a resolver is dropped without settling.
    pub abandon_message: String,
    /// Emit a `debug` event every time a completion settles.
    pub trace_transitions: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            abandon_message: "operation dropped before it completed".into(),
            trace_transitions: true,
        }
    }
}

impl CompletionConfig {
    /// Use a custom abandonment message.
    pub fn with_abandon_message(mut self, message: impl Into<String>) -> Self {
        self.abandon_message = message.into();
        self
    }

    /// A configuration that never logs settlements.
    pub fn quiet() -> Self {
        Self {
            trace_transitions: false,
            ..Default::default()
        }
    }
}
