use lode_core::LoadError;

/// Where a completion is in its single transition.
#[derive(Clone, Debug)]
pub enum CompletionState<L> {
    /// The operation is in flight; holds the originating loading item.
    Loading(L),
    /// Settled successfully with a ready item.
    Fulfilled(L),
    /// Settled with a failure carrying the failed item.
    Rejected(LoadError<L>),
}

impl<L> CompletionState<L> {
    /// Returns `true` once the completion has left `Loading`.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading(_))
    }

    /// The item this state currently holds, whatever the outcome.
    pub fn item(&self) -> &L {
        match self {
            Self::Loading(item) | Self::Fulfilled(item) => item,
            Self::Rejected(error) => error.loadable(),
        }
    }

    /// The terminal item, if settled.
    pub fn terminal_item(&self) -> Option<&L> {
        if self.is_settled() {
            Some(self.item())
        } else {
            None
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading(_) => "loading",
            Self::Fulfilled(_) => "fulfilled",
            Self::Rejected(_) => "rejected",
        }
    }
}
