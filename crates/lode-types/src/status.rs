//! Lifecycle status of an asynchronously obtained value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::failure::Failure;

/// The `{ready, loading, error}` triple describing where a value is in its
/// fetch lifecycle.
///
/// The three fields are independent. `ready` and `loading` may both be set
/// (a stale value being refreshed), and `error` may be set while `ready` is
/// true (a stale value whose last refresh failed).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Status {
    /// A usable item exists, possibly stale.
    pub ready: bool,
    /// A fetch is currently in flight.
    pub loading: bool,
    /// The most recent failure, if any.
    pub error: Option<Failure>,
}

impl Status {
    /// Create a status from its three fields.
    pub fn new(ready: bool, loading: bool, error: Option<Failure>) -> Self {
        Self {
            ready,
            loading,
            error,
        }
    }

    /// The initial status: nothing loaded, nothing in flight, no error.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Returns `true` if an error is recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Return a copy with every field present in `patch` overriding this one.
    pub fn patched(&self, patch: &StatusPatch) -> Self {
        Self {
            ready: patch.ready.unwrap_or(self.ready),
            loading: patch.loading.unwrap_or(self.loading),
            error: match &patch.error {
                Some(error) => error.clone(),
                None => self.error.clone(),
            },
        }
    }

    /// Classify this status into a single [`Phase`].
    pub fn phase(&self) -> Phase {
        match (self.ready, self.loading, self.error.is_some()) {
            (false, true, _) => Phase::Fetching,
            (true, true, _) => Phase::Refreshing,
            (true, false, false) => Phase::Ready,
            (true, false, true) => Phase::Stale,
            (false, false, true) => Phase::Failed,
            (false, false, false) => Phase::Absent,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ready={}, loading={}",
            self.phase(),
            self.ready,
            self.loading
        )?;
        match &self.error {
            Some(error) => write!(f, ", error={error})"),
            None => write!(f, ")"),
        }
    }
}

/// A flat, partial override for a [`Status`].
///
/// Fields left as `None` keep the value of the status being patched. The
/// `error` field is doubly optional so that a patch can distinguish "leave
/// the error alone" from "clear the error".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusPatch {
    pub ready: Option<bool>,
    pub loading: Option<bool>,
    pub error: Option<Option<Failure>>,
}

impl StatusPatch {
    /// An empty patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(mut self, ready: bool) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn error(mut self, error: Failure) -> Self {
        self.error = Some(Some(error));
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }

    /// Returns `true` if applying this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.ready.is_none() && self.loading.is_none() && self.error.is_none()
    }
}

impl From<Status> for StatusPatch {
    fn from(status: Status) -> Self {
        Self {
            ready: Some(status.ready),
            loading: Some(status.loading),
            error: Some(status.error),
        }
    }
}

/// Coarse lifecycle phase derived from a [`Status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing loaded and nothing in flight.
    Absent,
    /// First fetch in flight, no data yet.
    Fetching,
    /// Data available and a refresh in flight.
    Refreshing,
    /// Data available and current.
    Ready,
    /// Data available but the last refresh failed.
    Stale,
    /// No data and the last fetch failed.
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Fetching => "fetching",
            Self::Refreshing => "refreshing",
            Self::Ready => "ready",
            Self::Stale => "stale",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_idle() {
        let status = Status::default();
        assert_eq!(status, Status::idle());
        assert!(!status.ready);
        assert!(!status.loading);
        assert!(status.error.is_none());
        assert_eq!(status.phase(), Phase::Absent);
    }

    #[test]
    fn empty_patch_is_identity() {
        let failure = Failure::msg("x");
        let status = Status::new(true, true, Some(failure));
        assert!(StatusPatch::new().is_empty());
        assert_eq!(status.patched(&StatusPatch::new()), status);
    }

    #[test]
    fn patch_overrides_only_present_fields() {
        let failure = Failure::msg("old");
        let status = Status::new(true, false, Some(failure.clone()));
        let patched = status.patched(&StatusPatch::new().loading(true));
        assert!(patched.ready);
        assert!(patched.loading);
        assert_eq!(patched.error, Some(failure));
    }

    #[test]
    fn patch_can_clear_error() {
        let status = Status::new(false, false, Some(Failure::msg("old")));
        let patched = status.patched(&StatusPatch::new().clear_error());
        assert!(patched.error.is_none());
    }

    #[test]
    fn full_patch_from_status_replaces_everything() {
        let target = Status::new(true, true, None);
        let source = Status::new(false, false, Some(Failure::msg("x")));
        assert_eq!(source.patched(&StatusPatch::from(target.clone())), target);
    }

    #[test]
    fn phases() {
        let err = || Some(Failure::msg("e"));
        assert_eq!(Status::new(false, true, None).phase(), Phase::Fetching);
        assert_eq!(Status::new(true, true, None).phase(), Phase::Refreshing);
        assert_eq!(Status::new(true, false, None).phase(), Phase::Ready);
        assert_eq!(Status::new(true, false, err()).phase(), Phase::Stale);
        assert_eq!(Status::new(false, false, err()).phase(), Phase::Failed);
    }

    #[test]
    fn display_includes_error() {
        let status = Status::new(true, false, Some(Failure::msg("gone")));
        assert_eq!(
            status.to_string(),
            "stale (ready=true, loading=false, error=gone)"
        );
        assert_eq!(
            Status::idle().to_string(),
            "absent (ready=false, loading=false)"
        );
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        (any::<bool>(), any::<bool>(), proptest::option::of("[a-z ]{1,12}")).prop_map(
            |(ready, loading, message)| Status::new(ready, loading, message.map(Failure::msg)),
        )
    }

    proptest! {
        #[test]
        fn patched_takes_present_fields_from_patch(
            status in arb_status(),
            ready in proptest::option::of(any::<bool>()),
            loading in proptest::option::of(any::<bool>()),
            clear in any::<bool>(),
        ) {
            let patch = StatusPatch {
                ready,
                loading,
                error: clear.then_some(None),
            };
            let patched = status.patched(&patch);
            prop_assert_eq!(patched.ready, ready.unwrap_or(status.ready));
            prop_assert_eq!(patched.loading, loading.unwrap_or(status.loading));
            if clear {
                prop_assert!(patched.error.is_none());
            } else {
                prop_assert_eq!(patched.error, status.error);
            }
        }

        #[test]
        fn serialized_status_is_always_valid(status in arb_status()) {
            let json = serde_json::to_value(&status).unwrap();
            prop_assert!(crate::is_status(&json));
            let back = Status::try_from(&json).unwrap();
            prop_assert_eq!(back.phase(), status.phase());
            prop_assert_eq!(
                back.error.map(|e| e.message()),
                status.error.map(|e| e.message())
            );
        }
    }

    #[test]
    fn serde_shape() {
        let status = Status::new(true, false, Some(Failure::msg("nope")));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ready": true,
                "loading": false,
                "error": { "message": "nope" }
            })
        );
    }
}
