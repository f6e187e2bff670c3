//! Lifecycle transitions over any [`Loadable`].
//!
//! Every transition reads the current item and status through the access
//! points, computes the next status, and hands both to the receiver's own
//! [`Loadable::rebuild`]. The result is therefore always the same
//! representation as the input, and the input is left untouched.
//!
//! `ready` follows a stale-while-revalidate policy: starting a fetch or
//! recording a failure keeps `ready` true whenever an item exists.

use tracing::debug;

use lode_types::{Failure, Status, StatusPatch};

use crate::error::{LoadableError, LoadableResult};
use crate::loadable::Loadable;

/// Replace the item and merge `patch` onto the current status.
///
/// Nothing is inferred: `ready` is not derived from whether `item` is
/// present, so the caller is responsible for a consistent result.
pub fn update<L: Loadable>(
    loadable: &L,
    item: Option<L::Item>,
    patch: &StatusPatch,
) -> LoadableResult<L> {
    let status = loadable.loadable_status().patched(patch);
    debug!(phase = %status.phase(), "loadable updated");
    loadable.rebuild(item, status)
}

/// Begin a fetch: set `loading`, clear any previous error, and keep `ready`
/// only if an item already exists.
pub fn mark_loading<L>(loadable: &L) -> LoadableResult<L>
where
    L: Loadable,
    L::Item: Clone,
{
    let item = loadable.loadable_item().cloned();
    let status = Status::new(item.is_some(), true, None);
    debug!(phase = %status.phase(), "loadable marked loading");
    loadable.rebuild(item, status)
}

/// Complete a fetch successfully.
///
/// Uses `item` when given, otherwise keeps the current item. Fails with
/// [`LoadableError::MissingItem`] if neither exists.
pub fn mark_ready<L>(loadable: &L, item: Option<L::Item>) -> LoadableResult<L>
where
    L: Loadable,
    L::Item: Clone,
{
    let item = match item {
        Some(item) => item,
        None => loadable
            .loadable_item()
            .cloned()
            .ok_or(LoadableError::MissingItem)?,
    };
    let status = Status::new(true, false, None);
    debug!(phase = %status.phase(), "loadable marked ready");
    loadable.rebuild(Some(item), status)
}

/// Complete a fetch with a failure.
///
/// The current item is kept, so a previously loaded value stays `ready`
/// and becomes stale.
pub fn mark_failed<L>(loadable: &L, reason: Failure) -> LoadableResult<L>
where
    L: Loadable,
    L::Item: Clone,
{
    let item = loadable.loadable_item().cloned();
    let status = Status::new(item.is_some(), false, Some(reason));
    debug!(phase = %status.phase(), "loadable marked failed");
    loadable.rebuild(item, status)
}

/// Method-call form of the transitions, available on every [`Loadable`].
pub trait Transition: Loadable {
    fn update(&self, item: Option<Self::Item>, patch: &StatusPatch) -> LoadableResult<Self> {
        update(self, item, patch)
    }

    fn mark_loading(&self) -> LoadableResult<Self>
    where
        Self::Item: Clone,
    {
        mark_loading(self)
    }

    fn mark_ready(&self, item: Option<Self::Item>) -> LoadableResult<Self>
    where
        Self::Item: Clone,
    {
        mark_ready(self, item)
    }

    fn mark_failed(&self, reason: Failure) -> LoadableResult<Self>
    where
        Self::Item: Clone,
    {
        mark_failed(self, reason)
    }
}

impl<L: Loadable> Transition for L {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::LoadableProxy;
    use crate::record::LoadableRecord;
    use proptest::prelude::*;

    fn ready_record(item: i32) -> LoadableRecord<i32> {
        LoadableRecord::new(Some(item), StatusPatch::new().ready(true))
    }

    // -----------------------------------------------------------------------
    // mark_loading
    // -----------------------------------------------------------------------

    #[test]
    fn loading_without_item_is_not_ready() {
        let record = LoadableRecord::<i32>::empty();
        let loading = mark_loading(&record).unwrap();
        assert_eq!(loading.status(), &Status::new(false, true, None));
        assert!(loading.item().is_none());
    }

    #[test]
    fn loading_with_item_stays_ready_and_clears_error() {
        let failed = LoadableRecord::new(
            Some(1),
            StatusPatch::new().ready(true).error(Failure::msg("old")),
        );
        let loading = mark_loading(&failed).unwrap();
        assert_eq!(loading.status(), &Status::new(true, true, None));
        assert_eq!(loading.item(), Some(&1));
    }

    // -----------------------------------------------------------------------
    // mark_ready
    // -----------------------------------------------------------------------

    #[test]
    fn ready_keeps_current_item() {
        let loading = mark_loading(&ready_record(5)).unwrap();
        let ready = mark_ready(&loading, None).unwrap();
        assert_eq!(ready.item(), Some(&5));
        assert_eq!(ready.status(), &Status::new(true, false, None));
    }

    #[test]
    fn ready_with_new_item_replaces_it() {
        let ready = mark_ready(&ready_record(5), Some(6)).unwrap();
        assert_eq!(ready.item(), Some(&6));
    }

    #[test]
    fn ready_without_any_item_fails() {
        let loading = mark_loading(&LoadableRecord::<i32>::empty()).unwrap();
        assert_eq!(mark_ready(&loading, None), Err(LoadableError::MissingItem));
    }

    // -----------------------------------------------------------------------
    // mark_failed
    // -----------------------------------------------------------------------

    #[test]
    fn failure_keeps_stale_item() {
        let reason = Failure::msg("timeout");
        let loading = mark_loading(&ready_record(3)).unwrap();
        let failed = mark_failed(&loading, reason.clone()).unwrap();
        assert_eq!(failed.item(), Some(&3));
        assert_eq!(failed.status(), &Status::new(true, false, Some(reason)));
    }

    #[test]
    fn failure_without_item_is_not_ready() {
        let reason = Failure::msg("404");
        let loading = mark_loading(&LoadableRecord::<i32>::empty()).unwrap();
        let failed = mark_failed(&loading, reason.clone()).unwrap();
        assert_eq!(failed.status(), &Status::new(false, false, Some(reason)));
    }

    // -----------------------------------------------------------------------
    // update
    // -----------------------------------------------------------------------

    #[test]
    fn update_applies_patch_without_inference() {
        let record = LoadableRecord::<i32>::empty();
        let updated = update(&record, Some(9), &StatusPatch::new().loading(true)).unwrap();
        assert_eq!(updated.item(), Some(&9));
        // Item present, but `ready` is not inferred.
        assert_eq!(updated.status(), &Status::new(false, true, None));

        let cleared = update(&updated, None, &StatusPatch::new().ready(true)).unwrap();
        assert!(cleared.item().is_none());
        assert_eq!(cleared.status(), &Status::new(true, true, None));
    }

    // -----------------------------------------------------------------------
    // Representation preservation
    // -----------------------------------------------------------------------

    #[test]
    fn proxy_transitions_return_proxies() {
        let proxy = LoadableProxy::new(Some(String::from("v1")), StatusPatch::new()).unwrap();
        let loading: LoadableProxy<String> = proxy.mark_loading().unwrap();
        let ready: LoadableProxy<String> = loading.mark_ready(Some("v2".into())).unwrap();
        assert_eq!(ready.to_string(), "v2");
        assert_eq!(ready.loadable_status(), &Status::new(true, false, None));
        // Inputs are untouched.
        assert_eq!(proxy.to_string(), "v1");
        assert_eq!(proxy.loadable_status(), &Status::idle());
        assert!(loading.loadable_status().loading);
    }

    #[test]
    fn proxy_mark_ready_rejects_boolean_json() {
        let proxy = LoadableProxy::<serde_json::Value>::empty();
        let err = proxy
            .mark_ready(Some(serde_json::Value::Bool(true)))
            .unwrap_err();
        assert!(matches!(err, LoadableError::Delegate(_)));
    }

    #[test]
    fn method_form_matches_free_functions() {
        let record = ready_record(2);
        assert_eq!(record.mark_loading(), mark_loading(&record));
        assert_eq!(record.mark_ready(Some(4)), mark_ready(&record, Some(4)));
    }

    // -----------------------------------------------------------------------
    // Transition laws
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn laws_hold_for_records(item in any::<i64>(), ready in any::<bool>(), loading in any::<bool>()) {
            let reason = Failure::msg("e");
            let record = LoadableRecord::new(
                Some(item),
                StatusPatch::new().ready(ready).loading(loading),
            );

            let loading_next = mark_loading(&record).unwrap();
            prop_assert_eq!(loading_next.status(), &Status::new(true, true, None));
            prop_assert_eq!(loading_next.item(), Some(&item));

            let ready_next = mark_ready(&record, None).unwrap();
            prop_assert_eq!(ready_next.status(), &Status::new(true, false, None));
            prop_assert_eq!(ready_next.item(), Some(&item));

            let failed = mark_failed(&record, reason.clone()).unwrap();
            prop_assert_eq!(failed.status(), &Status::new(true, false, Some(reason)));
        }

        #[test]
        fn laws_hold_for_proxies(item in any::<i64>(), replacement in any::<i64>()) {
            let proxy = LoadableProxy::new(Some(item), StatusPatch::new()).unwrap();

            let loading_next = mark_loading(&proxy).unwrap();
            prop_assert_eq!(loading_next.loadable_status(), &Status::new(true, true, None));
            prop_assert!(loading_next == item);

            let ready_next = mark_ready(&proxy, Some(replacement)).unwrap();
            prop_assert!(ready_next == replacement);
            prop_assert_eq!(ready_next.loadable_status(), &Status::new(true, false, None));
        }

        #[test]
        fn update_is_a_pure_patch(
            ready in any::<bool>(),
            loading in any::<bool>(),
            patch_ready in proptest::option::of(any::<bool>()),
            patch_loading in proptest::option::of(any::<bool>()),
            item in proptest::option::of(any::<u16>()),
        ) {
            let record = LoadableRecord::new(
                Some(0_u16),
                StatusPatch::new().ready(ready).loading(loading),
            );
            let patch = StatusPatch { ready: patch_ready, loading: patch_loading, error: None };
            let updated = update(&record, item, &patch).unwrap();
            prop_assert_eq!(updated.item(), item.as_ref());
            prop_assert_eq!(updated.status().ready, patch_ready.unwrap_or(ready));
            prop_assert_eq!(updated.status().loading, patch_loading.unwrap_or(loading));
            prop_assert!(updated.status().error.is_none());
        }
    }
}
