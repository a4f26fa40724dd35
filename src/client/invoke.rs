//! Callback-style delivery on top of the awaitable operations.

use std::future::Future;

/// Drive `operation` to completion and hand its result to `callback` exactly once.
pub(crate) async fn deliver<R, F>(operation: impl Future<Output = R>, callback: F)
where
    F: FnOnce(R),
{
    let result = operation.await;
    callback(result);
}
