//! Time helpers written in the transformed calling convention.

use std::time::Duration;

use crate::context::Context;
use crate::error::{TaskError, TaskResult};

/// Sleeps for `dur`, waking early if the token fires.
///
/// Returns `Err(TaskError::cancelled())` when cancellation cut the sleep
/// short, `Ok(())` after the full duration otherwise. The token comes first
/// in the signature, so dialect code calls this helper directly, with no
/// escape hatch.
pub fn sleep(ctx: &Context, dur: Duration) -> TaskResult {
    if ctx.cancelled_within(dur) {
        Err(TaskError::cancelled())
    } else {
        Ok(())
    }
}
