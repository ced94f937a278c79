//! Async runtime helpers for blocking callers.
//!
//! This module provides a single entry point for executing async futures from
//! synchronous code paths, reusing the current Tokio runtime when available.

use std::future::Future;
use std::io;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;

/// Execute an async future from synchronous code.
///
/// # Arguments
/// - `future`: The future to run to completion.
///
/// # Returns
/// Returns the future's output, or an I/O error converted into `E` when no
/// runtime can be used to drive it.
///
/// # Notes
/// - Reuses the current runtime when it is multi-threaded.
/// - Falls back to a single-threaded runtime for call sites outside Tokio.
/// - Fails when called from inside a current-thread runtime, which cannot be blocked.
pub fn block_on_future<F, T, E>(future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<io::Error>,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            task::block_in_place(|| handle.block_on(future))
        }
        Ok(_) => Err(E::from(io::Error::other(
            "cannot block inside a current-thread Tokio runtime; await the async API instead",
        ))),
        Err(_) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(future),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_outside_of_a_runtime() {
        let result: Result<u32, io::Error> = block_on_future(async { Ok(7) });
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reuses_a_multi_thread_runtime() {
        let result: Result<&str, io::Error> = block_on_future(async { Ok("done") });
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn refuses_to_block_a_current_thread_runtime() {
        let result: Result<(), io::Error> = block_on_future(async { Ok(()) });
        assert!(result.is_err());
    }
}
