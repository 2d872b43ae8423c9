//! Panic capture for step bodies, hooks, and teardown actions.
//!
//! Bodies written with `assert!`-style macros unwind instead of returning
//! `Err`. The helpers here convert an unwind into an ordinary [`Failure`] so
//! the surrounding phase can record it and keep going.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::Failure;

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly; anything else falls back to the
/// payload's `Debug` rendering.
///
/// # Examples
///
/// ```
/// use std::any::Any;
/// use stepwise::panic_message;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| format!("opaque panic payload ({payload:?})"))
}

/// Runs a fallible operation, converting an unwind into a [`Failure`].
pub(crate) fn catch_failure(op: impl FnOnce() -> Result<(), Failure>) -> Result<(), Failure> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => Err(Failure::from_panic(payload.as_ref())),
    }
}

/// Awaits a fallible future, converting an unwind during any poll into a
/// [`Failure`].
pub(crate) async fn catch_failure_future<F>(future: F) -> Result<(), Failure>
where
    F: Future<Output = Result<(), Failure>> + Unpin,
{
    match (CatchUnwind { inner: future }).await {
        Ok(result) => result,
        Err(payload) => Err(Failure::from_panic(payload.as_ref())),
    }
}

/// Invokes `call` to obtain a fallible future, then awaits it, converting an
/// unwind in either stage into a [`Failure`].
///
/// Synchronous bodies adapted into the asynchronous signature run their work
/// while the future is being constructed, so the construction call needs the
/// same protection as polling.
pub(crate) async fn catch_failure_call<F>(call: impl FnOnce() -> F) -> Result<(), Failure>
where
    F: Future<Output = Result<(), Failure>> + Unpin,
{
    let future = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(future) => future,
        Err(payload) => return Err(Failure::from_panic(payload.as_ref())),
    };
    catch_failure_future(future).await
}

/// Adapter that resolves to the panic payload when polling the wrapped
/// future unwinds.
struct CatchUnwind<F> {
    inner: F,
}

impl<F> Future for CatchUnwind<F>
where
    F: Future + Unpin,
{
    type Output = Result<F::Output, Box<dyn Any + Send>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.get_mut().inner;
        match panic::catch_unwind(AssertUnwindSafe(|| Pin::new(&mut *inner).poll(cx))) {
            Ok(Poll::Pending) => Poll::Pending,
            Ok(Poll::Ready(value)) => Poll::Ready(Ok(value)),
            Err(payload) => Poll::Ready(Err(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{catch_failure, catch_failure_call, catch_failure_future, panic_message};
    use crate::error::Failure;
    use std::any::Any;
    use std::pin::Pin;

    #[test]
    fn panic_message_extracts_str_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("broken");
        assert_eq!(panic_message(payload.as_ref()), "broken");
    }

    #[test]
    fn panic_message_extracts_string_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted: 42"));
        assert_eq!(panic_message(payload.as_ref()), "formatted: 42");
    }

    #[test]
    fn panic_message_describes_opaque_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert!(panic_message(payload.as_ref()).contains("opaque panic payload"));
    }

    #[test]
    fn catch_failure_passes_results_through() {
        assert!(catch_failure(|| Ok(())).is_ok());
        let failed = catch_failure(|| Err(Failure::message("direct")));
        assert_eq!(failed.map_err(|f| f.to_string()), Err(String::from("direct")));
    }

    #[test]
    fn catch_failure_converts_unwinds() {
        let caught = catch_failure(|| panic!("exploded"));
        assert_eq!(
            caught.map_err(|f| f.to_string()),
            Err(String::from("exploded"))
        );
    }

    #[tokio::test]
    async fn catch_failure_future_converts_unwinds_mid_poll() {
        let future: Pin<Box<dyn Future<Output = Result<(), Failure>>>> = Box::pin(async {
            tokio::task::yield_now().await;
            panic!("async boom");
        });
        let caught = catch_failure_future(future).await;
        assert_eq!(
            caught.map_err(|f| f.to_string()),
            Err(String::from("async boom"))
        );
    }

    #[tokio::test]
    async fn catch_failure_future_passes_success_through() {
        let future: Pin<Box<dyn Future<Output = Result<(), Failure>>>> =
            Box::pin(std::future::ready(Ok(())));
        assert!(catch_failure_future(future).await.is_ok());
    }

    #[tokio::test]
    async fn catch_failure_call_converts_unwinds_during_construction() {
        let caught = catch_failure_call(|| -> Pin<Box<dyn Future<Output = Result<(), Failure>>>> {
            panic!("construction boom");
        })
        .await;
        assert_eq!(
            caught.map_err(|f| f.to_string()),
            Err(String::from("construction boom"))
        );
    }
}
