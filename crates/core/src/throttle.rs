//! Rate limiting for high-frequency event handlers.
//!
//! Throttling (not debouncing): the first call runs immediately, and any call
//! arriving less than `limit_ms` after the last executed call is dropped,
//! never queued. Time is passed in by the caller so the limiter works with
//! any clock.

/// Decides whether a call at a given time may run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    limit_ms: f64,
    last_run_ms: Option<f64>,
}

impl RateLimiter {
    /// A limiter whose first call always passes.
    pub fn new(limit_ms: f64) -> Self {
        Self {
            limit_ms,
            last_run_ms: None,
        }
    }

    /// Returns true and records the call if the window since the last
    /// executed call has elapsed.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        let open = match self.last_run_ms {
            None => true,
            Some(last) => now_ms - last >= self.limit_ms,
        };
        if open {
            self.last_run_ms = Some(now_ms);
        }
        open
    }
}

/// Wraps a handler so it runs at most once per `limit_ms`.
pub struct Throttled<F> {
    limiter: RateLimiter,
    handler: F,
}

impl<F> Throttled<F> {
    pub fn new(limit_ms: f64, handler: F) -> Self {
        Self {
            limiter: RateLimiter::new(limit_ms),
            handler,
        }
    }

    /// Invokes the handler with `arg` unless throttled. Returns the handler's
    /// result, or `None` when the call was dropped.
    pub fn call<A, R>(&mut self, now_ms: f64, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        if self.limiter.try_acquire(now_ms) {
            Some((self.handler)(arg))
        } else {
            None
        }
    }
}

/// Combinator form of [`Throttled`]: returns a closure taking `(now_ms, arg)`.
pub fn throttle<A, R>(limit_ms: f64, handler: impl FnMut(A) -> R) -> impl FnMut(f64, A) -> Option<R> {
    let mut throttled = Throttled::new(limit_ms, handler);
    move |now_ms, arg| throttled.call(now_ms, arg)
}
