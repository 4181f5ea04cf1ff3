//! # Per-Request Resource Scope
//!
//! A [`ResourceScope`] owns at most one backing-store handle and guarantees
//! it is released exactly once. Release happens in `Drop`, so it runs on
//! every way out of a handler: normal return, an early `?` on a business or
//! query error, a panic unwinding through the handler, or the request future
//! being dropped because the client disconnected or timed out.
//!
//! Calling [`ResourceScope::release`] by hand is allowed and idempotent; a
//! scope that never acquired anything releases nothing.

use std::fmt;

use tracing::{debug, warn};
use uuid::Uuid;

use super::{Connector, DatabaseError};

/// A single-use backing-store connection.
pub trait ResourceHandle {
    /// Close the connection. Consumes the handle so it cannot be used again.
    fn release(self) -> Result<(), DatabaseError>;
}

/// Observable lifecycle state of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Unacquired,
    Acquired,
    Released,
}

enum Slot<H> {
    Unacquired,
    Acquired(H),
    Released,
}

/// Scoped ownership of one connection for one request.
pub struct ResourceScope<H: ResourceHandle> {
    id: Uuid,
    slot: Slot<H>,
}

impl<H: ResourceHandle> ResourceScope<H> {
    /// An empty scope in the `Unacquired` state.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            slot: Slot::Unacquired,
        }
    }

    /// Open a fresh connection and wrap it in a new scope.
    pub async fn acquire<C>(connector: &C) -> Result<Self, DatabaseError>
    where
        C: Connector<Handle = H>,
    {
        let mut scope = Self::new();
        scope.open(connector).await?;
        Ok(scope)
    }

    /// Move from `Unacquired` to `Acquired`.
    ///
    /// On failure the scope stays `Unacquired`. A scope is single-use, so
    /// opening one that was already acquired (or released) is rejected.
    pub async fn open<C>(&mut self, connector: &C) -> Result<(), DatabaseError>
    where
        C: Connector<Handle = H>,
    {
        if !matches!(self.slot, Slot::Unacquired) {
            return Err(DatabaseError::HandleUnavailable(self.state()));
        }

        match connector.connect().await {
            Ok(handle) => {
                debug!(scope = %self.id, "Connection acquired");
                self.slot = Slot::Acquired(handle);
                Ok(())
            }
            Err(e) => {
                warn!(scope = %self.id, "Connection acquisition failed: {}", e);
                Err(e)
            }
        }
    }

    /// Borrow the live handle.
    pub fn handle(&self) -> Result<&H, DatabaseError> {
        match &self.slot {
            Slot::Acquired(handle) => Ok(handle),
            _ => Err(DatabaseError::HandleUnavailable(self.state())),
        }
    }

    pub fn state(&self) -> ScopeState {
        match self.slot {
            Slot::Unacquired => ScopeState::Unacquired,
            Slot::Acquired(_) => ScopeState::Acquired,
            Slot::Released => ScopeState::Released,
        }
    }

    /// Identifier used to correlate this scope's log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Release the handle if one is held.
    ///
    /// A failing release is logged and swallowed so it never replaces the
    /// error the handler is already returning.
    pub fn release(&mut self) {
        if !matches!(self.slot, Slot::Acquired(_)) {
            return;
        }

        if let Slot::Acquired(handle) = std::mem::replace(&mut self.slot, Slot::Released) {
            match handle.release() {
                Ok(()) => debug!(scope = %self.id, "Connection released"),
                Err(e) => warn!(scope = %self.id, "Connection release failed: {}", e),
            }
        }
    }
}

impl<H: ResourceHandle> Default for ResourceScope<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ResourceHandle> Drop for ResourceScope<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: ResourceHandle> fmt::Debug for ResourceScope<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceScope")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::future::Future;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    use futures::executor::block_on;
    use futures::future::{self, FutureExt};

    use super::*;

    /// Shared acquire/release tallies.
    #[derive(Default, Clone)]
    pub(crate) struct Tally {
        pub acquired: Rc<Cell<usize>>,
        pub released: Rc<Cell<usize>>,
    }

    pub(crate) struct CountingHandle {
        released: Rc<Cell<usize>>,
        fail_release: bool,
    }

    impl ResourceHandle for CountingHandle {
        fn release(self) -> Result<(), DatabaseError> {
            self.released.set(self.released.get() + 1);
            if self.fail_release {
                Err(DatabaseError::ConnectionError("socket already gone".to_string()))
            } else {
                Ok(())
            }
        }
    }

    pub(crate) struct CountingConnector {
        pub tally: Tally,
        pub reachable: bool,
        pub fail_release: bool,
    }

    impl CountingConnector {
        pub(crate) fn new() -> Self {
            Self {
                tally: Tally::default(),
                reachable: true,
                fail_release: false,
            }
        }
    }

    impl Connector for CountingConnector {
        type Handle = CountingHandle;

        fn connect(&self) -> impl Future<Output = Result<CountingHandle, DatabaseError>> {
            let result = if self.reachable {
                self.tally.acquired.set(self.tally.acquired.get() + 1);
                Ok(CountingHandle {
                    released: self.tally.released.clone(),
                    fail_release: self.fail_release,
                })
            } else {
                Err(DatabaseError::ConnectionError("connection refused".to_string()))
            };
            future::ready(result)
        }
    }

    fn balanced(tally: &Tally) -> bool {
        tally.acquired.get() == tally.released.get()
    }

    #[test]
    fn test_normal_completion_releases_once() {
        let connector = CountingConnector::new();

        let outcome: Result<u32, DatabaseError> = block_on(async {
            let scope = ResourceScope::acquire(&connector).await?;
            assert_eq!(scope.state(), ScopeState::Acquired);
            scope.handle()?;
            Ok(7)
        });

        assert_eq!(outcome.unwrap(), 7);
        assert_eq!(connector.tally.acquired.get(), 1);
        assert!(balanced(&connector.tally));
    }

    #[test]
    fn test_business_error_releases_once() {
        let connector = CountingConnector::new();

        let outcome: Result<(), &str> = block_on(async {
            let _scope = ResourceScope::acquire(&connector).await.map_err(|_| "infra")?;
            Err("Cliente not found")
        });

        assert_eq!(outcome.unwrap_err(), "Cliente not found");
        assert!(balanced(&connector.tally));
    }

    #[test]
    fn test_failure_mid_handler_releases_and_propagates() {
        let connector = CountingConnector::new();

        let outcome: Result<(), DatabaseError> = block_on(async {
            let scope = ResourceScope::acquire(&connector).await?;
            scope.handle()?;
            Err(DatabaseError::ConnectionError("server closed the connection".to_string()))
        });

        assert!(matches!(outcome, Err(DatabaseError::ConnectionError(_))));
        assert_eq!(connector.tally.released.get(), 1);
    }

    #[test]
    fn test_failed_acquire_stays_unacquired() {
        let connector = CountingConnector {
            reachable: false,
            ..CountingConnector::new()
        };

        let mut scope = ResourceScope::new();
        let result = block_on(scope.open(&connector));

        assert!(matches!(result, Err(DatabaseError::ConnectionError(_))));
        assert_eq!(scope.state(), ScopeState::Unacquired);
        scope.release();
        drop(scope);
        assert_eq!(connector.tally.released.get(), 0);
    }

    #[test]
    fn test_double_release_is_noop() {
        let connector = CountingConnector::new();
        let mut scope = block_on(ResourceScope::acquire(&connector)).unwrap();

        scope.release();
        scope.release();
        assert_eq!(scope.state(), ScopeState::Released);
        drop(scope);

        assert_eq!(connector.tally.released.get(), 1);
    }

    #[test]
    fn test_released_scope_rejects_access_and_reopen() {
        let connector = CountingConnector::new();
        let mut scope = block_on(ResourceScope::acquire(&connector)).unwrap();
        scope.release();

        assert!(matches!(
            scope.handle(),
            Err(DatabaseError::HandleUnavailable(ScopeState::Released))
        ));
        assert!(block_on(scope.open(&connector)).is_err());
        assert_eq!(connector.tally.acquired.get(), 1);
    }

    #[test]
    fn test_release_failure_is_swallowed() {
        let connector = CountingConnector {
            fail_release: true,
            ..CountingConnector::new()
        };

        let outcome: Result<(), &str> = block_on(async {
            let _scope = ResourceScope::acquire(&connector).await.map_err(|_| "infra")?;
            Err("original failure")
        });

        assert_eq!(outcome.unwrap_err(), "original failure");
        assert_eq!(connector.tally.released.get(), 1);
    }

    #[test]
    fn test_panic_in_handler_still_releases() {
        let connector = CountingConnector::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            block_on(async {
                let _scope = ResourceScope::acquire(&connector).await.unwrap();
                panic!("handler blew up");
            })
        }));

        assert!(result.is_err());
        assert!(balanced(&connector.tally));
    }

    #[test]
    fn test_cancelled_request_releases() {
        let connector = CountingConnector::new();

        let request = async {
            let _scope = ResourceScope::acquire(&connector).await.unwrap();
            future::pending::<()>().await;
        }
        .boxed_local();

        // Poll once so the scope is acquired, then drop the in-flight future.
        let mut request = request;
        assert!(block_on(future::poll_immediate(&mut request)).is_none());
        assert_eq!(connector.tally.acquired.get(), 1);
        drop(request);

        assert!(balanced(&connector.tally));
    }

    #[test]
    fn test_each_acquire_is_a_fresh_handle() {
        let connector = CountingConnector::new();

        for _ in 0..3 {
            let scope = block_on(ResourceScope::acquire(&connector)).unwrap();
            drop(scope);
        }

        assert_eq!(connector.tally.acquired.get(), 3);
        assert_eq!(connector.tally.released.get(), 3);
    }
}
