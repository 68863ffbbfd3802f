//! Request-scoped identity of the signed-in employee.
//!
//! The login gate binds the identity resolved from the session for exactly the
//! lifetime of the downstream handler future. Any code polled inside that
//! future (handlers, repositories, audit stamping) can read it with
//! [`IdentityContext::current`] without the id being passed around.
//!
//! The binding is a tokio task-local, so concurrent requests never observe
//! each other's identity. It is released when the scoped future completes, is
//! dropped (client disconnect, timeout) or unwinds, so a worker thread that
//! picks up the next request always starts unbound. Note that
//! `tokio::spawn` starts a new task and does not inherit the binding.

use std::future::Future;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::auth::Identity;

tokio::task_local! {
    static CURRENT_IDENTITY: Identity;
}

pub struct IdentityContext;

impl IdentityContext {
    /// Run `f` with `identity` bound as the current employee.
    pub async fn scope<F>(identity: Identity, f: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_IDENTITY.scope(identity, f).await
    }

    /// Synchronous variant of [`IdentityContext::scope`].
    pub fn sync_scope<R>(identity: Identity, f: impl FnOnce() -> R) -> R {
        CURRENT_IDENTITY.sync_scope(identity, f)
    }

    /// The employee bound to the running request, if any.
    pub fn current() -> Option<Identity> {
        CURRENT_IDENTITY.try_with(|identity| *identity).ok()
    }

    pub fn is_bound() -> bool {
        Self::current().is_some()
    }
}

/// Who changed a record and when. Filled from the identity context so that
/// repositories never need the acting employee as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditStamp {
    pub at: NaiveDateTime,
    pub by: Option<Identity>,
}

impl AuditStamp {
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self {
            at: now.with_nanosecond(0).unwrap_or(now),
            by: IdentityContext::current(),
        }
    }

    pub fn by_id(&self) -> Option<i64> {
        self.by.map(Identity::value)
    }
}
