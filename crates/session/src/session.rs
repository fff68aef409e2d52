//! Per-identity session holder with stale-resolution discard.
//!
//! Every resolution attempt takes a [`ResolutionTicket`]. Only the ticket of
//! the most recent attempt may install its result; anything older (or a
//! result arriving after sign-out) is dropped.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use outpost_access::{
    AuthorizationContext, IdentityClaims, LocationSelection, MutationGate, compute_mutation_gate,
    compute_selection,
};

use crate::directory::AccessDirectory;
use crate::resolver::{ContextResolver, ResolveError};

#[derive(Debug, Clone)]
pub enum SessionState {
    Unresolved,
    Resolving,
    Ready(Arc<AuthorizationContext>),
    Failed(ResolveError),
    SignedOut,
}

/// Proof of a started resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has not been resolved")]
    NotResolved,

    #[error("session resolution in progress")]
    Resolving,

    #[error("session signed out")]
    SignedOut,

    #[error(transparent)]
    Failed(#[from] ResolveError),

    /// A newer resolution (or a sign-out) replaced this one.
    #[error("resolution superseded by a newer request")]
    Superseded,
}

#[derive(Debug)]
struct Inner {
    generation: u64,
    state: SessionState,
    /// State in effect before the in-flight resolution started.
    settled: SessionState,
}

#[derive(Debug)]
pub struct Session {
    inner: RwLock<Inner>,
}

impl Inner {
    fn is_current(&self, ticket: ResolutionTicket) -> bool {
        self.generation == ticket.generation && matches!(self.state, SessionState::Resolving)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                generation: 0,
                state: SessionState::Unresolved,
                settled: SessionState::Unresolved,
            }),
        }
    }

    // Poisoning only means a writer panicked mid-update; every write below
    // leaves `Inner` consistent, so the data is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.read().state.clone()
    }

    /// Start a resolution; any earlier in-flight attempt becomes stale.
    pub fn begin(&self) -> ResolutionTicket {
        let mut inner = self.write();
        inner.generation += 1;
        if !matches!(inner.state, SessionState::Resolving) {
            inner.settled = std::mem::replace(&mut inner.state, SessionState::Resolving);
        }
        ResolutionTicket {
            generation: inner.generation,
        }
    }

    pub fn is_current(&self, ticket: ResolutionTicket) -> bool {
        self.read().is_current(ticket)
    }

    /// Give up on a resolution that will never complete.
    ///
    /// If `ticket` is still the latest attempt, the state from before
    /// [`Session::begin`] comes back; otherwise nothing changes.
    pub fn abandon(&self, ticket: ResolutionTicket) {
        let mut inner = self.write();
        if !inner.is_current(ticket) {
            return;
        }
        inner.state = inner.settled.clone();
        tracing::debug!(
            ticket = ticket.generation,
            "resolution abandoned; previous state restored"
        );
    }

    /// Install a resolution result if `ticket` is still the latest attempt.
    pub fn complete(
        &self,
        ticket: ResolutionTicket,
        result: Result<Arc<AuthorizationContext>, ResolveError>,
    ) -> Completion {
        let mut inner = self.write();
        if !inner.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.generation,
                current = inner.generation,
                "discarding stale resolution result"
            );
            return Completion::Discarded;
        }

        inner.state = match result {
            Ok(ctx) => SessionState::Ready(ctx),
            Err(e) => SessionState::Failed(e),
        };
        Completion::Applied
    }

    /// Drop the context and invalidate any in-flight resolution.
    pub fn sign_out(&self) {
        let mut inner = self.write();
        inner.generation += 1;
        inner.state = SessionState::SignedOut;
        inner.settled = SessionState::SignedOut;
        tracing::info!("session signed out");
    }

    pub fn context(&self) -> Result<Arc<AuthorizationContext>, SessionError> {
        match &self.read().state {
            SessionState::Ready(ctx) => Ok(Arc::clone(ctx)),
            SessionState::Unresolved => Err(SessionError::NotResolved),
            SessionState::Resolving => Err(SessionError::Resolving),
            SessionState::Failed(e) => Err(SessionError::Failed(e.clone())),
            SessionState::SignedOut => Err(SessionError::SignedOut),
        }
    }

    pub fn selection(&self, hint: Option<&str>) -> Result<LocationSelection, SessionError> {
        let ctx = self.context()?;
        Ok(compute_selection(hint, &ctx))
    }

    pub fn mutation_gate(&self, hint: Option<&str>) -> Result<MutationGate, SessionError> {
        Ok(compute_mutation_gate(&self.selection(hint)?))
    }

    /// Run a full resolution through `resolver` and install the result.
    ///
    /// Returns [`SessionError::Superseded`] when another resolution or a
    /// sign-out happened while this one was in flight.
    pub async fn resolve_with<D: AccessDirectory>(
        &self,
        resolver: &ContextResolver<D>,
        identity: Option<&IdentityClaims>,
    ) -> Result<Arc<AuthorizationContext>, SessionError> {
        let mut pending = PendingResolution {
            session: self,
            ticket: Some(self.begin()),
        };
        let result = resolver.resolve(identity).await.map(Arc::new);

        match pending.complete(result.clone()) {
            Completion::Applied => result.map_err(SessionError::from),
            Completion::Discarded => Err(SessionError::Superseded),
        }
    }
}

/// Abandons its ticket when dropped before completing, e.g. when the
/// surrounding future is cancelled.
struct PendingResolution<'a> {
    session: &'a Session,
    ticket: Option<ResolutionTicket>,
}

impl PendingResolution<'_> {
    fn complete(&mut self, result: Result<Arc<AuthorizationContext>, ResolveError>) -> Completion {
        match self.ticket.take() {
            Some(ticket) => self.session.complete(ticket, result),
            None => Completion::Discarded,
        }
    }
}

impl Drop for PendingResolution<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.session.abandon(ticket);
        }
    }
}
