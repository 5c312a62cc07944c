//! # Scope Guard
//!
//! Client-side handle on a scope granted by a `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, ScopeId};
use tokio::sync::{mpsc, oneshot};

/// An open scope on a `ResourceActor`.
///
/// Reads through [`Scope::scan`] see committed state plus this scope's own staged
/// writes; nothing staged is visible to anyone else until [`Scope::commit`].
///
/// The guard closes the scope exactly once: `commit` and `rollback` consume it, and
/// dropping it on any other path (an error bubbling up with `?`, a timeout dropping
/// the future, a task abort) drops `_lease`, which the actor treats as a rollback.
#[must_use = "dropping a scope rolls it back"]
pub struct Scope<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    id: ScopeId,
    _lease: oneshot::Sender<()>,
}

impl<T: ActorEntity> Scope<T> {
    pub(crate) fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        id: ScopeId,
        lease: oneshot::Sender<()>,
    ) -> Self {
        Self {
            sender,
            id,
            _lease: lease,
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Entities matching `filter` as seen from inside the scope, in ascending id order.
    pub async fn scan<F>(&self, filter: F) -> Result<Vec<T>, FrameworkError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Scan {
                scope: self.id,
                filter: Box::new(filter),
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Stages `update` for every id. Either all ids are staged or none are.
    pub async fn stage(&self, ids: Vec<T::Id>, update: T::Update) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Stage {
                scope: self.id,
                ids,
                update,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Publishes the staged writes and closes the scope. Returns the number of
    /// entities written.
    pub async fn commit(self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Commit {
                scope: self.id,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Discards the staged writes and closes the scope.
    pub async fn rollback(self) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Rollback {
                scope: self.id,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
