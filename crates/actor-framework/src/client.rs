//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::scope::Scope;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `ResourceActor`.
///
/// The client forwards requests over a Tokio mpsc channel and receives results via
/// oneshot channels. It holds only a sender, so cloning is cheap and clones can be
/// moved into as many tasks as needed.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Committed entities matching `filter`, in ascending id order.
    pub async fn list<F>(&self, filter: F) -> Result<Vec<T>, FrameworkError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::List {
                filter: Box::new(filter),
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Opens a scope, waiting until any scope held by another caller is closed.
    ///
    /// Dropping the returned guard without calling [`Scope::commit`] rolls it back.
    pub async fn begin(&self) -> Result<Scope<T>, FrameworkError> {
        let (lease_holder, lease) = oneshot::channel();
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Begin { lease, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        let id = response.await.map_err(|_| FrameworkError::ActorDropped)??;
        Ok(Scope::new(self.sender.clone(), id, lease_holder))
    }
}
