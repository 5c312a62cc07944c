//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered
//! from a queue of scripted expectations instead of by a `ResourceActor`. It is the
//! tool for failures that are hard to provoke with a live actor: a fetch that errors
//! halfway through a scope, a commit that never lands, an actor that went away.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None, replies are scripted | Real store and scopes |
//! | **Error Injection** | `return_err` at any step | Requires specific state |
//! | **Use Case** | Logic *around* the client | The actor itself, full system |
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation panics the mock task, which the caller observes as
//! `FrameworkError::ActorDropped`.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError, ScopeId};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Slot { id: u32 }
//! #[derive(Debug)] struct SlotCreate;
//! #[derive(Clone, Debug)] struct SlotUpdate;
//! #[derive(Debug, thiserror::Error)] #[error("slot error")] struct SlotError;
//!
//! #[async_trait]
//! impl ActorEntity for Slot {
//!     type Id = u32; type Create = SlotCreate; type Update = SlotUpdate;
//!     type Context = (); type Error = SlotError;
//!     fn from_create_params(id: u32, _: SlotCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: SlotUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Slot>::new();
//!     mock.expect_begin().return_ok(ScopeId(7));
//!     mock.expect_scan().return_err(FrameworkError::ActorClosed);
//!     mock.expect_rollback().return_ok(());
//!
//!     let client = mock.client();
//!     let scope = client.begin().await.unwrap();
//!     assert!(scope.scan(|_: &Slot| true).await.is_err());
//!     scope.rollback().await.unwrap();
//!
//!     mock.verify();
//! }
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, ScopeId};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A scripted reply to one expected request.
enum Expectation<T: ActorEntity> {
    Create(Result<T::Id, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Begin(Result<ScopeId, FrameworkError>),
    Scan(Result<Vec<T>, FrameworkError>),
    Stage(Result<usize, FrameworkError>),
    Commit(Result<usize, FrameworkError>),
    Rollback(Result<(), FrameworkError>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();
                answer(request, expectation);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Get(id, r))
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |r| Expectation::Update(id, r))
    }

    pub fn expect_begin(&mut self) -> ExpectationBuilder<T, ScopeId> {
        self.builder(Expectation::Begin)
    }

    pub fn expect_scan(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Scan)
    }

    pub fn expect_stage(&mut self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Stage)
    }

    pub fn expect_commit(&mut self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Commit)
    }

    pub fn expect_rollback(&mut self) -> ExpectationBuilder<T, ()> {
        self.builder(Expectation::Rollback)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &mut self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
            _reply: PhantomData,
        }
    }
}

/// Builder that queues one expectation with its scripted reply.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T>>,
    _reply: PhantomData<R>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

fn answer<T: ActorEntity>(request: ResourceRequest<T>, expectation: Option<Expectation<T>>) {
    match (request, expectation) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(expected, response))) => {
            assert_eq!(id, expected, "Get for unexpected id");
            let _ = respond_to.send(response);
        }
        (ResourceRequest::List { respond_to, .. }, Some(Expectation::List(response))) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update(expected, response)),
        ) => {
            assert_eq!(id, expected, "Update for unexpected id");
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Begin { respond_to, .. }, Some(Expectation::Begin(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Scan { respond_to, .. }, Some(Expectation::Scan(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Stage { respond_to, .. }, Some(Expectation::Stage(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Commit { respond_to, .. }, Some(Expectation::Commit(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Rollback { respond_to, .. }, Some(Expectation::Rollback(response))) => {
            let _ = respond_to.send(response);
        }
        (request, _) => {
            panic!("Unexpected {} request or expectation mismatch", request.kind());
        }
    }
}

/// Creates a client and the receiver its requests arrive on.
///
/// Use this instead of [`MockClient`] when a test needs to control *when* a reply is
/// sent, e.g. to hold a `Stage` reply until a caller's deadline has passed.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}
