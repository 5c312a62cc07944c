//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a collection of
//! entities and processes every request against it sequentially. Sequential
//! processing is what makes the scope protocol cheap: the actor simply refuses to
//! interleave a second scope (or any out-of-scope write) with an open one.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, ResourceRequest, Response, ScopeId};
use std::collections::{HashMap, VecDeque};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// State of the scope currently granted to a client.
struct OpenScope<T: ActorEntity> {
    id: ScopeId,
    /// Closes when the client-side guard is dropped.
    lease: oneshot::Receiver<()>,
    /// Working copies written inside the scope, published on commit.
    staged: HashMap<T::Id, T>,
}

/// What woke the event loop up.
enum Wake<T: ActorEntity> {
    Request(Option<ResourceRequest<T>>),
    LeaseClosed,
}

/// The generic actor that manages a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the committed state
/// (`store`), the open scope if any, and the receiver end of the channel. Because one
/// task processes all messages in order, no `Mutex` guards the store.
///
/// # Scopes
///
/// At most one scope is open at a time. While it is open:
///
/// * `Begin`, `Create` and `Update` from other callers are parked in `deferred` and
///   replayed in arrival order once the scope closes. A parked request whose caller
///   has stopped waiting is dropped instead of replayed. The same holds for a write
///   that sat in the channel until its caller stopped waiting.
/// * `Get` and `List` are answered from committed state, so they never observe
///   staged writes.
/// * `Scan` and `Stage` must name the open scope; any other scope id is rejected.
///
/// A scope closes on `Commit`, on `Rollback`, or when its lease channel closes because
/// the client dropped the guard. The last case is a rollback.
///
/// # Usage Pattern
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Parcel { id: u32, delivered: bool }
/// #[derive(Debug)] struct ParcelCreate;
/// #[derive(Clone, Debug)] struct MarkDelivered;
/// #[derive(Debug, thiserror::Error)] #[error("parcel error")] struct ParcelError;
///
/// #[async_trait]
/// impl ActorEntity for Parcel {
///     type Id = u32;
///     type Create = ParcelCreate;
///     type Update = MarkDelivered;
///     type Context = ();
///     type Error = ParcelError;
///
///     fn from_create_params(id: u32, _: ParcelCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, delivered: false })
///     }
///     async fn on_update(&mut self, _: MarkDelivered, _: &()) -> Result<(), Self::Error> {
///         self.delivered = true;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Parcel>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(ParcelCreate).await.unwrap();
///     let scope = client.begin().await.unwrap();
///     scope.stage(vec![id], MarkDelivered).await.unwrap();
///     scope.commit().await.unwrap();
///
///     assert!(client.get(id).await.unwrap().unwrap().delivered);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
    next_scope: u64,
    open: Option<OpenScope<T>>,
    deferred: VecDeque<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the MPSC channel. If the channel is full,
    /// calls on the client wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            next_scope: 1,
            open: None,
            deferred: VecDeque::new(),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "robot_dispatch::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        loop {
            while self.open.is_none() {
                let Some(msg) = self.deferred.pop_front() else {
                    break;
                };
                // A write whose caller timed out must not land behind its back.
                if msg.is_abandoned() {
                    debug!(entity_type, kind = msg.kind(), "Dropped deferred request, caller gone");
                    continue;
                }
                debug!(entity_type, kind = msg.kind(), "Replaying deferred request");
                self.handle(msg, &context, entity_type).await;
            }

            let wake = match self.open.as_mut() {
                // Lease first: `commit` and `rollback` keep it alive until answered, so
                // a closed lease always means the guard was dropped.
                Some(open) => tokio::select! {
                    biased;
                    _ = &mut open.lease => Wake::LeaseClosed,
                    msg = self.receiver.recv() => Wake::Request(msg),
                },
                None => Wake::Request(self.receiver.recv().await),
            };

            match wake {
                Wake::LeaseClosed => {
                    if let Some(open) = self.open.take() {
                        warn!(
                            entity_type,
                            scope = %open.id,
                            staged = open.staged.len(),
                            "Scope abandoned, rolled back"
                        );
                    }
                }
                Wake::Request(None) => break,
                Wake::Request(Some(msg)) => {
                    // Queued behind a slow hook while its caller gave up.
                    if msg.waits_for_scope() && msg.is_abandoned() {
                        debug!(entity_type, kind = msg.kind(), "Dropped request, caller gone");
                    } else if self.open.is_some() && msg.waits_for_scope() {
                        debug!(entity_type, kind = msg.kind(), "Deferred behind open scope");
                        self.deferred.push_back(msg);
                    } else {
                        self.handle(msg, &context, entity_type).await;
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn handle(&mut self, msg: ResourceRequest<T>, context: &T::Context, entity_type: &str) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                debug!(entity_type, ?params, "Create");
                let id = T::Id::from(self.next_id);
                self.next_id += 1;

                match T::from_create_params(id.clone(), params) {
                    Ok(mut item) => {
                        if let Err(e) = item.on_create(context).await {
                            warn!(entity_type, error = %e, "on_create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            return;
                        }
                        self.store.insert(id.clone(), item);
                        info!(entity_type, %id, size = self.store.len(), "Created");
                        let _ = respond_to.send(Ok(id));
                    }
                    Err(e) => {
                        warn!(entity_type, error = %e, "Create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    }
                }
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                let found = item.is_some();
                debug!(entity_type, %id, found, "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::List { filter, respond_to } => {
                let items = collect_sorted(self.store.iter(), &filter);
                debug!(entity_type, count = items.len(), "List");
                let _ = respond_to.send(Ok(items));
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                if let Some(item) = self.store.get_mut(&id) {
                    if let Err(e) = item.on_update(update, context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        return;
                    }
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(item.clone()));
                } else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                }
            }
            ResourceRequest::Begin { lease, respond_to } => {
                self.grant(lease, respond_to, entity_type);
            }
            ResourceRequest::Scan {
                scope,
                filter,
                respond_to,
            } => {
                let result = self.scan(scope, &filter);
                if let Ok(items) = &result {
                    debug!(entity_type, %scope, count = items.len(), "Scan");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Stage {
                scope,
                ids,
                update,
                respond_to,
            } => {
                debug!(entity_type, %scope, count = ids.len(), ?update, "Stage");
                let result = self.stage(scope, ids, update, context).await;
                if let Err(e) = &result {
                    warn!(entity_type, %scope, error = %e, "Stage failed");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Commit { scope, respond_to } => {
                let result = self.close(scope).map(|open| {
                    let written = open.staged.len();
                    self.store.extend(open.staged);
                    written
                });
                match &result {
                    Ok(written) => info!(entity_type, %scope, written, "Scope committed"),
                    Err(e) => warn!(entity_type, %scope, error = %e, "Commit failed"),
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Rollback { scope, respond_to } => {
                let result = self.close(scope).map(|open| {
                    info!(entity_type, %scope, discarded = open.staged.len(), "Scope rolled back");
                });
                let _ = respond_to.send(result);
            }
        }
    }

    fn grant(&mut self, lease: oneshot::Receiver<()>, respond_to: Response<ScopeId>, entity_type: &str) {
        // The caller gave up while waiting in line.
        if respond_to.is_closed() {
            debug!(entity_type, "Begin abandoned before grant");
            return;
        }
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.open = Some(OpenScope {
            id,
            lease,
            staged: HashMap::new(),
        });
        info!(entity_type, scope = %id, waiting = self.deferred.len(), "Scope opened");
        if respond_to.send(Ok(id)).is_err() {
            self.open = None;
            debug!(entity_type, scope = %id, "Scope dropped on grant");
        }
    }

    fn check_scope(&self, scope: ScopeId) -> Result<&OpenScope<T>, FrameworkError> {
        match &self.open {
            None => Err(FrameworkError::NoActiveScope),
            Some(open) if open.id != scope => Err(FrameworkError::ScopeMismatch { requested: scope }),
            Some(open) => Ok(open),
        }
    }

    fn scan(&self, scope: ScopeId, filter: &Filter<T>) -> Result<Vec<T>, FrameworkError> {
        let open = self.check_scope(scope)?;
        let visible = self
            .store
            .iter()
            .map(|(id, item)| (id, open.staged.get(id).unwrap_or(item)));
        Ok(collect_sorted(visible, filter))
    }

    async fn stage(
        &mut self,
        scope: ScopeId,
        ids: Vec<T::Id>,
        update: T::Update,
        context: &T::Context,
    ) -> Result<usize, FrameworkError> {
        self.check_scope(scope)?;
        let Some(open) = self.open.as_mut() else {
            return Err(FrameworkError::NoActiveScope);
        };

        // Build every working copy first so a failing hook stages nothing.
        let mut working = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(base) = open.staged.get(&id).or_else(|| self.store.get(&id)) else {
                return Err(FrameworkError::NotFound(id.to_string()));
            };
            let mut copy = base.clone();
            copy.on_update(update.clone(), context)
                .await
                .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
            working.push((id, copy));
        }

        let count = working.len();
        open.staged.extend(working);
        Ok(count)
    }

    fn close(&mut self, scope: ScopeId) -> Result<OpenScope<T>, FrameworkError> {
        self.check_scope(scope)?;
        self.open.take().ok_or(FrameworkError::NoActiveScope)
    }
}

/// Clones the matching entities in ascending id order.
fn collect_sorted<'a, T: ActorEntity>(
    items: impl Iterator<Item = (&'a T::Id, &'a T)>,
    filter: &Filter<T>,
) -> Vec<T> {
    let mut matched: Vec<(&T::Id, &T)> = items.filter(|(_, item)| filter(item)).collect();
    matched.sort_by(|a, b| a.0.cmp(b.0));
    matched.into_iter().map(|(_, item)| item.clone()).collect()
}
