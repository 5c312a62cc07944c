//! # Generic Messages
//!
//! The message protocol spoken between `ResourceClient` and `ResourceActor`.
//!
//! Besides plain CRUD, the protocol carries a small *scope* protocol: a client opens a
//! scope with `Begin`, reads with `Scan`, stages writes with `Stage`, and closes the
//! scope with `Commit` or `Rollback`. The actor grants one scope at a time, so
//! everything read and written inside a scope forms one atomic unit.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use std::fmt::Display;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate used by `List` and `Scan` to select entities.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Identifier of a scope granted by a `ResourceActor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u64);

impl Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope_{}", self.0)
    }
}

/// Internal message type sent to the actor to request operations.
///
/// # CRUD
/// - **Create**: builds a new entity from [`ActorEntity::Create`].
/// - **Get** / **List**: read committed state.
/// - **Update**: autocommit write through [`ActorEntity::on_update`].
///
/// # Scope protocol
/// - **Begin**: waits until no other scope is open, then grants one. `lease` is the
///   receiving half of a channel whose sender lives in the client-side guard; when the
///   guard is dropped without committing, the actor sees the lease close and rolls
///   the scope back.
/// - **Scan**: reads committed state overlaid with the scope's staged writes.
/// - **Stage**: applies one update to every listed entity, on working copies.
/// - **Commit** / **Rollback**: publish or discard the working copies.
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Begin {
        lease: oneshot::Receiver<()>,
        respond_to: Response<ScopeId>,
    },
    Scan {
        scope: ScopeId,
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Stage {
        scope: ScopeId,
        ids: Vec<T::Id>,
        update: T::Update,
        respond_to: Response<usize>,
    },
    Commit {
        scope: ScopeId,
        respond_to: Response<usize>,
    },
    Rollback {
        scope: ScopeId,
        respond_to: Response<()>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short operation name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "Create",
            ResourceRequest::Get { .. } => "Get",
            ResourceRequest::List { .. } => "List",
            ResourceRequest::Update { .. } => "Update",
            ResourceRequest::Begin { .. } => "Begin",
            ResourceRequest::Scan { .. } => "Scan",
            ResourceRequest::Stage { .. } => "Stage",
            ResourceRequest::Commit { .. } => "Commit",
            ResourceRequest::Rollback { .. } => "Rollback",
        }
    }

    /// Whether the request must wait while another caller's scope is open.
    ///
    /// Reads of committed state never wait; writes and new scopes do.
    pub(crate) fn waits_for_scope(&self) -> bool {
        matches!(
            self,
            ResourceRequest::Create { .. }
                | ResourceRequest::Update { .. }
                | ResourceRequest::Begin { .. }
        )
    }

    /// Whether the caller has stopped waiting for the reply.
    pub(crate) fn is_abandoned(&self) -> bool {
        match self {
            ResourceRequest::Create { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Get { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::List { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Update { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Begin { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Scan { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Stage { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Commit { respond_to, .. } => respond_to.is_closed(),
            ResourceRequest::Rollback { respond_to, .. } => respond_to.is_closed(),
        }
    }
}
