//! # Order Pool Client
//!
//! Provides a high-level API for the `Order` actor: order intake, status reads and
//! writes, and [`OrderScope`], the transaction a planning call runs in.
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use crate::order_actor::OrderError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient, Scope, ScopeId};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderPoolClient {
    inner: ResourceClient<Order>,
}

impl OrderPoolClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Places an order for `params.product_id`. Validation happens in `Order::on_create`.
    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Committed orders in `status`, in ascending id order.
    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        self.list(move |order: &Order| order.status == status).await
    }

    /// Sets the status of a single order outside any scope.
    ///
    /// While another caller's scope is open the write waits for it to close.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate { status })
            .await
            .map_err(Self::map_error)
    }

    /// Opens a scope over the whole pool, waiting for any open one to close.
    #[instrument(skip(self))]
    pub async fn begin(&self) -> Result<OrderScope, OrderError> {
        let scope = self.inner.begin().await.map_err(Self::map_error)?;
        debug!(scope = %scope.id(), "Scope granted");
        Ok(OrderScope { scope })
    }
}

#[async_trait]
impl ActorClient<Order> for OrderPoolClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::ScopeMismatch { .. } | FrameworkError::NoActiveScope => {
                OrderError::ScopeFailure(e.to_string())
            }
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                OrderError::ActorCommunicationError(e.to_string())
            }
        }
    }
}

/// A transaction over the order pool.
///
/// Reads see committed state plus this scope's own writes; no one else sees the
/// writes until [`OrderScope::commit`]. While the scope is open no other scope is
/// granted and no other writer touches the pool.
///
/// Dropping the scope without committing rolls it back.
#[must_use = "dropping an order scope rolls it back"]
pub struct OrderScope {
    scope: Scope<Order>,
}

impl OrderScope {
    pub fn id(&self) -> ScopeId {
        self.scope.id()
    }

    /// Every order still pending shipment, in ascending id order.
    pub async fn fetch_pending(&self) -> Result<Vec<Order>, OrderError> {
        self.scope
            .scan(Order::is_pending)
            .await
            .map_err(OrderPoolClient::map_error)
    }

    /// Moves every order in `ids` to `status`. All of them are updated, or none is.
    pub async fn update_statuses(
        &self,
        ids: &[OrderId],
        status: OrderStatus,
    ) -> Result<usize, OrderError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.scope
            .stage(ids.to_vec(), OrderUpdate { status })
            .await
            .map_err(OrderPoolClient::map_error)
    }

    pub async fn commit(self) -> Result<usize, OrderError> {
        let scope = self.scope.id();
        let written = self
            .scope
            .commit()
            .await
            .map_err(OrderPoolClient::map_error)?;
        info!(%scope, written, "Order scope committed");
        Ok(written)
    }

    pub async fn rollback(self) -> Result<(), OrderError> {
        self.scope
            .rollback()
            .await
            .map_err(OrderPoolClient::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;
    use actor_framework::mock::{create_mock_client, MockClient};
    use actor_framework::ResourceRequest;

    #[tokio::test]
    async fn test_empty_update_sends_nothing() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_begin().return_ok(ScopeId(1));
        mock.expect_commit().return_ok(0);

        let client = OrderPoolClient::new(mock.client());
        let scope = client.begin().await.unwrap();
        // A Stage here would not match the Commit expectation.
        assert_eq!(scope.update_statuses(&[], OrderStatus::Delivering).await, Ok(0));
        assert_eq!(scope.commit().await, Ok(0));

        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_error_is_unwrapped() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidProduct("product_9".to_string()),
            )));

        let client = OrderPoolClient::new(mock.client());
        let result = client
            .create_order(OrderCreate {
                product_id: ProductId(9),
            })
            .await;

        assert_eq!(result, Err(OrderError::InvalidProduct("product_9".to_string())));
    }

    #[tokio::test]
    async fn test_stale_scope_is_a_scope_failure() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_begin().return_ok(ScopeId(4));
        mock.expect_scan()
            .return_err(FrameworkError::ScopeMismatch {
                requested: ScopeId(4),
            });

        let client = OrderPoolClient::new(mock.client());
        let scope = client.begin().await.unwrap();
        let result = scope.fetch_pending().await;

        assert!(matches!(result, Err(OrderError::ScopeFailure(_))));
    }

    #[tokio::test]
    async fn test_update_statuses_stages_every_id_at_once() {
        let (generic, mut receiver) = create_mock_client::<Order>(8);
        let client = OrderPoolClient::new(generic);

        let task = tokio::spawn(async move {
            let scope = client.begin().await?;
            scope
                .update_statuses(&[OrderId(2), OrderId(5)], OrderStatus::Delivering)
                .await
        });

        let Some(ResourceRequest::Begin { respond_to, .. }) = receiver.recv().await else {
            panic!("Expected Begin request");
        };
        respond_to.send(Ok(ScopeId(1))).unwrap();

        let Some(ResourceRequest::Stage {
            scope,
            ids,
            update,
            respond_to,
        }) = receiver.recv().await
        else {
            panic!("Expected Stage request");
        };
        assert_eq!(scope, ScopeId(1));
        assert_eq!(ids, vec![OrderId(2), OrderId(5)]);
        assert_eq!(update.status, OrderStatus::Delivering);
        respond_to.send(Ok(2)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(2));
    }
}
