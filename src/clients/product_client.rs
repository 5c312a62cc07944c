//! # Product Client
//!
//! Provides a high-level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes domain-specific methods.
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::ProductError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<ProductError>() {
                Ok(product_error) => *product_error,
                Err(other) => ProductError::ActorCommunicationError(other.to_string()),
            },
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Like [`ActorClient::get`], but a missing product is an error.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.get(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Changes what a product is worth. Orders already placed keep their snapshot.
    #[instrument(skip(self))]
    pub async fn reprice(&self, id: ProductId, value: u32) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner
            .update(id, ProductUpdate { value })
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_get_product_maps_missing_to_not_found() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_get(ProductId(3)).return_ok(None);

        let client = ProductClient::new(mock.client());
        let result = client.get_product(ProductId(3)).await;

        assert_eq!(result, Err(ProductError::NotFound("product_3".to_string())));
        mock.verify();
    }

    #[tokio::test]
    async fn test_validation_error_survives_the_framework() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(
                ProductError::ValidationError("name must not be blank".to_string()),
            )));

        let client = ProductClient::new(mock.client());
        let result = client
            .create_product(ProductCreate {
                name: " ".to_string(),
                weight: 1,
                value: 1,
            })
            .await;

        assert!(matches!(result, Err(ProductError::ValidationError(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_update(ProductId(1))
            .return_err(FrameworkError::ActorClosed);

        let client = ProductClient::new(mock.client());
        let result = client.reprice(ProductId(1), 10).await;

        assert!(matches!(
            result,
            Err(ProductError::ActorCommunicationError(_))
        ));
    }
}
