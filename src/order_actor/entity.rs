//! [`ActorEntity`] implementation for the Order domain type.
//!
//! An order is created from a product id alone. `on_create` looks the product
//! up through the injected [`ProductClient`] and snapshots its weight and value; an
//! unknown product fails the create and nothing is stored.

use super::OrderError;
use crate::clients::ProductClient;
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Context = ProductClient;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        // Weight and value are filled in by on_create.
        Ok(Self::new(id, params.product_id, 0, 0))
    }

    async fn on_create(&mut self, products: &ProductClient) -> Result<(), Self::Error> {
        let product = products
            .get(self.product_id)
            .await
            .map_err(|e| OrderError::InvalidProduct(e.to_string()))?
            .ok_or_else(|| OrderError::InvalidProduct(self.product_id.to_string()))?;

        debug!(order_id = %self.id, product_id = %product.id, "Snapshotting product");
        self.weight = product.weight;
        self.value = product.value;
        Ok(())
    }

    /// Any status may follow any other; the planner only ever reads `PendingShipment`.
    async fn on_update(
        &mut self,
        update: OrderUpdate,
        _products: &ProductClient,
    ) -> Result<(), Self::Error> {
        self.status = update.status;
        Ok(())
    }
}
