//! [`ActorEntity`] implementation for the Product domain type.

use super::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Context = ();
    type Error = ProductError;

    /// Creates a new Product from creation parameters.
    ///
    /// A blank name is rejected. Zero weight and zero value are allowed: a leaflet
    /// weighs nothing and a replacement part may be delivered free of charge.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError(
                "name must not be blank".to_string(),
            ));
        }
        Ok(Self::new(id, params.name, params.weight, params.value))
    }

    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.value = update.value;
        Ok(())
    }
}
