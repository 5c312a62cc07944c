//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: implementors expose their inner
//! `ResourceClient` and an error mapping, and get `get` and `list` for free.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the read operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Crate { id: u32, weight: u32 }
/// #[derive(Debug)] struct CrateCreate { weight: u32 }
/// #[derive(Clone, Debug)] struct CrateUpdate;
/// #[derive(Debug, thiserror::Error)] #[error("crate error: {0}")] struct CrateError(String);
///
/// #[async_trait]
/// impl ActorEntity for Crate {
///     type Id = u32;
///     type Create = CrateCreate;
///     type Update = CrateUpdate;
///     type Context = ();
///     type Error = CrateError;
///
///     fn from_create_params(id: u32, params: CrateCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, weight: params.weight })
///     }
///     async fn on_update(&mut self, _: CrateUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct CrateClient {
///     inner: ResourceClient<Crate>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Crate> for CrateClient {
///     type Error = CrateError;
///
///     fn inner(&self) -> &ResourceClient<Crate> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         CrateError(e.to_string())
///     }
/// }
///
/// async fn heavy_crates(client: CrateClient) -> Result<Vec<Crate>, CrateError> {
///     client.list(|c: &Crate| c.weight > 10).await
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Committed entities matching `filter`, in ascending id order.
    async fn list<F>(&self, filter: F) -> Result<Vec<T>, Self::Error>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.inner().list(filter).await.map_err(Self::map_error)
    }
}
