//! The `QueryTransport` trait: the abstraction over a GraphQL endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{GraphQlRequest, GraphQlResponse};

/// An async GraphQL transport.
///
/// Responses to a batch pair positionally with the submitted requests. A
/// rejected batch fails as a whole; no per-item partial success is reported.
#[async_trait]
pub trait QueryTransport: Send + Sync + 'static {
    /// Send a single request.
    async fn request(&self, req: GraphQlRequest) -> Result<GraphQlResponse, TransportError>;

    /// Send several requests in one round trip.
    ///
    /// Default implementation sends them sequentially; override for true batching.
    async fn batch_request(
        &self,
        reqs: Vec<GraphQlRequest>,
    ) -> Result<Vec<GraphQlResponse>, TransportError> {
        let mut responses = Vec::with_capacity(reqs.len());
        for req in reqs {
            responses.push(self.request(req).await?);
        }
        Ok(responses)
    }

    /// Endpoint identifier (URL or name).
    fn url(&self) -> &str;

}

#[async_trait]
impl<T: QueryTransport + ?Sized> QueryTransport for Arc<T> {
    async fn request(&self, req: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        (**self).request(req).await
    }

    async fn batch_request(
        &self,
        reqs: Vec<GraphQlRequest>,
    ) -> Result<Vec<GraphQlResponse>, TransportError> {
        (**self).batch_request(reqs).await
    }

    fn url(&self) -> &str {
        (**self).url()
    }
}
