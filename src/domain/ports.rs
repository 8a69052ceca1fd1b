use crate::domain::model::{HttpResponse, OutgoingRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything able to carry a resolved request to a forge and read the answer.
#[async_trait]
pub trait ConnectionClient: Send + Sync {
    async fn send(&self, request: OutgoingRequest) -> Result<HttpResponse>;
}
