//! Secondary lookups used while normalizing updates.
//!
//! Notes reference their attachments by id only; the resolver turns each id
//! into a downloadable URL with one point lookup per attachment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use shotgun_gateway::entities::attachments;
use shotgun_gateway::{QueryGateway, ShotgunError};

/// Resolves attachment ids to file URLs.
#[async_trait]
pub trait AttachmentResolver: Send + Sync {
    /// Look up the file URL of one attachment.
    ///
    /// Errors are returned to the caller, which decides whether they are fatal.
    async fn resolve_attachment_url(&self, attachment_id: i64) -> Result<String, ShotgunError>;
}

/// Resolver backed by the query gateway.
pub struct GatewayAttachmentResolver {
    gateway: Arc<dyn QueryGateway>,
}

impl GatewayAttachmentResolver {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AttachmentResolver for GatewayAttachmentResolver {
    #[instrument(skip(self))]
    async fn resolve_attachment_url(&self, attachment_id: i64) -> Result<String, ShotgunError> {
        let attachment = attachments::attachment(self.gateway.as_ref(), attachment_id).await?;
        Ok(attachment.file_url)
    }
}
