use async_trait::async_trait;
use charter_shared::TicketDocument;
use crate::RemoteResult;

#[async_trait]
pub trait TicketDelivery: Send + Sync {
    /// Hand an assembled e-ticket to the outbound channel (mail relay, print
    /// queue). A failure must be returned, never swallowed.
    async fn deliver(&self, ticket: &TicketDocument, recipient: &str) -> RemoteResult<()>;
}
