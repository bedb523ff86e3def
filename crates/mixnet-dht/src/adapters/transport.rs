use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::domain::{Contact, DhtRequest, DhtResponse, TransportError};
use crate::ports::RpcTransport;

/// A transport that never reaches anyone.
///
/// Every request reports [`TransportError::Timeout`] immediately. Useful for
/// running a node offline, where only local queries can be answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTransport;

#[async_trait]
impl RpcTransport for NoOpTransport {
    async fn send_request(
        &self,
        contact: &Contact,
        request: DhtRequest,
        _timeout: Duration,
    ) -> Result<DhtResponse, TransportError> {
        trace!(to = %contact, kind = request.kind(), "dropping request (no transport)");
        Err(TransportError::Timeout)
    }
}
