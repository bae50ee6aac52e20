//! UdpInvoker - UDP fire-and-forget invocation
//!
//! Interprets the target id as a socket address and sends the record as a
//! JSON datagram. Acceptance means the datagram was handed to the transport;
//! downstream execution is never awaited.

use std::collections::HashMap;
use std::net::SocketAddr;

use contracts::{Acceptance, ContractError, EventRecord, Invoker, TargetId};
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

/// Invoker that sends records over UDP
pub struct UdpInvoker {
    name: String,
    socket: UdpSocket,
}

impl UdpInvoker {
    /// Create a new UdpInvoker bound to the given local address
    #[instrument(name = "udp_invoker_new", skip(name))]
    pub async fn new(name: impl Into<String>, bind_addr: &str) -> std::io::Result<Self> {
        let name = name.into();
        let socket = UdpSocket::bind(bind_addr).await?;

        debug!(invoker = %name, local = %socket.local_addr()?, "UdpInvoker bound");

        Ok(Self { name, socket })
    }

    /// Create from params (for factory)
    ///
    /// Supported params:
    /// - `bind_addr`: local bind address (default "0.0.0.0:0")
    pub async fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let bind_addr = params
            .get("bind_addr")
            .map(String::as_str)
            .unwrap_or("0.0.0.0:0");

        Self::new(name.clone(), bind_addr)
            .await
            .map_err(|e| ContractError::invoker_creation(name, e.to_string()))
    }

    fn resolve_target(target: &TargetId) -> Result<SocketAddr, ContractError> {
        target.as_str().parse().map_err(|e| {
            ContractError::dispatch_rejected(
                target.as_str(),
                format!("invalid target address: {e}"),
            )
        })
    }
}

impl Invoker for UdpInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "udp_invoker_accept",
        skip(self, record),
        fields(invoker = %self.name, target = %target)
    )]
    async fn accept(
        &self,
        target: &TargetId,
        record: &EventRecord,
    ) -> Result<Acceptance, ContractError> {
        let addr = Self::resolve_target(target)?;

        let payload = serde_json::to_vec(record).map_err(|e| {
            ContractError::dispatch_rejected(target.as_str(), format!("serialize error: {e}"))
        })?;

        self.socket.send_to(&payload, addr).await.map_err(|e| {
            ContractError::dispatch_rejected(target.as_str(), format!("udp send failed: {e}"))
        })?;

        debug!(
            invoker = %self.name,
            target = %target,
            bytes = payload.len(),
            "Datagram sent"
        );

        Ok(Acceptance::default())
    }
}
