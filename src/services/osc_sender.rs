//! Outbound OSC over UDP

use rosc::OscPacket;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::{osc::encode::encode, state::OscConfig};

/// Sends encoded packets to the configured remote address and port
#[derive(Debug)]
pub struct OscSender {
    socket: UdpSocket,
    address: String,
    port: u16,
}

impl OscSender {
    /// Bind an ephemeral local socket for sending to `config.address:config.out_port`
    pub async fn bind(config: &OscConfig) -> Result<Self, String> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| format!("Failed to bind OSC send socket: {}", e))?;

        info!("Sending OSC to {}:{}", config.address, config.out_port);
        Ok(Self {
            socket,
            address: config.address.clone(),
            port: config.out_port,
        })
    }

    pub async fn send(&self, packet: &OscPacket) -> Result<(), String> {
        let buf = encode(packet).map_err(|e| e.to_string())?;
        let sent = self
            .socket
            .send_to(&buf, (self.address.as_str(), self.port))
            .await
            .map_err(|e| format!("Failed to send OSC to {}:{}: {}", self.address, self.port, e))?;

        debug!("Sent {} OSC bytes", sent);
        Ok(())
    }
}
