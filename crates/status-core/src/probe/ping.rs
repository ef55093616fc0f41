use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};
use tracing::debug;

use super::{PingReply, Pinger, ProbeError};

const PAYLOAD: [u8; 56] = [0; 56];

/// ICMP echo over an unprivileged datagram socket.
///
/// A socket is opened per ping so concurrent checks share nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurgePinger;

async fn resolve(host: &str) -> Result<IpAddr, ProbeError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| ProbeError::Resolve(format!("Cannot resolve {}: {}", host, e)))?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| ProbeError::Resolve(format!("Cannot resolve {}: no addresses", host)))
}

#[async_trait]
impl Pinger for SurgePinger {
    async fn ping(&self, host: &str, timeout: Duration) -> Result<PingReply, ProbeError> {
        let ip = resolve(host).await?;
        let config = match ip {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = Client::new(&config).map_err(|e| ProbeError::Io(e.to_string()))?;

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_packet, rtt)) => {
                debug!(host, %ip, rtt_ms = rtt.as_millis() as u64, "Ping reply");
                Ok(PingReply::alive(rtt))
            }
            Err(SurgeError::Timeout { .. }) => {
                debug!(host, %ip, "Ping timed out");
                Ok(PingReply::unreachable())
            }
            Err(e) => Err(ProbeError::Io(e.to_string())),
        }
    }
}
