use std::time::Duration;

use crate::monitor::status::{Status, StatusRecord};
use crate::probe::Pinger;

pub const MONITOR_TYPE: &str = "ping";

pub async fn check_ping(name: &str, host: &str, timeout: Duration, pinger: &dyn Pinger) -> StatusRecord {
    let (status, message) = match pinger.ping(host, timeout).await {
        Ok(reply) if reply.alive => {
            let rtt_ms = reply.rtt.unwrap_or_default().as_nanos() as f64 / 1_000_000.0;
            (Status::ok(), format!("{:.3}ms", rtt_ms))
        }
        Ok(_) => (Status::text(Status::DOWN), "Host is down".to_string()),
        Err(e) => (Status::text(Status::ERROR), e.to_string()),
    };
    StatusRecord::new(name, host, status, message, MONITOR_TYPE)
}
