use std::time::Duration;

use crate::monitor::status::{Status, StatusRecord};
use crate::probe::{HttpProbe, HttpRequest, ProbeError};

pub const MONITOR_TYPE: &str = "url";

/// GET the URL; any HTTP response counts as a result, its code is the status.
pub async fn check_url(
    name: &str,
    url: &str,
    host: Option<&str>,
    timeout: Duration,
    http: &dyn HttpProbe,
) -> StatusRecord {
    let (status, message) = match http.get(HttpRequest::get(url, timeout)).await {
        Ok(response) => (Status::Code(response.status), "OK"),
        Err(ProbeError::Timeout) => (Status::text(Status::TIMEOUT), ""),
        Err(e) => (Status::Text(format!("Error: {}", e)), ""),
    };
    StatusRecord::new(name, host.unwrap_or(url), status, message, MONITOR_TYPE)
}
