use std::time::Duration;

use serde_json::Value;

use crate::monitor::status::{Status, StatusRecord};
use crate::probe::{HttpProbe, HttpRequest, ProbeError};

pub const MONITOR_TYPE: &str = "syncthing";
pub const STATUS_PATH: &str = "/rest/system/status";
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Query the Syncthing REST API and report its uptime.
pub async fn check_syncthing(
    name: &str,
    url: &str,
    api_key: &str,
    host: Option<&str>,
    timeout: Duration,
    http: &dyn HttpProbe,
) -> StatusRecord {
    let endpoint = format!("{}{}", url.trim_end_matches('/'), STATUS_PATH);
    let request = HttpRequest::get(endpoint, timeout)
        .header(API_KEY_HEADER, api_key)
        .with_body();

    let (status, message) = match http.get(request).await {
        Ok(response) if response.status == 200 => {
            let body = response.body.unwrap_or_default();
            match serde_json::from_str::<Value>(&body) {
                Ok(data) => {
                    let uptime = match data.get("uptime") {
                        Some(Value::String(s)) => s.clone(),
                        Some(v) => v.to_string(),
                        None => "0".to_string(),
                    };
                    (Status::ok(), format!("Uptime: {}s", uptime))
                }
                Err(e) => (Status::Text(format!("Error: {}", e)), String::new()),
            }
        }
        Ok(response) => (
            Status::Text(format!("HTTP {}", response.status)),
            response.body.unwrap_or_default(),
        ),
        Err(ProbeError::Timeout) => (Status::text(Status::TIMEOUT), String::new()),
        Err(e) => (Status::Text(format!("Error: {}", e)), String::new()),
    };
    StatusRecord::new(name, host.unwrap_or(url), status, message, MONITOR_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::checks::fakes;
    use crate::probe::HttpResponse;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn response(status: u16, body: &str) -> Result<HttpResponse, ProbeError> {
        Ok(HttpResponse {
            status,
            body: Some(body.to_string()),
        })
    }

    #[tokio::test]
    async fn reports_uptime_on_200() {
        let http = fakes::http(response(200, r#"{"myID":"ABC","uptime":3600}"#));
        let r = check_syncthing("sync", "http://127.0.0.1:8384", "k", None, TIMEOUT, http.as_ref()).await;
        assert_eq!(r.status, Status::ok());
        assert_eq!(r.message, "Uptime: 3600s");
        assert_eq!(r.monitor_type, "syncthing");
        assert_eq!(
            http.last().as_deref(),
            Some("http://127.0.0.1:8384/rest/system/status")
        );
    }

    #[tokio::test]
    async fn missing_uptime_defaults_to_zero() {
        let http = fakes::http(response(200, "{}"));
        let r = check_syncthing("sync", "http://s/", "k", None, TIMEOUT, http.as_ref()).await;
        assert_eq!(r.message, "Uptime: 0s");
        assert_eq!(http.last().as_deref(), Some("http://s/rest/system/status"));
    }

    #[tokio::test]
    async fn string_uptime_is_printed_unquoted() {
        let http = fakes::http(response(200, r#"{"uptime":"12"}"#));
        let r = check_syncthing("sync", "http://s", "k", None, TIMEOUT, http.as_ref()).await;
        assert_eq!(r.message, "Uptime: 12s");
    }

    #[tokio::test]
    async fn non_200_reports_code_and_body() {
        let http = fakes::http(response(403, "CSRF Error"));
        let r = check_syncthing("sync", "http://s", "bad", None, TIMEOUT, http.as_ref()).await;
        assert_eq!(r.status, Status::text("HTTP 403"));
        assert_eq!(r.message, "CSRF Error");
        assert!(!r.is_up());
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let http = fakes::http(response(200, "<html>"));
        let r = check_syncthing("sync", "http://s", "k", None, TIMEOUT, http.as_ref()).await;
        match r.status {
            Status::Text(s) => assert!(s.starts_with("Error: "), "{}", s),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn timeout_reports_timeout() {
        let http = fakes::http(Err(ProbeError::Timeout));
        let r = check_syncthing("sync", "http://s", "k", Some("nas"), TIMEOUT, http.as_ref()).await;
        assert_eq!(r.status, Status::text("Timeout"));
        assert_eq!(r.message, "");
        assert_eq!(r.host_or_url, "nas");
    }
}
