//! Reqwest-backed mail relay adapter.
//!
//! Owns transport details only: JSON serialisation, the request timeout and
//! mapping relay responses onto [`MailerError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{MailMessage, Mailer, MailerError};

const USER_AGENT: &str = "library-backend-mailer/0.1";

/// Wire body posted to the relay.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mailer that POSTs each message to one relay endpoint.
pub struct HttpRelayMailer {
    client: Client,
    endpoint: Url,
    from: String,
}

impl HttpRelayMailer {
    /// Build an adapter whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RelayMessage {
                from: &self.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> MailerError {
    if error.is_timeout() {
        MailerError::timeout(error.to_string())
    } else {
        MailerError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MailerError::timeout(message),
        StatusCode::TOO_MANY_REQUESTS => MailerError::transport(message),
        _ if status.is_client_error() => MailerError::rejected(message),
        _ => MailerError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    //! Status mapping plus a round trip against a local relay stub.
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};

    use actix_web::{App, HttpResponse, HttpServer, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, "Transport")]
    #[case::bad_address(StatusCode::UNPROCESSABLE_ENTITY, "Rejected")]
    #[case::relay_down(StatusCode::BAD_GATEWAY, "Transport")]
    fn maps_relay_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\": \"nope\"}");
        let variant = match error {
            MailerError::Timeout { .. } => "Timeout",
            MailerError::Rejected { .. } => "Rejected",
            MailerError::Transport { .. } => "Transport",
        };
        assert_eq!(variant, expected);
    }

    #[rstest]
    fn previews_are_compacted_and_truncated() {
        let body = format!("  line one\n\n{}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("line one x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[actix_web::test]
    async fn posts_json_to_the_relay() {
        let received: Arc<Mutex<Vec<Value>>> = Arc::default();
        let sink = Arc::clone(&received);
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind relay stub");
        let addr = listener.local_addr().expect("relay stub address");
        let server = HttpServer::new(move || {
            let sink = Arc::clone(&sink);
            App::new().route(
                "/send",
                web::post().to(move |body: web::Json<Value>| {
                    let sink = Arc::clone(&sink);
                    async move {
                        sink.lock().expect("sink lock").push(body.into_inner());
                        HttpResponse::Accepted().finish()
                    }
                }),
            )
        })
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let endpoint = Url::parse(&format!("http://{addr}/send")).expect("endpoint url");
        let mailer = HttpRelayMailer::new(endpoint, "no-reply@library.test", Duration::from_secs(5))
            .expect("client");
        mailer
            .send(&MailMessage {
                to: "reader@example.com".to_owned(),
                subject: "Hello".to_owned(),
                body: "Welcome".to_owned(),
            })
            .await
            .expect("relay accepts");
        handle.stop(true).await;

        let bodies = received.lock().expect("sink lock");
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["from"], "no-reply@library.test");
        assert_eq!(bodies[0]["to"], "reader@example.com");
        assert_eq!(bodies[0]["text"], "Welcome");
    }
}
