use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::config::SmsConfig;
use crate::core::error::AppError;

const CREATE_REQUEST_PATH: &str = "/sms-service/request/create";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS gateway credentials are not configured")]
    NotConfigured,

    #[error("No valid recipient phone numbers")]
    NoRecipients,

    #[error("SMS message is empty")]
    EmptyMessage,

    #[error("SMS request failed: {0}")]
    Transport(String),

    #[error("SMS API {status}: {body}")]
    Gateway { status: u16, body: String },
}

impl From<SmsError> for AppError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            SmsError::NoRecipients | SmsError::EmptyMessage => AppError::BadRequest(err.to_string()),
            SmsError::Transport(_) | SmsError::Gateway { .. } => {
                AppError::ExternalServiceError(err.to_string())
            }
        }
    }
}

/// Strip everything but digits and turn a leading trunk `0` into the `66` country code
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.strip_prefix('0') {
        Some(rest) => format!("66{}", rest),
        None => digits,
    }
}

#[derive(Debug, Serialize)]
struct CreateRequestBody<'a> {
    data: CreateRequestData<'a>,
}

#[derive(Debug, Serialize)]
struct CreateRequestData<'a> {
    type_request: &'static str,
    type_message: &'static str,
    type_send: &'static str,
    sender_name: &'a str,
    transaction: Vec<SmsTransaction>,
}

#[derive(Debug, Serialize, PartialEq)]
struct SmsTransaction {
    phone: String,
    message: String,
}

fn build_body<'a>(
    sender_name: &'a str,
    phones: &[String],
    message: &str,
) -> Result<CreateRequestBody<'a>, SmsError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(SmsError::EmptyMessage);
    }

    let transaction: Vec<SmsTransaction> = phones
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| SmsTransaction {
            phone: normalize_phone(p),
            message: message.to_string(),
        })
        .collect();

    if transaction.is_empty() {
        return Err(SmsError::NoRecipients);
    }

    Ok(CreateRequestBody {
        data: CreateRequestData {
            type_request: "normal",
            type_message: "custom",
            type_send: "now",
            sender_name,
            transaction,
        },
    })
}

/// EazySMS gateway client. Without credentials every send fails with `NotConfigured`.
pub struct EazySmsClient {
    http_client: Client,
    config: SmsConfig,
}

impl EazySmsClient {
    pub fn new(config: SmsConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        if !config.is_configured() {
            warn!("EAZYSMS_CLIENT_ID or EAZYSMS_CLIENT_SECRET not set, SMS disabled");
        }

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            CREATE_REQUEST_PATH
        )
    }

    /// Send the same message to every phone in one gateway request
    pub async fn send(&self, phones: &[String], message: &str) -> Result<(), SmsError> {
        let body = build_body(&self.config.sender_name, phones, message)?;

        let (Some(client_id), Some(client_secret)) =
            (&self.config.client_id, &self.config.client_secret)
        else {
            return Err(SmsError::NotConfigured);
        };

        let url = self.endpoint();
        debug!(
            url = %url,
            recipients = body.data.transaction.len(),
            "Sending SMS request"
        );

        let response = self
            .http_client
            .post(&url)
            .header("X-Client-Id", client_id)
            .header("X-Client-Secret", client_secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("SMS send failed: {}", e);
                SmsError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("SMS API error {}: {}", status, text);
            return Err(SmsError::Gateway {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        info!(
            recipients = body.data.transaction.len(),
            "SMS accepted by gateway"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::time::Duration;

    fn config(base_url: &str, configured: bool) -> SmsConfig {
        SmsConfig {
            base_url: base_url.to_string(),
            client_id: configured.then(|| "id".to_string()),
            client_secret: configured.then(|| "secret".to_string()),
            sender_name: "SMSNOTI".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("081-234-5678"), "66812345678");
        assert_eq!(normalize_phone("0812345678"), "66812345678");
        assert_eq!(normalize_phone("+66 81 234 5678"), "66812345678");
        assert_eq!(normalize_phone("66812345678"), "66812345678");
    }

    #[test]
    fn test_body_skips_blank_phones_and_trims_message() {
        let phones = vec![
            "0812345678".to_string(),
            "   ".to_string(),
            "0898765432".to_string(),
        ];
        let body = build_body("SMSNOTI", &phones, "  hello  ").unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["data"]["type_request"], "normal");
        assert_eq!(json["data"]["type_message"], "custom");
        assert_eq!(json["data"]["type_send"], "now");
        assert_eq!(json["data"]["sender_name"], "SMSNOTI");

        let tx = json["data"]["transaction"].as_array().unwrap();
        assert_eq!(tx.len(), 2);
        assert_eq!(tx[0]["phone"], "66812345678");
        assert_eq!(tx[0]["message"], "hello");
        assert_eq!(tx[1]["phone"], "66898765432");
    }

    #[test]
    fn test_body_rejects_empty_inputs() {
        assert!(matches!(
            build_body("S", &["0812345678".to_string()], "   "),
            Err(SmsError::EmptyMessage)
        ));
        assert!(matches!(
            build_body("S", &[" ".to_string()], "hi"),
            Err(SmsError::NoRecipients)
        ));
        assert!(matches!(
            build_body("S", &[], "hi"),
            Err(SmsError::NoRecipients)
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = EazySmsClient::new(config("https://api.eazysms.io/", true)).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.eazysms.io/sms-service/request/create"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_client_refuses_to_send() {
        let client = EazySmsClient::new(config("https://api.eazysms.io", false)).unwrap();
        assert!(!client.is_configured());

        let result = client.send(&["0812345678".to_string()], "hello").await;
        assert!(matches!(result, Err(SmsError::NotConfigured)));
    }

    #[test]
    fn test_error_status_mapping() {
        let status = |e: SmsError| AppError::from(e).into_response().status();
        assert_eq!(status(SmsError::NotConfigured), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(SmsError::NoRecipients), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(SmsError::Gateway {
                status: 500,
                body: "boom".into()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
