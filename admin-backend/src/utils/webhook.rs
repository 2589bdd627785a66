// admin-backend/src/utils/webhook.rs

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Webhook 通知エラー
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Webhook configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to deliver webhook: {0}")]
    DeliveryError(#[from] reqwest::Error),

    #[error("Webhook endpoint rejected message with status {0}")]
    Rejected(u16),
}

/// Webhook 設定（起動時に組み立てて注入する）
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 通知先URL。未設定なら通知しない
    pub endpoint_url: Option<String>,
    pub timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl WebhookConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.into()),
            ..Default::default()
        }
    }

    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, WebhookError> {
        let endpoint_url = env::var("WEBHOOK_ERROR_ROBOT_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout_secs = env::var("WEBHOOK_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|_| {
                WebhookError::ConfigurationError("Invalid WEBHOOK_TIMEOUT_SECS".to_string())
            })?;

        Ok(Self {
            endpoint_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint_url.is_some()
    }
}

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub content: String,
}

/// 送信ペイロード: `{"msgtype": "...", "text"|"markdown": {"content": "..."}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub msgtype: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MessageContent>,
}

impl WebhookPayload {
    pub fn new(content: impl Into<String>, kind: MessageKind) -> Self {
        let body = Some(MessageContent {
            content: content.into(),
        });
        match kind {
            MessageKind::Text => Self {
                msgtype: kind,
                text: body,
                markdown: None,
            },
            MessageKind::Markdown => Self {
                msgtype: kind,
                text: None,
                markdown: body,
            },
        }
    }
}

/// Webhook 通知サービス
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// 通知先なしのインスタンス
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: WebhookConfig::default(),
        }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// メッセージを送信し結果を返す。通知先が未設定なら何もしない
    pub async fn send(&self, content: &str, kind: MessageKind) -> Result<(), WebhookError> {
        let Some(url) = self.config.endpoint_url.as_deref() else {
            debug!("Webhook endpoint not configured, skipping notification");
            return Ok(());
        };

        let payload = WebhookPayload::new(content, kind);
        let response = self.client.post(url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Rejected(status.as_u16()));
        }
        Ok(())
    }

    /// 投げっぱなしで送信する。失敗はログに残すだけで呼び出し元には返さない
    pub fn notify(&self, content: impl Into<String>, kind: MessageKind) {
        if !self.config.is_enabled() {
            return;
        }

        let notifier = self.clone();
        let content = content.into();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&content, kind).await {
                warn!(error = %e, "Webhook notification failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_payload_shape() {
        let payload = WebhookPayload::new("hello", MessageKind::Text);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "msgtype": "text", "text": { "content": "hello" } })
        );
    }

    #[test]
    fn test_markdown_payload_shape() {
        let payload = WebhookPayload::new("**alert**", MessageKind::Markdown);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "msgtype": "markdown", "markdown": { "content": "**alert**" } })
        );
    }

    #[test]
    fn test_default_config_is_disabled() {
        let config = WebhookConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(WebhookConfig::new("http://localhost:9/hook").is_enabled());
    }

    #[tokio::test]
    async fn test_send_without_endpoint_is_noop() {
        let notifier = WebhookNotifier::disabled();
        assert!(notifier.send("ignored", MessageKind::Text).await.is_ok());
    }
}
