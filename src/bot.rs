//! Webhook sender
//!
//! [`Bot`] renders a [`Message`], waits for admission, signs the request when
//! a secret is configured and posts it to the custom-bot hook. One `Bot` per
//! webhook; share an [`AdmissionController`] between bots that post to the
//! same hook from different places.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use url::Url;

use crate::config::{AfterBuildHook, BotOptions};
use crate::limiter::AdmissionController;
use crate::message::{
    CardMessage, CardTemplateMessage, ImageMessage, Message, MessageBody, MessageContent,
    MsgType, RichTextMessage, ShareChatMessage, TextMessage,
};
use crate::{Error, Result};

const HOOK_MARKER: &str = "/open-apis/bot";

/// Decoded response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    msg_type: MsgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<&'a RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sign: Option<String>,
}

/// Custom-bot webhook client
pub struct Bot {
    client: reqwest::Client,
    token: String,
    url: Url,
    limiter: Arc<AdmissionController>,
    secret: Option<SecretString>,
    after_build: Option<AfterBuildHook>,
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("url", &self.url.as_str())
            .field("limited", &self.limiter.is_enabled())
            .field("signed", &self.secret.is_some())
            .field("after_build", &self.after_build.is_some())
            .finish_non_exhaustive()
    }
}

impl Bot {
    /// Create a bot for a webhook URL or bare hook token
    ///
    /// # Errors
    ///
    /// Returns error if the token is empty, the base URL is invalid, the rate
    /// limits are out of range or the HTTP client cannot be built
    pub fn new(webhook: &str, options: BotOptions) -> Result<Self> {
        let token = parse_token(webhook)?;
        let url = hook_url(options.effective_base_url(), &token)?;
        let limiter = Arc::new(AdmissionController::new(options.limits)?);

        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        tracing::debug!(
            url = %url,
            limited = limiter.is_enabled(),
            signed = options.secret.is_some(),
            "webhook bot created"
        );

        Ok(Self {
            client,
            token,
            url,
            limiter,
            secret: options.secret,
            after_build: options.after_build,
        })
    }

    /// Replace the admission controller with a shared one
    #[must_use]
    pub fn with_limiter(mut self, limiter: Arc<AdmissionController>) -> Self {
        self.limiter = limiter;
        self
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Endpoint requests are posted to
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn limiter(&self) -> &Arc<AdmissionController> {
        &self.limiter
    }

    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_text(&self, text: impl Into<String>) -> Result<ApiResponse> {
        self.send_message(&TextMessage::new(text)).await
    }

    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_rich_text(&self, post: &RichTextMessage) -> Result<ApiResponse> {
        self.send_message(post).await
    }

    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_image(&self, image_key: impl Into<String>) -> Result<ApiResponse> {
        self.send_message(&ImageMessage::new(image_key)).await
    }

    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_share_chat(&self, chat_id: impl Into<String>) -> Result<ApiResponse> {
        self.send_message(&ShareChatMessage::new(chat_id)).await
    }

    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_card(&self, card: &CardMessage) -> Result<ApiResponse> {
        self.send_message(card).await
    }

    /// Send a card built from a saved template
    ///
    /// # Errors
    ///
    /// See [`send_message`](Self::send_message)
    pub async fn send_card_template<V>(
        &self,
        template_id: impl Into<String>,
        variables: V,
    ) -> Result<ApiResponse>
    where
        V: Serialize + Send + Sync,
    {
        self.send_message(&CardTemplateMessage::new(template_id, variables))
            .await
    }

    /// Render, admit, sign and post a message
    ///
    /// The after-build hook runs before admission is requested, so a rejected
    /// body never spends a token.
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be rendered, the hook rejects it,
    /// admission fails, signing fails, the request fails, the response is not
    /// an envelope or the envelope carries a non-zero code
    pub async fn send_message<M>(&self, message: &M) -> Result<ApiResponse>
    where
        M: Message + ?Sized,
    {
        let mut body = message.body()?;

        if let Some(hook) = &self.after_build {
            hook(&mut body).map_err(|e| match e {
                Error::Hook(_) => e,
                other => Error::Hook(other.to_string()),
            })?;
        }

        self.limiter.acquire().await?;

        let payload = self.payload(&body)?;
        self.post(payload).await
    }

    fn payload(&self, body: &MessageBody) -> Result<Vec<u8>> {
        let (timestamp, sign) = match &self.secret {
            Some(secret) => {
                let ts = chrono::Utc::now().timestamp();
                let sign = crate::signature::sign(ts, secret.expose_secret())?;
                (Some(ts), Some(sign))
            }
            None => (None, None),
        };

        let request = ApiRequest {
            msg_type: body.msg_type,
            content: body.content.as_ref(),
            card: body.card.as_deref(),
            timestamp,
            sign,
        };
        Ok(serde_json::to_vec(&request)?)
    }

    async fn post(&self, payload: Vec<u8>) -> Result<ApiResponse> {
        let started = Instant::now();
        tracing::debug!(
            url = %self.url,
            body = %String::from_utf8_lossy(&payload),
            "webhook request"
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(
            status = status.as_u16(),
            elapsed = ?started.elapsed(),
            body = %text,
            "webhook response"
        );

        let envelope: ApiResponse = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "response is not an envelope");
                return Err(Error::UnexpectedResponse {
                    status: status.as_u16(),
                    body: text,
                });
            }
        };

        if envelope.code != 0 {
            return Err(Error::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        Ok(envelope)
    }
}

/// Extract the hook token from a webhook URL or return the trimmed bare token
fn parse_token(webhook: &str) -> Result<String> {
    let webhook = webhook.trim();

    let token = if webhook.contains(HOOK_MARKER) {
        match Url::parse(webhook) {
            Ok(url) => url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .unwrap_or_default()
                .to_string(),
            Err(_) => webhook
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    } else {
        webhook.to_string()
    };

    if token.is_empty() {
        return Err(Error::Config(format!("no hook token in webhook {webhook:?}")));
    }
    Ok(token)
}

fn hook_url(base_url: &str, token: &str) -> Result<Url> {
    Url::parse(&format!("{base_url}/open-apis/bot/v2/hook/{token}"))
        .map_err(|e| Error::Config(format!("invalid base url {base_url:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Token parsing ---

    #[test]
    fn token_from_full_url() {
        let token =
            parse_token("https://open.feishu.cn/open-apis/bot/v2/hook/4e5c-aa11").unwrap();
        assert_eq!(token, "4e5c-aa11");
    }

    #[test]
    fn token_from_url_with_trailing_slash_and_query() {
        let token = parse_token(" https://open.feishu.cn/open-apis/bot/v2/hook/abc/?x=1 ").unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn bare_token_is_trimmed() {
        assert_eq!(parse_token("  abc123\n").unwrap(), "abc123");
    }

    #[test]
    fn empty_token_is_config_error() {
        assert!(matches!(parse_token("   "), Err(Error::Config(_))));
        assert!(matches!(parse_token(""), Err(Error::Config(_))));
    }

    // -- Construction ---

    #[test]
    fn url_uses_base_and_token() {
        let bot = Bot::new(
            "https://open.feishu.cn/open-apis/bot/v2/hook/tok",
            BotOptions::new().base_url("https://open.larksuite.com/"),
        )
        .unwrap();
        assert_eq!(bot.token(), "tok");
        assert_eq!(
            bot.url().as_str(),
            "https://open.larksuite.com/open-apis/bot/v2/hook/tok"
        );
        assert!(bot.limiter().is_enabled());
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = Bot::new("tok", BotOptions::new().base_url("not a url")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn disabled_limits_build_unlimited_controller() {
        let bot = Bot::new("tok", BotOptions::new().limit_per_second(-1)).unwrap();
        assert!(!bot.limiter().is_enabled());
    }

    #[test]
    fn shared_limiter_replaces_own() {
        let shared = Arc::new(AdmissionController::unlimited());
        let bot = Bot::new("tok", BotOptions::new())
            .unwrap()
            .with_limiter(Arc::clone(&shared));
        assert!(Arc::ptr_eq(bot.limiter(), &shared));
    }

    #[test]
    fn debug_hides_secret() {
        let bot = Bot::new("tok", BotOptions::new().secret("s3cret")).unwrap();
        let debug = format!("{bot:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("signed: true"));
    }

    // -- Payload ---

    #[test]
    fn unsigned_payload_has_no_signature_fields() {
        let bot = Bot::new("tok", BotOptions::new()).unwrap();
        let body = TextMessage::new("hi").body().unwrap();
        let payload = bot.payload(&body).unwrap();
        assert_eq!(
            std::str::from_utf8(&payload).unwrap(),
            r#"{"msg_type":"text","content":{"text":"hi"}}"#
        );
    }

    #[test]
    fn signed_payload_matches_signer() {
        let bot = Bot::new("tok", BotOptions::new().secret("k")).unwrap();
        let body = ImageMessage::new("img_1").body().unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&bot.payload(&body).unwrap()).unwrap();
        let ts = payload["timestamp"].as_i64().unwrap();
        assert_eq!(
            payload["sign"].as_str().unwrap(),
            crate::signature::sign(ts, "k").unwrap()
        );
        assert_eq!(payload["content"]["image_key"], "img_1");
    }
}
