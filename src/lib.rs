//! Feishu Bot - custom-bot webhook client for Feishu/Lark
//!
//! This library provides:
//! - Typed message kinds (text, rich text, image, share chat, cards)
//! - Multi-language document assembly for posts and cards
//! - Dual-window (per second and per minute) admission control
//! - Request signing and delivery through [`Bot`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Messages                        │
//! │   Text  │  Post  │  Image  │  Share chat  │  Card   │
//! └────────────────────┬────────────────────────────────┘
//!                      │ body() via I18nDocument
//! ┌────────────────────▼────────────────────────────────┐
//! │                       Bot                           │
//! │   after-build hook  │  admission  │  sign  │  POST  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │          /open-apis/bot/v2/hook/{token}             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod i18n;
pub mod limiter;
pub mod markdown;
pub mod message;
pub mod signature;

pub use bot::{ApiResponse, Bot};
pub use config::{BotOptions, Config};
pub use error::{Error, Result};
pub use i18n::{assemble, I18nDocument, Language, LanguageFragment};
pub use limiter::{AdmissionController, RateLimitConfig};
pub use message::{
    CardBuilder, CardGlobalConfig, CardMessage, CardTemplateMessage, ImageMessage, Message,
    MessageBody, RichTextBuilder, RichTextMessage, ShareChatMessage, TextMessage,
};
