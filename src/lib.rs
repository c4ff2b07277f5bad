//! # Markdown Line Translator
//!
//! 逐行翻译 Markdown 文档，同时保留 Markdown 语法。
//!
//! ## 主要特性
//!
//! - **结构保留**: 列表符号、有序编号、标题 `#` 不会送去翻译，只翻译其后的内容
//! - **代码与链接跳过**: 含行内代码或 `[text](url)` 链接的行原样保留
//! - **Obsidian 双链**: 可选地把 `[[...]]` 替换为占位符，翻译后原样还原，并校验占位符完整
//! - **后端可注入**: 引擎只依赖 [`TranslationProvider`]，内置 DeepLX 实现
//! - **批量处理**: 单文件或整个目录，单个文件失败不影响其他文件
//! - **配置灵活**: 支持TOML配置文件和程序化配置
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use markdown_line_translator::{
//!     translate_document, DeepLXProvider, ProviderConfig, TranslationOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = DeepLXProvider::new(ProviderConfig::default());
//!     let options = TranslationOptions::new("en", "zh-CN").with_obsidian_links(true);
//!
//!     let lines = ["# Title", "", "- See [[Note A]] for details", "`code` stays"];
//!     let translated = translate_document(&lines, &options, &provider).await?;
//!     println!("{}", translated.join("\n"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! source_lang = "zh-CN"
//! target_lang = "en"
//! preserve_obsidian_links = false
//!
//! [provider]
//! deeplx_api_url = "http://localhost:1188/translate"
//! max_requests_per_second = 1.0
//! timeout_secs = 30
//!
//! [batch]
//! file_delay_ms = 500
//! extension = "md"
//! ```

pub mod classifier;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod language;
pub mod placeholder;
pub mod provider;
pub mod translator;
pub mod types;

pub use classifier::{classify_line, LineClassification, LineKind};
pub use config::TranslationLibConfig;
pub use document::{Document, LineEnding};
pub use engine::{translate_document, translate_line, unescape_entities};
pub use error::{LineError, ProviderError, Result, TranslationError};
pub use language::{Language, LANGUAGES};
pub use placeholder::ProtectedSpans;
pub use provider::{retry_with_backoff, DeepLXProvider, RateLimiter, TranslationProvider};
pub use translator::{BatchReport, FileFailure, MarkdownTranslator};
pub use types::{
    BatchConfig, DeepLXRequest, DeepLXResponse, ProviderConfig, RetryConfig, TranslationOptions,
};
