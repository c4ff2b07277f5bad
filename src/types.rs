//! 类型定义模块
//!
//! 定义翻译库中使用的所有数据结构和配置类型。

use crate::error::{Result, TranslationError};
use serde::{Deserialize, Serialize};

/// 翻译选项
///
/// 整篇文档共享、只读的翻译参数。
///
/// # 字段说明
///
/// * `source_lang` - 源语言代码，如 "zh-CN"
/// * `target_lang` - 目标语言代码，如 "en"
/// * `preserve_obsidian_links` - 是否保留 Obsidian 双链 `[[...]]` 不参与翻译
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    /// 源语言代码
    pub source_lang: String,
    /// 目标语言代码
    pub target_lang: String,
    /// 是否保留 Obsidian 双链引用
    pub preserve_obsidian_links: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            source_lang: "zh-CN".to_string(),
            target_lang: "en".to_string(),
            preserve_obsidian_links: false,
        }
    }
}

impl TranslationOptions {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            preserve_obsidian_links: false,
        }
    }

    pub fn with_obsidian_links(mut self, preserve: bool) -> Self {
        self.preserve_obsidian_links = preserve;
        self
    }

    /// 校验语言代码均已填写
    pub fn validate(&self) -> Result<()> {
        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::Config("source_lang must not be empty".to_string()));
        }
        if self.target_lang.trim().is_empty() {
            return Err(TranslationError::Config("target_lang must not be empty".to_string()));
        }
        Ok(())
    }
}

/// 翻译后端配置
///
/// * `deeplx_api_url` - DeepLX API地址
/// * `max_requests_per_second` - 每秒最大请求数
/// * `timeout_secs` - 单次请求超时（秒）
/// * `retry` - 后端内部的重试策略
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// DeepLX API地址
    pub deeplx_api_url: String,
    /// 每秒最大请求数
    pub max_requests_per_second: f64,
    /// 请求超时
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            deeplx_api_url: "http://localhost:1188/translate".to_string(),
            max_requests_per_second: 1.0,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.deeplx_api_url.trim().is_empty() {
            return Err(TranslationError::Config("deeplx_api_url must not be empty".to_string()));
        }
        if self.max_requests_per_second.is_nan() || self.max_requests_per_second <= 0.0 {
            return Err(TranslationError::Config(format!(
                "max_requests_per_second must be positive, got {}",
                self.max_requests_per_second
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_delay_ms: 100,
            max_delay_ms: 1000,
            backoff_multiplier: 1.2,
        }
    }
}

/// 批量处理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 两个文件之间的停顿（毫秒），避免触发 API 配额
    pub file_delay_ms: u64,
    /// 目录模式下参与翻译的文件扩展名
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            file_delay_ms: 500,
            extension: "md".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeepLXRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepLXResponse {
    pub code: i32,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_do_not_preserve_links() {
        let options = TranslationOptions::default();
        assert!(!options.preserve_obsidian_links);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn empty_language_codes_are_rejected() {
        let options = TranslationOptions::new("", "en");
        assert!(matches!(options.validate(), Err(TranslationError::Config(_))));

        let options = TranslationOptions::new("en", "  ");
        assert!(matches!(options.validate(), Err(TranslationError::Config(_))));
    }

    #[test]
    fn provider_rate_must_be_positive() {
        let config = ProviderConfig {
            max_requests_per_second: 0.0,
            ..ProviderConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ProviderConfig::default().validate().is_ok());
    }

    #[test]
    fn deeplx_response_deserializes() {
        let response: DeepLXResponse =
            serde_json::from_str(r#"{"code":200,"data":"hello","alternatives":[]}"#).unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.data, "hello");
    }
}
