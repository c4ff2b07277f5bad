//! 翻译后端抽象
//!
//! 行翻译引擎只依赖 [`TranslationProvider`] 这一项能力，具体后端由调用方注入。

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;

pub mod deeplx;

pub use deeplx::{retry_with_backoff, DeepLXProvider, RateLimiter};

/// 翻译后端
///
/// 实现方负责网络、鉴权和限流；引擎本身不会重试。
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 翻译一段文本
    ///
    /// # 参数
    ///
    /// * `text` - 待翻译文本（单行，不含换行）
    /// * `source_lang` - 源语言代码
    /// * `target_lang` - 目标语言代码
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError>;

    /// 后端名称，用于日志
    fn name(&self) -> &str {
        "provider"
    }
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for &T {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        (**self).translate_text(text, source_lang, target_lang).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for Box<T> {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        (**self).translate_text(text, source_lang, target_lang).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for Arc<T> {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        (**self).translate_text(text, source_lang, target_lang).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
