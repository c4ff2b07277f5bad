//! 行翻译引擎
//!
//! 逐行分类、只把可翻译的部分交给 [`TranslationProvider`]，再把结构前缀拼回去。
//! 引擎不保存跨行状态，行按顺序依次翻译，前一行的请求完成后才处理下一行。

use std::borrow::Cow;
use tracing::debug;

use crate::classifier::{classify_line, obsidian_link_pattern, LineClassification};
use crate::error::{LineError, Result, TranslationError};
use crate::placeholder::ProtectedSpans;
use crate::provider::TranslationProvider;
use crate::types::TranslationOptions;

/// 还原后端返回的 HTML 实体，例如 `&#39;` → `'`
pub fn unescape_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

async fn translate_segment<P>(
    text: &str,
    options: &TranslationOptions,
    provider: &P,
) -> std::result::Result<String, LineError>
where
    P: TranslationProvider + ?Sized,
{
    let translated = provider
        .translate_text(text, &options.source_lang, &options.target_lang)
        .await?;
    Ok(unescape_entities(&translated).into_owned())
}

/// 翻译单行
///
/// * 空行原样返回
/// * 含 Obsidian 双链的行：开启保留时先替换为占位符再翻译，否则整行翻译
/// * 列表、有序列表、标题：保留前缀，只翻译其余内容；内容为空时不调用后端
/// * 行内链接、行内代码：原样返回
/// * 其余整行翻译
pub async fn translate_line<P>(
    line: &str,
    options: &TranslationOptions,
    provider: &P,
) -> std::result::Result<String, LineError>
where
    P: TranslationProvider + ?Sized,
{
    let classification = classify_line(line);
    debug!(kind = %classification.kind(), "classified line");

    match classification {
        LineClassification::Blank
        | LineClassification::MarkdownLink
        | LineClassification::InlineCode => Ok(line.to_string()),

        LineClassification::ObsidianLink { .. } if options.preserve_obsidian_links => {
            let spans = ProtectedSpans::extract(line, obsidian_link_pattern());
            let translated = provider
                .translate_text(spans.masked(), &options.source_lang, &options.target_lang)
                .await?;
            let restored = spans.restore(&translated)?;
            Ok(unescape_entities(&restored).into_owned())
        }

        LineClassification::ObsidianLink { .. } | LineClassification::PlainText => {
            translate_segment(line, options, provider).await
        }

        LineClassification::ListItem { prefix, content }
        | LineClassification::OrderedListItem { prefix, content }
        | LineClassification::Header { prefix, content } => {
            if content.trim().is_empty() {
                return Ok(prefix.to_string());
            }
            let translated = translate_segment(content, options, provider).await?;
            Ok(format!("{prefix}{translated}"))
        }
    }
}

/// 翻译整篇文档
///
/// 输出行数与输入一致、顺序不变。任意一行失败即返回错误，错误中带有
/// 从1开始的行号和该行原文；已翻译的行不会返回。
///
/// # 示例
///
/// ```rust
/// use async_trait::async_trait;
/// use markdown_line_translator::{
///     translate_document, ProviderError, TranslationOptions, TranslationProvider,
/// };
///
/// struct Suffix;
///
/// #[async_trait]
/// impl TranslationProvider for Suffix {
///     async fn translate_text(
///         &self,
///         text: &str,
///         _source: &str,
///         _target: &str,
///     ) -> Result<String, ProviderError> {
///         Ok(format!("{text} [T]"))
///     }
/// }
///
/// let lines = ["# Title", "", "- item one", "Some plain sentence."];
/// let options = TranslationOptions::new("en", "fr");
/// let out = tokio_test::block_on(translate_document(&lines, &options, &Suffix)).unwrap();
/// assert_eq!(out, ["# Title [T]", "", "- item one [T]", "Some plain sentence. [T]"]);
/// ```
pub async fn translate_document<P, S>(
    lines: &[S],
    options: &TranslationOptions,
    provider: &P,
) -> Result<Vec<String>>
where
    P: TranslationProvider + ?Sized,
    S: AsRef<str>,
{
    let mut translated = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let output = translate_line(line, options, provider)
            .await
            .map_err(|source| TranslationError::Line {
                line_number: index + 1,
                line: line.to_string(),
                source,
            })?;
        translated.push(output);
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录每次请求并把文本转为大写
    #[derive(Default)]
    struct Uppercase {
        calls: Mutex<Vec<String>>,
    }

    impl Uppercase {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslationProvider for Uppercase {
        async fn translate_text(
            &self,
            text: &str,
            _source_lang: &str,
            _target_lang: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(text.to_uppercase())
        }
    }

    /// 固定返回同一段文本
    struct Fixed(&'static str);

    #[async_trait]
    impl TranslationProvider for Fixed {
        async fn translate_text(
            &self,
            _text: &str,
            _source_lang: &str,
            _target_lang: &str,
        ) -> std::result::Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    /// 第 N 次调用失败
    struct FailOn {
        fail_at: usize,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl TranslationProvider for FailOn {
        async fn translate_text(
            &self,
            text: &str,
            _source_lang: &str,
            _target_lang: &str,
        ) -> std::result::Result<String, ProviderError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == self.fail_at {
                return Err(ProviderError::ApiError {
                    code: 403,
                    message: "quota exceeded".to_string(),
                });
            }
            Ok(text.to_string())
        }
    }

    fn options() -> TranslationOptions {
        TranslationOptions::new("en", "de")
    }

    #[tokio::test]
    async fn bullet_prefix_is_kept_and_only_content_translated() {
        let provider = Uppercase::default();
        let out = translate_line("- hello", &options(), &provider).await.unwrap();
        assert_eq!(out, "- HELLO");
        assert_eq!(provider.calls(), ["hello"]);
    }

    #[tokio::test]
    async fn code_and_links_are_never_sent() {
        let provider = Uppercase::default();
        for line in ["`do_not_translate()`", "[click](http://x.com)"] {
            let out = translate_line(line, &options(), &provider).await.unwrap();
            assert_eq!(out, line);
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_lines_are_returned_unchanged() {
        let provider = Uppercase::default();
        for line in ["", "   ", "\t"] {
            assert_eq!(translate_line(line, &options(), &provider).await.unwrap(), line);
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_header_skips_provider() {
        let provider = Uppercase::default();
        let out = translate_line("## ", &options(), &provider).await.unwrap();
        assert_eq!(out, "## ");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn list_item_with_inline_code_is_translated_whole() {
        let provider = Uppercase::default();
        let out = translate_line("- check `code` here", &options(), &provider)
            .await
            .unwrap();
        assert_eq!(out, "- CHECK `CODE` HERE");
        assert_eq!(provider.calls(), ["check `code` here"]);
    }

    #[tokio::test]
    async fn obsidian_links_survive_when_preserved() {
        let provider = Uppercase::default();
        let opts = options().with_obsidian_links(true);
        let out = translate_line("See [[Note A]] for details", &opts, &provider)
            .await
            .unwrap();
        assert_eq!(out, "SEE [[Note A]] FOR DETAILS");
        assert_eq!(provider.calls(), ["See @@link0@@ for details"]);
        assert!(!out.contains("@@"));
    }

    #[tokio::test]
    async fn obsidian_lines_skip_structural_split() {
        let provider = Uppercase::default();
        let opts = options().with_obsidian_links(true);
        let out = translate_line("- [[a]] and [[b]]", &opts, &provider).await.unwrap();
        assert_eq!(out, "- [[a]] AND [[b]]");
        assert_eq!(provider.calls(), ["- @@link0@@ and @@link1@@"]);
    }

    #[tokio::test]
    async fn obsidian_lines_translated_whole_when_not_preserved() {
        let provider = Uppercase::default();
        let out = translate_line("See [[Note A]]", &options(), &provider)
            .await
            .unwrap();
        assert_eq!(out, "SEE [[NOTE A]]");
        assert_eq!(provider.calls(), ["See [[Note A]]"]);
    }

    #[tokio::test]
    async fn dropped_placeholder_is_reported() {
        let opts = options().with_obsidian_links(true);
        let err = translate_line("See [[Note A]]", &opts, &Fixed("Siehe"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LineError::PlaceholderMismatch {
                expected: 1,
                found: 0
            }
        ));
    }

    #[tokio::test]
    async fn provider_entities_are_unescaped() {
        let out = translate_line("it is", &options(), &Fixed("it&#39;s &amp; &quot;ok&quot;"))
            .await
            .unwrap();
        assert_eq!(out, "it's & \"ok\"");

        let out = translate_line("1. one", &options(), &Fixed("l&#39;un"))
            .await
            .unwrap();
        assert_eq!(out, "1. l'un");
    }

    #[tokio::test]
    async fn pass_through_lines_keep_their_entities() {
        let line = "`a &amp; b`";
        let out = translate_line(line, &options(), &Fixed("x")).await.unwrap();
        assert_eq!(out, line);
    }

    #[tokio::test]
    async fn document_keeps_line_count_and_order() {
        let provider = Uppercase::default();
        let lines = vec!["# Title", "", "text", "   ", "2. two"];
        let out = translate_document(&lines, &options(), &provider).await.unwrap();
        assert_eq!(out, ["# TITLE", "", "TEXT", "   ", "2. TWO"]);
        assert_eq!(provider.calls(), ["Title", "text", "two"]);
    }

    #[tokio::test]
    async fn empty_document_is_empty() {
        let lines: Vec<String> = Vec::new();
        let out = translate_document(&lines, &options(), &Uppercase::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn failure_reports_line_number_and_content() {
        let provider = FailOn {
            fail_at: 2,
            calls: Mutex::new(0),
        };
        let lines = ["first", "", "- second", "third"];
        let err = translate_document(&lines, &options(), &provider)
            .await
            .unwrap_err();

        assert_eq!(err.failing_line(), Some((3, "- second")));
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(*provider.calls.lock().unwrap(), 2);
    }

    #[test]
    fn works_through_dyn_provider() {
        let provider: Box<dyn TranslationProvider> = Box::new(Uppercase::default());
        let out = tokio_test::block_on(translate_line("plain", &options(), provider.as_ref()))
            .unwrap();
        assert_eq!(out, "PLAIN");
    }
}
