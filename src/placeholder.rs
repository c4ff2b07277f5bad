//! 受保护片段的占位符替换
//!
//! 把不能翻译的片段（例如 Obsidian 双链）替换成编号占位符，翻译之后再按编号还原。
//! 还原时会校验占位符是否完整：每个编号恰好出现一次，且没有多出的编号。
//! 后端可能改变占位符的大小写（`@@LINK0@@`），还原时不区分大小写。

use regex::Regex;
use std::sync::LazyLock;

use crate::error::LineError;

const PLACEHOLDER_OPEN: &str = "@@link";
const PLACEHOLDER_CLOSE: &str = "@@";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@@link(\d+)@@").expect("valid placeholder pattern"));

/// 一行文本中被保护的片段
///
/// # 示例
///
/// ```rust
/// use markdown_line_translator::ProtectedSpans;
/// use regex::Regex;
///
/// let pattern = Regex::new(r"\[\[.*?\]\]").unwrap();
/// let spans = ProtectedSpans::extract("See [[Note A]] for details", &pattern);
/// assert_eq!(spans.masked(), "See @@link0@@ for details");
///
/// let restored = spans.restore("SEE @@link0@@ FOR DETAILS").unwrap();
/// assert_eq!(restored, "SEE [[Note A]] FOR DETAILS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSpans {
    masked: String,
    spans: Vec<String>,
}

impl ProtectedSpans {
    /// 按出现顺序把 `pattern` 的每个匹配替换成 `@@link{N}@@`
    pub fn extract(text: &str, pattern: &Regex) -> Self {
        let mut spans = Vec::new();
        let masked = pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let token = placeholder(spans.len());
                spans.push(caps[0].to_string());
                token
            })
            .into_owned();

        Self { masked, spans }
    }

    /// 替换后的文本，用于发送给翻译后端
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// 原始片段，按占位符编号排列
    pub fn spans(&self) -> &[String] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// 把译文中的占位符换回原始片段
    ///
    /// 占位符丢失、重复或编号越界时返回 [`LineError::PlaceholderMismatch`]，
    /// 不会输出残留占位符的文本。
    pub fn restore(&self, translated: &str) -> Result<String, LineError> {
        let mut seen = vec![0usize; self.spans.len()];
        let mut found = 0usize;
        let mut unknown = false;

        for caps in PLACEHOLDER.captures_iter(translated) {
            found += 1;
            let index = caps[1].parse::<usize>().ok();
            match index.filter(|&i| i < seen.len()) {
                Some(i) => seen[i] += 1,
                None => unknown = true,
            }
        }

        if unknown || found != self.spans.len() || seen.iter().any(|&count| count != 1) {
            return Err(LineError::PlaceholderMismatch {
                expected: self.spans.len(),
                found,
            });
        }

        let restored = PLACEHOLDER.replace_all(translated, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| self.spans.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });

        Ok(restored.into_owned())
    }
}

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_OPEN}{index}{PLACEHOLDER_CLOSE}")
}
