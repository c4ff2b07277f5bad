//! 行分类模块
//!
//! 决定 Markdown 文档中每一行的哪些部分需要送去翻译、哪些原样保留。
//!
//! 分类顺序固定：
//!
//! 1. 空行 / 纯空白行
//! 2. Obsidian 双链 `[[...]]`（优先级最高，出现即不再做结构匹配）
//! 3. 无序列表、有序列表、标题（拆出前缀，只翻译剩余内容）
//! 4. 行内链接 `[text](url)`、行内代码 `` `code` ``（整行原样返回）
//! 5. 普通文本

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static OBSIDIAN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").expect("valid obsidian link pattern"));

static BULLET_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*[-*+]\s+)(.*)").expect("valid bullet pattern"));

static ORDERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*\d+\.\s+)(.*)").expect("valid ordinal pattern"));

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+\s+)(.*)").expect("valid header pattern"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("valid link pattern"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`.+?`").expect("valid inline code pattern"));

/// 行类型标签，不携带数据，便于日志和统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    ObsidianLink,
    ListItem,
    OrderedListItem,
    Header,
    MarkdownLink,
    InlineCode,
    PlainText,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Blank => "blank",
            LineKind::ObsidianLink => "obsidian-link",
            LineKind::ListItem => "list-item",
            LineKind::OrderedListItem => "ordered-list-item",
            LineKind::Header => "header",
            LineKind::MarkdownLink => "markdown-link",
            LineKind::InlineCode => "inline-code",
            LineKind::PlainText => "plain-text",
        };
        f.write_str(name)
    }
}

/// 单行的分类结果
///
/// 结构类变体借用原行，`prefix` 原样保留，`content` 是待翻译部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClassification<'a> {
    Blank,
    /// 按出现顺序列出的双链
    ObsidianLink { links: Vec<&'a str> },
    ListItem { prefix: &'a str, content: &'a str },
    OrderedListItem { prefix: &'a str, content: &'a str },
    Header { prefix: &'a str, content: &'a str },
    MarkdownLink,
    InlineCode,
    PlainText,
}

impl<'a> LineClassification<'a> {
    pub fn kind(&self) -> LineKind {
        match self {
            LineClassification::Blank => LineKind::Blank,
            LineClassification::ObsidianLink { .. } => LineKind::ObsidianLink,
            LineClassification::ListItem { .. } => LineKind::ListItem,
            LineClassification::OrderedListItem { .. } => LineKind::OrderedListItem,
            LineClassification::Header { .. } => LineKind::Header,
            LineClassification::MarkdownLink => LineKind::MarkdownLink,
            LineClassification::InlineCode => LineKind::InlineCode,
            LineClassification::PlainText => LineKind::PlainText,
        }
    }

    /// 结构前缀和内容，仅列表、有序列表、标题三种有值
    pub fn structural_parts(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            LineClassification::ListItem { prefix, content }
            | LineClassification::OrderedListItem { prefix, content }
            | LineClassification::Header { prefix, content } => Some((prefix, content)),
            _ => None,
        }
    }
}

/// 结构匹配器：带两个捕获组（前缀、内容）的正则
struct StructuralMatcher {
    kind: LineKind,
    pattern: &'static LazyLock<Regex>,
}

/// 按优先级排列，第一个命中即返回
static STRUCTURAL_MATCHERS: [StructuralMatcher; 3] = [
    StructuralMatcher {
        kind: LineKind::ListItem,
        pattern: &BULLET_LIST,
    },
    StructuralMatcher {
        kind: LineKind::OrderedListItem,
        pattern: &ORDERED_LIST,
    },
    StructuralMatcher {
        kind: LineKind::Header,
        pattern: &HEADER,
    },
];

/// 整行保护匹配器：命中即整行原样返回
static PROTECTED_MATCHERS: [(LineKind, &LazyLock<Regex>); 2] = [
    (LineKind::MarkdownLink, &MARKDOWN_LINK),
    (LineKind::InlineCode, &INLINE_CODE),
];

/// 双链匹配用的正则，供占位符替换复用
pub fn obsidian_link_pattern() -> &'static Regex {
    &OBSIDIAN_LINK
}

/// 对单行进行分类
///
/// 行不应包含换行符；行尾的 `\r` 由调用方在拆行时去掉。
///
/// # 示例
///
/// ```rust
/// use markdown_line_translator::{classify_line, LineClassification};
///
/// assert_eq!(
///     classify_line("- hello"),
///     LineClassification::ListItem { prefix: "- ", content: "hello" }
/// );
/// assert_eq!(classify_line("`do_not_translate()`"), LineClassification::InlineCode);
/// ```
pub fn classify_line(line: &str) -> LineClassification<'_> {
    if line.trim().is_empty() {
        return LineClassification::Blank;
    }

    let links: Vec<&str> = OBSIDIAN_LINK.find_iter(line).map(|m| m.as_str()).collect();
    if !links.is_empty() {
        return LineClassification::ObsidianLink { links };
    }

    for matcher in &STRUCTURAL_MATCHERS {
        if let Some(caps) = matcher.pattern.captures(line) {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let content = caps.get(2).map_or("", |m| m.as_str());
            return match matcher.kind {
                LineKind::ListItem => LineClassification::ListItem { prefix, content },
                LineKind::OrderedListItem => {
                    LineClassification::OrderedListItem { prefix, content }
                }
                _ => LineClassification::Header { prefix, content },
            };
        }
    }

    for (kind, pattern) in &PROTECTED_MATCHERS {
        if pattern.is_match(line) {
            return match kind {
                LineKind::MarkdownLink => LineClassification::MarkdownLink,
                _ => LineClassification::InlineCode,
            };
        }
    }

    LineClassification::PlainText
}
