//! 错误处理模块
//!
//! 定义翻译库中使用的错误类型和错误处理机制。
//!
//! 错误分三层：
//!
//! * [`ProviderError`] - 翻译后端调用失败（网络、鉴权、配额、语言对不支持）
//! * [`LineError`] - 单行翻译失败，包装 provider 错误或占位符校验失败
//! * [`TranslationError`] - 文档/文件层面的错误，携带失败行号与原文

use std::path::PathBuf;
use thiserror::Error;

/// 翻译后端错误
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API响应错误
    #[error("API error {code}: {message}")]
    ApiError {
        /// 错误代码
        code: i32,
        /// 错误消息
        message: String,
    },

    /// 解析错误
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 后端返回了空的翻译结果
    #[error("provider returned an empty translation")]
    EmptyResult,

    /// 速率限制错误
    #[error("Rate limit error: {0}")]
    RateLimitError(String),
}

/// 单行翻译错误
#[derive(Error, Debug)]
pub enum LineError {
    /// 后端调用失败
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// 译文中的占位符数量或编号与原文不一致
    #[error("placeholder mismatch: expected {expected} link placeholders, found {found}")]
    PlaceholderMismatch {
        /// 原文中替换出的占位符数量
        expected: usize,
        /// 译文中找到的有效占位符数量
        found: usize,
    },
}

/// 翻译错误类型
#[derive(Error, Debug)]
pub enum TranslationError {
    /// 某一行翻译失败，整篇文档中止
    #[error("line {line_number} ({line:?}): {source}")]
    Line {
        /// 从1开始的行号
        line_number: usize,
        /// 失败行的原文
        line: String,
        #[source]
        source: LineError,
    },

    /// 配置无效
    #[error("Config error: {0}")]
    Config(String),

    /// 配置文件解析失败
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// 文件读写错误
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 输入路径不存在
    #[error("input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// 输入目录中没有 Markdown 文件
    #[error("no Markdown files found in {}", .0.display())]
    NoMarkdownFiles(PathBuf),
}

impl TranslationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io {
            path: path.into(),
            source,
        }
    }

    /// 失败行的行号和原文（仅 `Line` 变体）
    pub fn failing_line(&self) -> Option<(usize, &str)> {
        match self {
            TranslationError::Line {
                line_number, line, ..
            } => Some((*line_number, line.as_str())),
            _ => None,
        }
    }
}

/// 翻译结果类型别名
///
/// 简化返回类型，使用 `TranslationError` 作为错误类型。
///
/// # 示例
///
/// ```rust
/// use markdown_line_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::Config("target_lang is empty".to_string()))
/// }
///
/// assert!(example_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;
