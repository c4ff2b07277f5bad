//! 支持的语言列表
//!
//! 只给命令行和配置使用，翻译引擎本身不关心语言代码的取值。

use std::fmt;

/// 一种可选语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { name: "English", code: "en" },
    Language { name: "Chinese", code: "zh-CN" },
    Language { name: "Spanish", code: "es" },
    Language { name: "French", code: "fr" },
    Language { name: "German", code: "de" },
    Language { name: "Japanese", code: "ja" },
    Language { name: "Korean", code: "ko" },
    Language { name: "Russian", code: "ru" },
    Language { name: "Italian", code: "it" },
    Language { name: "Portuguese", code: "pt" },
];

impl Language {
    /// 按名称（不区分大小写）或代码查找
    ///
    /// ```rust
    /// use markdown_line_translator::Language;
    ///
    /// assert_eq!(Language::resolve("japanese").map(|l| l.code), Some("ja"));
    /// assert_eq!(Language::resolve("zh-cn").map(|l| l.name), Some("Chinese"));
    /// assert!(Language::resolve("klingon").is_none());
    /// ```
    pub fn resolve(input: &str) -> Option<&'static Language> {
        let input = input.trim();
        LANGUAGES.iter().find(|lang| {
            lang.name.eq_ignore_ascii_case(input) || lang.code.eq_ignore_ascii_case(input)
        })
    }

    /// 解析为语言代码；未知输入原样当作代码交给后端判断
    pub fn code_for(input: &str) -> String {
        match Self::resolve(input) {
            Some(lang) => lang.code.to_string(),
            None => input.trim().to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        for (i, a) in LANGUAGES.iter().enumerate() {
            for b in &LANGUAGES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn code_for_passes_unknown_codes_through() {
        assert_eq!(Language::code_for("German"), "de");
        assert_eq!(Language::code_for(" pt "), "pt");
        assert_eq!(Language::code_for("nl"), "nl");
    }

    #[test]
    fn display_shows_name_and_code() {
        assert_eq!(LANGUAGES[1].to_string(), "Chinese (zh-CN)");
    }
}
