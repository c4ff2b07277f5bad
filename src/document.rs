//! 文档拆行与重组
//!
//! 引擎只处理行序列；换行符风格和文件末尾是否有换行由这里负责记住并还原。

/// 换行符风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// 拆成行的 Markdown 文档
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl Document {
    /// 拆分文件内容
    ///
    /// 文件中只要出现 `\r\n` 就按 CRLF 处理，每行末尾的 `\r` 会被去掉。
    /// 空文件得到零行。
    ///
    /// ```rust
    /// use markdown_line_translator::Document;
    ///
    /// let doc = Document::parse("# Title\n\n- item\n");
    /// assert_eq!(doc.lines(), ["# Title", "", "- item"]);
    /// assert_eq!(doc.render(doc.lines()), "# Title\n\n- item\n");
    /// ```
    pub fn parse(content: &str) -> Self {
        let line_ending = if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        let trailing_newline = content.ends_with('\n');

        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| match line_ending {
                    LineEnding::CrLf => line.strip_suffix('\r').unwrap_or(line),
                    LineEnding::Lf => line,
                })
                .map(str::to_string)
                .collect()
        };

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// 用原文档的换行风格拼接 `lines`
    pub fn render<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let separator = self.line_ending.as_str();
        let mut output = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<&str>>()
            .join(separator);
        if self.trailing_newline && !lines.is_empty() {
            output.push_str(separator);
        }
        output
    }
}
