//! 文件与目录翻译
//!
//! 在行翻译引擎之上负责读写文件、遍历目录和汇总每个文件的结果。
//! 单个文件失败不会中断整个批次。

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::document::Document;
use crate::engine::translate_document;
use crate::error::{Result, TranslationError};
use crate::provider::TranslationProvider;
use crate::types::{BatchConfig, TranslationOptions};

/// 单个文件的失败记录
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: TranslationError,
}

/// 批量翻译结果
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 成功写出的目标文件
    pub translated: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.translated.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Markdown 翻译器
///
/// 持有注入的翻译后端和整批共享的选项。
///
/// # 示例
///
/// ```rust,no_run
/// use markdown_line_translator::{
///     BatchConfig, DeepLXProvider, MarkdownTranslator, ProviderConfig, TranslationOptions,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = DeepLXProvider::new(ProviderConfig::default());
///     let options = TranslationOptions::new("zh-CN", "en").with_obsidian_links(true);
///     let translator = MarkdownTranslator::new(provider, options, BatchConfig::default())?;
///
///     let report = translator.translate_path("notes".as_ref(), "notes-en".as_ref()).await?;
///     println!("{} / {} files translated", report.translated.len(), report.total());
///     Ok(())
/// }
/// ```
pub struct MarkdownTranslator<P> {
    provider: P,
    options: TranslationOptions,
    batch: BatchConfig,
}

impl<P: TranslationProvider> MarkdownTranslator<P> {
    /// 创建翻译器，语言代码为空时返回配置错误
    pub fn new(provider: P, options: TranslationOptions, batch: BatchConfig) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            provider,
            options,
            batch,
        })
    }

    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 翻译一段 Markdown 文本，保留换行风格
    pub async fn translate_str(&self, content: &str) -> Result<String> {
        let document = Document::parse(content);
        let lines = translate_document(document.lines(), &self.options, &self.provider).await?;
        Ok(document.render(&lines))
    }

    /// 翻译单个文件并写到 `output`
    ///
    /// 翻译失败时不会写出任何内容。
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<()> {
        let content = fs::read_to_string(input)
            .await
            .map_err(|e| TranslationError::io(input, e))?;

        let translated = self.translate_str(&content).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TranslationError::io(parent, e))?;
        }
        fs::write(output, translated)
            .await
            .map_err(|e| TranslationError::io(output, e))
    }

    /// 翻译单个文件或目录下的所有 Markdown 文件
    ///
    /// 目录只取直接子文件，按文件名排序；输出到 `output_dir/<文件名>`。
    pub async fn translate_path(&self, input: &Path, output_dir: &Path) -> Result<BatchReport> {
        let files = self.collect_inputs(input).await?;

        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| TranslationError::io(output_dir, e))?;

        let total = files.len();
        let mut report = BatchReport::default();

        for (index, file) in files.into_iter().enumerate() {
            if index > 0 && self.batch.file_delay_ms > 0 {
                sleep(Duration::from_millis(self.batch.file_delay_ms)).await;
            }

            info!("Processing: {} ({}/{})", file.display(), index + 1, total);
            let Some(file_name) = file.file_name() else {
                continue;
            };
            let output = output_dir.join(file_name);

            match self.translate_file(&file, &output).await {
                Ok(()) => report.translated.push(output),
                Err(error) => {
                    warn!("Failed to translate {}: {}", file.display(), error);
                    report.failures.push(FileFailure { path: file, error });
                }
            }
        }

        info!(
            "Translated {} of {} files ({} failed)",
            report.translated.len(),
            total,
            report.failures.len()
        );
        Ok(report)
    }

    async fn collect_inputs(&self, input: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(input)
            .await
            .map_err(|_| TranslationError::InputNotFound(input.to_path_buf()))?;

        if metadata.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        let mut entries = fs::read_dir(input)
            .await
            .map_err(|e| TranslationError::io(input, e))?;
        let mut files = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TranslationError::io(input, e))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file && self.has_markdown_extension(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(TranslationError::NoMarkdownFiles(input.to_path_buf()));
        }

        files.sort();
        Ok(files)
    }

    fn has_markdown_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.batch.extension)
    }
}
