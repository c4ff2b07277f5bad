use anyhow::{Context, Result};
use clap::Parser;
use markdown_line_translator::{
    DeepLXProvider, Language, MarkdownTranslator, TranslationLibConfig, LANGUAGES,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about = "逐行翻译 Markdown 文件，保留列表、标题、代码和 Obsidian 双链", long_about = None)]
struct Cli {
    /// 输入的 Markdown 文件或包含 .md 文件的目录
    #[arg(value_name = "INPUT", required_unless_present_any = ["list_languages", "init_config"])]
    input: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long, value_name = "DIR", required_unless_present_any = ["list_languages", "init_config"])]
    output: Option<PathBuf>,

    /// 源语言（名称或代码，如 Chinese / zh-CN）
    #[arg(short, long)]
    source: Option<String>,

    /// 目标语言（名称或代码，如 English / en）
    #[arg(short, long)]
    target: Option<String>,

    /// 保留 Obsidian 双链引用 [[...]]
    #[arg(long)]
    keep_obsidian_links: bool,

    /// 配置文件路径（默认在当前目录查找）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 翻译API地址
    #[arg(long)]
    api: Option<String>,

    /// 文件之间的停顿（毫秒）
    #[arg(long)]
    delay_ms: Option<u64>,

    /// 详细输出模式
    #[arg(short, long)]
    verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    quiet: bool,

    /// 列出支持的语言
    #[arg(long)]
    list_languages: bool,

    /// 生成示例配置文件后退出
    #[arg(long, value_name = "FILE")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// 返回 `Ok(false)` 表示有文件翻译失败
async fn run(cli: Cli) -> Result<bool> {
    if cli.list_languages {
        for lang in LANGUAGES {
            println!("{:<12} {}", lang.name, lang.code);
        }
        return Ok(true);
    }

    if let Some(path) = &cli.init_config {
        TranslationLibConfig::generate_example_config(path)
            .with_context(|| format!("写入示例配置失败: {}", path.display()))?;
        println!("已生成示例配置: {}", path.display());
        return Ok(true);
    }

    let config = load_config(&cli)?;
    config.validate().context("配置无效")?;

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        anyhow::bail!("必须同时指定输入路径和输出目录");
    };

    info!(
        "翻译 {} -> {}，{} → {}，保留双链: {}",
        input.display(),
        output.display(),
        config.translation.source_lang,
        config.translation.target_lang,
        config.translation.preserve_obsidian_links
    );

    let provider = DeepLXProvider::new(config.provider.clone());
    let translator = MarkdownTranslator::new(provider, config.translation, config.batch)?;

    let start = Instant::now();
    let report = translator
        .translate_path(&input, &output)
        .await
        .with_context(|| format!("无法翻译 {}", input.display()))?;

    for failure in &report.failures {
        match failure.error.failing_line() {
            Some((line_number, line)) => eprintln!(
                "❌ {} 第 {} 行 {:?}: {}",
                failure.path.display(),
                line_number,
                line,
                failure.error
            ),
            None => eprintln!("❌ {}: {}", failure.path.display(), failure.error),
        }
    }

    info!(
        "完成: {}/{} 个文件，耗时 {:.2}s",
        report.translated.len(),
        report.total(),
        start.elapsed().as_secs_f64()
    );

    Ok(report.is_success())
}

/// 读取配置文件并用命令行参数覆盖
fn load_config(cli: &Cli) -> Result<TranslationLibConfig> {
    let mut config = match &cli.config {
        Some(path) => TranslationLibConfig::from_file(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?,
        None => TranslationLibConfig::load_from_default_locations(),
    };

    if let Some(source) = &cli.source {
        config.translation.source_lang = Language::code_for(source);
    }
    if let Some(target) = &cli.target {
        config.translation.target_lang = Language::code_for(target);
    }
    if cli.keep_obsidian_links {
        config.translation.preserve_obsidian_links = true;
    }
    if let Some(api) = &cli.api {
        config.provider.deeplx_api_url = api.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.batch.file_delay_ms = delay;
    }

    Ok(config)
}

/// 初始化日志系统
fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
