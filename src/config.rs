//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现功能。

use crate::error::{Result, TranslationError};
use crate::types::{BatchConfig, ProviderConfig, TranslationOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 默认搜索的配置文件名，按顺序查找
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "translation-config.toml",
    "config.toml",
    ".translation-config.toml",
];

/// 翻译库配置结构
///
/// 包含所有翻译相关的配置选项，支持从TOML文件加载和保存。
///
/// ```toml
/// [translation]
/// source_lang = "zh-CN"
/// target_lang = "en"
/// preserve_obsidian_links = true
///
/// [provider]
/// deeplx_api_url = "http://localhost:1188/translate"
/// max_requests_per_second = 1.0
/// timeout_secs = 30
///
/// [provider.retry]
/// max_retries = 1
///
/// [batch]
/// file_delay_ms = 500
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationLibConfig {
    /// 翻译选项
    #[serde(default)]
    pub translation: TranslationOptions,
    /// 后端配置
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 批量处理配置
    #[serde(default)]
    pub batch: BatchConfig,
}

impl TranslationLibConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TranslationError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| TranslationError::io(path, e))
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Self {
        Self::load_from_dir(Path::new("."))
    }

    /// 在指定目录下按 [`DEFAULT_CONFIG_PATHS`] 顺序查找配置，找不到时使用默认值
    pub fn load_from_dir(dir: &Path) -> Self {
        for name in &DEFAULT_CONFIG_PATHS {
            let path = dir.join(name);
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        info!("No configuration file found, using defaults");
        Self::default()
    }

    /// Generate example configuration file
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }

    /// 校验各部分配置
    pub fn validate(&self) -> Result<()> {
        self.translation.validate()?;
        self.provider.validate()
    }
}
