/*!
 * Shared stub providers and file helpers for the integration tests
 */

#![allow(dead_code)]

use async_trait::async_trait;
use markdown_line_translator::{ProviderError, TranslationProvider};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends `" [T]"` to every request and records what it was asked
#[derive(Default)]
pub struct SuffixProvider {
    requests: Mutex<Vec<String>>,
}

impl SuffixProvider {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for SuffixProvider {
    async fn translate_text(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(text.to_string());
        Ok(format!("{text} [T]"))
    }

    fn name(&self) -> &str {
        "suffix"
    }
}

/// Upper-cases every request
pub struct UppercaseProvider;

#[async_trait]
impl TranslationProvider for UppercaseProvider {
    async fn translate_text(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<String, ProviderError> {
        Ok(text.to_uppercase())
    }
}

/// Fails whenever the request contains `needle`, otherwise tags the text with the target language
pub struct FailingOnProvider {
    pub needle: &'static str,
}

#[async_trait]
impl TranslationProvider for FailingOnProvider {
    async fn translate_text(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        if text.contains(self.needle) {
            return Err(ProviderError::ApiError {
                code: 456,
                message: "Quota exceeded".to_string(),
            });
        }
        Ok(format!("[{target_lang}] {text}"))
    }
}

/// Creates a file with the given content in `dir`
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}
