//! DeepLX 翻译后端
//!
//! 通过 HTTP 调用 DeepLX 兼容接口，内置速率限制和指数退避重试。

use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::TranslationProvider;
use crate::error::ProviderError;
use crate::types::{DeepLXRequest, DeepLXResponse, ProviderConfig, RetryConfig};

/// 速率限制器
///
/// 用于控制API请求频率，防止超出服务提供商的速率限制。
#[derive(Clone)]
pub struct RateLimiter {
    /// 信号量，用于控制并发请求数量
    semaphore: Arc<Semaphore>,
    /// 请求间隔延迟
    delay: Duration,
}

impl RateLimiter {
    /// 创建新的速率限制器
    ///
    /// # 参数
    ///
    /// * `requests_per_second` - 每秒允许的最大请求数，必须大于0
    ///
    /// # 示例
    ///
    /// ```rust
    /// use markdown_line_translator::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 每个请求之间间隔 500ms
    /// assert_eq!(limiter.delay().as_millis(), 500);
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let delay = Duration::from_secs_f64(1.0 / requests_per_second.max(f64::EPSILON));

        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 获取请求许可
    ///
    /// 在发起API请求前调用此方法；同一时刻只放行一个请求，放行后等待 `delay`。
    pub async fn acquire(&self) -> Result<(), ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ProviderError::RateLimitError(format!("Rate limiter error: {}", e)))?;
        sleep(self.delay).await;
        Ok(())
    }
}

/// 带指数退避的重试机制
///
/// 为API调用提供可靠的重试机制，在失败时按指数增长的延迟重试。
///
/// # 参数
///
/// * `operation` - 要执行的异步操作
/// * `config` - 重试配置
/// * `rate_limiter` - 速率限制器
///
/// # 返回
///
/// * `Ok(T)` - 操作成功的结果
/// * `Err(ProviderError)` - 所有重试尝试失败后的最后一个错误
pub async fn retry_with_backoff<F, Fut, T>(
    mut operation: F,
    config: &RetryConfig,
    rate_limiter: &RateLimiter,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut delay = config.initial_delay_ms;
    let mut attempt = 0;

    loop {
        rate_limiter.acquire().await?;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= config.max_retries => return Err(e),
            Err(e) => {
                attempt += 1;
                warn!("Attempt {} failed: {}. Retrying in {}ms...", attempt, e, delay);
                sleep(Duration::from_millis(delay)).await;
                delay = std::cmp::min(
                    (delay as f64 * config.backoff_multiplier) as u64,
                    config.max_delay_ms,
                );
            }
        }
    }
}

/// DeepLX 翻译后端
///
/// # 示例
///
/// ```rust,no_run
/// use markdown_line_translator::{DeepLXProvider, ProviderConfig, TranslationProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = DeepLXProvider::new(ProviderConfig::default());
///     let text = provider.translate_text("你好", "zh-CN", "en").await?;
///     println!("{}", text);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DeepLXProvider {
    /// HTTP客户端，用于API调用
    client: Client,
    /// 速率限制器
    rate_limiter: RateLimiter,
    config: ProviderConfig,
}

impl DeepLXProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("markdown-line-translator/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to create configured HTTP client: {}, using default", e);
                Client::new()
            });

        Self {
            client,
            rate_limiter: RateLimiter::new(config.max_requests_per_second),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn send_once(&self, request: &DeepLXRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.config.deeplx_api_url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!("DeepLX响应状态: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            return Err(ProviderError::ApiError {
                code: i32::from(status.as_u16()),
                message: format!("DeepLX API请求失败: {} - {}", status, error_text),
            });
        }

        let body = response.text().await?;
        parse_response_body(&body)
    }
}

#[async_trait]
impl TranslationProvider for DeepLXProvider {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let request = DeepLXRequest {
            text: text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        };
        debug!(
            "发送翻译请求到: {} ({} 字符)",
            self.config.deeplx_api_url,
            text.chars().count()
        );

        let request = &request;
        retry_with_backoff(
            || self.send_once(request),
            &self.config.retry,
            &self.rate_limiter,
        )
        .await
    }

    fn name(&self) -> &str {
        "deeplx"
    }
}

/// 解析 DeepLX 或兼容接口的响应
///
/// 依次尝试：`{code, data}` 标准格式、常见 JSON 字段名、纯文本。
pub(crate) fn parse_response_body(body: &str) -> Result<String, ProviderError> {
    if let Ok(result) = serde_json::from_str::<DeepLXResponse>(body) {
        return if result.code != 200 {
            Err(ProviderError::ApiError {
                code: result.code,
                message: format!("DeepLX翻译失败，返回代码: {}", result.code),
            })
        } else if result.data.is_empty() {
            Err(ProviderError::EmptyResult)
        } else {
            Ok(result.data)
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResult);
    }

    if trimmed.starts_with('{') {
        let json_value = serde_json::from_str::<serde_json::Value>(trimmed)
            .map_err(|e| ProviderError::ParseError(format!("无法解析JSON响应: {}: {}", e, body)))?;

        return ["translated_text", "result", "translation", "data"]
            .iter()
            .find_map(|key| json_value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::ParseError(format!("无法从JSON响应中提取翻译结果: {}", body))
            });
    }

    debug!("假设响应是纯文本翻译结果");
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn parses_standard_deeplx_response() {
        let text = parse_response_body(r#"{"code":200,"id":1,"data":"Hello"}"#).unwrap();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn non_200_code_is_api_error() {
        let err = parse_response_body(r#"{"code":429,"data":""}"#).unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { code: 429, .. }));
    }

    #[test]
    fn empty_data_is_empty_result() {
        let err = parse_response_body(r#"{"code":200,"data":""}"#).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResult));
        assert!(matches!(
            parse_response_body("   ").unwrap_err(),
            ProviderError::EmptyResult
        ));
    }

    #[test]
    fn falls_back_to_common_json_fields() {
        assert_eq!(
            parse_response_body(r#"{"translated_text":"Bonjour"}"#).unwrap(),
            "Bonjour"
        );
        assert_eq!(
            parse_response_body(r#"{"translation":"Hola"}"#).unwrap(),
            "Hola"
        );
        assert!(matches!(
            parse_response_body(r#"{"unexpected":1}"#).unwrap_err(),
            ProviderError::ParseError(_)
        ));
    }

    #[test]
    fn plain_text_body_is_accepted() {
        assert_eq!(parse_response_body("Ciao").unwrap(), "Ciao");
    }

    #[test]
    fn rate_limiter_delay_follows_rate() {
        assert_eq!(RateLimiter::new(1.0).delay(), Duration::from_secs(1));
        assert_eq!(RateLimiter::new(4.0).delay(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn retry_stops_after_max_retries() {
        let config = RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
        };
        let limiter = RateLimiter::new(1000.0);
        let calls = AtomicUsize::new(0);

        let result: Result<(), ProviderError> = retry_with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::EmptyResult) }
            },
            &config,
            &limiter,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_returns_first_success() {
        let config = RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 1,
            backoff_multiplier: 1.0,
        };
        let limiter = RateLimiter::new(1000.0);
        let calls = AtomicUsize::new(0);

        let result = retry_with_backoff(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ProviderError::EmptyResult)
                    } else {
                        Ok(n)
                    }
                }
            },
            &config,
            &limiter,
        )
        .await
        .unwrap();

        assert_eq!(result, 1);
    }
}
