//! 真伪判断服务 - 业务能力层
//!
//! 只判断单道题"是真题还是生成题"，混合、打乱和汇总在
//! `orchestrator::authenticity_evaluator`。

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TransportError;
use crate::models::record::QuestionRecord;
use crate::prompts::build_authenticity_prompt;
use crate::services::json_extractor::{DelimiterExtractor, JsonExtractor, JsonShape};
use crate::services::llm_service::{CompletionRequest, LanguageModel};

/// 真伪判断服务
pub struct AuthenticityJudge {
    llm: Arc<dyn LanguageModel>,
    extractor: Arc<dyn JsonExtractor>,
    max_tokens: u32,
    temperature: f32,
}

impl AuthenticityJudge {
    pub fn new(llm: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            llm,
            extractor: Arc::new(DelimiterExtractor::new()),
            max_tokens: config.evaluation_max_tokens,
            temperature: config.evaluation_temperature,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// 判断一道题是否为真题
    ///
    /// 提示词中不含任何来源信息
    pub async fn predict_is_real(&self, record: &QuestionRecord) -> Result<bool, TransportError> {
        let request = CompletionRequest::new(
            build_authenticity_prompt(record),
            self.max_tokens,
            self.temperature,
        );

        let response = self.llm.complete(&request).await?;
        let predicted_real = interpret_authenticity_response(self.extractor.as_ref(), &response);
        debug!("真伪判断结果: {}", if predicted_real { "真题" } else { "生成题" });

        Ok(predicted_real)
    }
}

/// 把模型回复解读为"是否真题"
///
/// 优先读取 JSON 中的布尔字段 `is_real`；提取失败或字段缺失时，
/// 回复（小写）包含 "real" 且不包含 "generated" 即视为真题
pub fn interpret_authenticity_response(extractor: &dyn JsonExtractor, response: &str) -> bool {
    let structured = match extractor.extract(response, JsonShape::Object) {
        Ok(value) => value.get("is_real").and_then(Value::as_bool),
        Err(e) => {
            warn!("真伪判断结果解析失败，改用关键词判断: {}", e);
            None
        }
    };

    structured.unwrap_or_else(|| {
        let lower = response.to_lowercase();
        lower.contains("real") && !lower.contains("generated")
    })
}
