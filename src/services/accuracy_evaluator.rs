//! 准确性评估服务 - 业务能力层
//!
//! 让模型验算一道题，返回结构化结论。
//! 模型输出无法解析时退回到关键词判断，保证总能给出结论；传输错误照常返回。

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TransportError;
use crate::models::evaluation::EvaluationResult;
use crate::models::question::Question;
use crate::prompts::{build_accuracy_prompt, ACCURACY_SYSTEM_PROMPT};
use crate::services::json_extractor::{DelimiterExtractor, JsonExtractor, JsonShape};
use crate::services::llm_service::{CompletionRequest, LanguageModel};

/// 关键词兜底时使用的说明
pub const FALLBACK_EXPLANATION: &str = "Extracted from response";

/// 准确性评估服务
pub struct AccuracyEvaluator {
    llm: Arc<dyn LanguageModel>,
    extractor: Arc<dyn JsonExtractor>,
    max_tokens: u32,
    temperature: f32,
}

impl AccuracyEvaluator {
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

    /// 评估单道题，每次调用恰好发起一次模型请求
    pub async fn evaluate(&self, question: &Question) -> Result<EvaluationResult, TransportError> {
        debug!("评估题目 {}", question.id());

        let request = CompletionRequest::new(
            build_accuracy_prompt(question),
            self.max_tokens,
            self.temperature,
        )
        .with_system(ACCURACY_SYSTEM_PROMPT);

        let response = self.llm.complete(&request).await?;

        Ok(interpret_accuracy_response(self.extractor.as_ref(), &response))
    }
}

/// 把模型回复解读为评估结论
///
/// - 能提取出对象：按字段取值，`correct` 缺省 false，
///   `explanation` 和 `solution_steps` 缺省空串
/// - 提取失败：回复（小写）同时包含 "correct" 和 "true" 即判为正确，
///   解题步骤记为完整回复
pub fn interpret_accuracy_response(extractor: &dyn JsonExtractor, response: &str) -> EvaluationResult {
    match extractor.extract(response, JsonShape::Object) {
        Ok(value) => EvaluationResult {
            correct: value.get("correct").and_then(Value::as_bool).unwrap_or(false),
            explanation: value
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            solution_steps: Some(
                value
                    .get("solution_steps")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
        },
        Err(e) => {
            warn!("评估结果解析失败，改用关键词判断: {}", e);
            let lower = response.to_lowercase();
            EvaluationResult {
                correct: lower.contains("correct") && lower.contains("true"),
                explanation: FALLBACK_EXPLANATION.to_string(),
                solution_steps: Some(response.to_string()),
            }
        }
    }
}
