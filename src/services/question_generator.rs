//! 题目生成服务 - 业务能力层
//!
//! 一次模型调用生成不超过 [`MAX_QUESTIONS_PER_CALL`] 道题。
//! 超过上限的分批逻辑在 `orchestrator::batch_generator`。

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, ParseError};
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use crate::prompts::{
    build_batch_generation_prompt, build_single_generation_prompt, GENERATION_SYSTEM_PROMPT,
};
use crate::services::json_extractor::{DelimiterExtractor, JsonExtractor, JsonShape};
use crate::services::llm_service::{CompletionRequest, LanguageModel};
use crate::utils::logging::truncate_text;

/// 单次调用可生成的最大题目数
///
/// 回复长度有上限，批次过大时模型输出容易被截断
pub const MAX_QUESTIONS_PER_CALL: usize = 10;

/// 题目生成服务
pub struct QuestionGenerator {
    llm: Arc<dyn LanguageModel>,
    extractor: Arc<dyn JsonExtractor>,
    max_tokens: u32,
    temperature: f32,
}

impl QuestionGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            llm,
            extractor: Arc::new(DelimiterExtractor::new()),
            max_tokens: config.generation_max_tokens,
            temperature: config.generation_temperature,
        }
    }

    /// 替换 JSON 提取器
    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// 生成单道题
    pub async fn generate_one(&self) -> Result<Question, AppError> {
        let request = CompletionRequest::new(
            build_single_generation_prompt(),
            self.max_tokens,
            self.temperature,
        )
        .with_system(GENERATION_SYSTEM_PROMPT);

        let context = "生成单道题";
        let response = self.llm.complete(&request).await?;
        let value = self
            .extractor
            .extract(&response, JsonShape::Object)
            .map_err(|e| AppError::response(context, e))?;

        question_from_value(value, &response, context)
    }

    /// 一次调用生成 `count` 道题
    ///
    /// # 参数
    /// - `count`: 题目数量，应不超过 [`MAX_QUESTIONS_PER_CALL`]
    ///
    /// # 返回
    /// 按模型输出顺序排列的题目。任意一道题无法解析或校验失败，整次调用失败；
    /// 解析错误以 [`AppError::Response`] 返回，带上本次请求的题数。
    /// 模型多给的题目会被丢弃；少给时原样返回并记录警告。
    pub async fn generate_batch(&self, count: usize) -> Result<Vec<Question>, AppError> {
        if count > MAX_QUESTIONS_PER_CALL {
            warn!(
                "单次请求 {} 道题超过上限 {}，输出可能被截断",
                count, MAX_QUESTIONS_PER_CALL
            );
        }

        let request = CompletionRequest::new(
            build_batch_generation_prompt(count),
            self.max_tokens,
            self.temperature,
        )
        .with_system(GENERATION_SYSTEM_PROMPT);

        let response = self.llm.complete(&request).await?;
        debug!("生成响应: {}", truncate_text(&response, 200));

        let context = format!("生成 {} 道题", count);
        let value = self
            .extractor
            .extract(&response, JsonShape::Array)
            .map_err(|e| AppError::response(context.as_str(), e))?;
        let Value::Array(items) = value else {
            return Err(AppError::response(
                context,
                ParseError::UnexpectedStructure {
                    detail: "顶层不是数组".to_string(),
                    raw: response,
                },
            ));
        };

        if items.len() > count {
            warn!("模型返回 {} 道题，多于请求的 {} 道，已截断", items.len(), count);
        } else if items.len() < count {
            warn!("模型只返回了 {} 道题（请求 {} 道）", items.len(), count);
        }

        items
            .into_iter()
            .take(count)
            .map(|item| question_from_value(item, &response, &context))
            .collect()
    }
}

/// JSON 值 → 记录 → 实体
fn question_from_value(value: Value, raw: &str, context: &str) -> Result<Question, AppError> {
    let record: QuestionRecord = serde_json::from_value(value).map_err(|e| {
        AppError::response(
            context,
            ParseError::UnexpectedStructure {
                detail: format!("不是有效的题目记录: {}", e),
                raw: raw.to_string(),
            },
        )
    })?;

    Ok(Question::try_from(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::services::mock_llm::MockLlm;
    use serde_json::json;

    fn questions_json(count: usize, offset: usize) -> String {
        let items: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("Question {}: if x + {} = {}, what is x?", offset + i, i, i + 2),
                    "choices": {"A": "1", "B": "2", "C": "3", "D": "4"},
                    "answer": "B"
                })
            })
            .collect();
        serde_json::to_string_pretty(&items).unwrap()
    }

    fn generator(mock: Arc<MockLlm>) -> QuestionGenerator {
        QuestionGenerator::new(mock, &Config::default())
    }

    #[tokio::test]
    async fn test_generate_batch_parses_array_in_order() {
        let mock = Arc::new(
            MockLlm::new().with_response(format!("Here you go:\n```json\n{}\n```", questions_json(3, 0))),
        );
        let questions = generator(mock.clone()).generate_batch(3).await.unwrap();

        assert_eq!(questions.len(), 3);
        assert!(questions[0].question().starts_with("Question 0:"));
        assert!(questions[2].question().starts_with("Question 2:"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].system_message.as_deref(),
            Some(GENERATION_SYSTEM_PROMPT)
        );
        assert!(requests[0].user_message.contains("exactly 3 new"));
        assert_eq!(requests[0].max_tokens, Config::default().generation_max_tokens);
    }

    #[tokio::test]
    async fn test_generate_batch_accepts_legacy_field_names() {
        let body = json!([{
            "content": "If 2x = 10, what is x?",
            "choices": {"A": "2", "B": "5", "C": "8", "D": "20"},
            "correct_answer": "B"
        }]);
        let mock = Arc::new(MockLlm::new().with_response(body.to_string()));
        let questions = generator(mock).generate_batch(1).await.unwrap();
        assert_eq!(questions[0].question(), "If 2x = 10, what is x?");
        assert_eq!(questions[0].answer(), "B");
    }

    #[tokio::test]
    async fn test_generate_batch_truncates_extra_items() {
        let mock = Arc::new(MockLlm::new().with_response(questions_json(5, 0)));
        let questions = generator(mock).generate_batch(2).await.unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_entity_aborts_call() {
        let body = json!([
            {"question": "ok", "choices": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "A"},
            {"question": "bad", "choices": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "E"}
        ]);
        let mock = Arc::new(MockLlm::new().with_response(body.to_string()));
        let err = generator(mock).generate_batch(2).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::AnswerNotInChoices { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_record_item_is_parse_error() {
        let mock = Arc::new(MockLlm::new().with_response("[{\"foo\": 1}]"));
        let err = generator(mock).generate_batch(1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Response {
                source: ParseError::UnexpectedStructure { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let mock = Arc::new(MockLlm::new().with_response("I cannot help with that."));
        let err = generator(mock).generate_batch(4).await.unwrap_err();
        match err {
            AppError::Response { context, source } => {
                assert_eq!(context, "生成 4 道题");
                assert!(matches!(source, ParseError::NoJsonFound { .. }));
                assert_eq!(source.raw(), "I cannot help with that.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mock = Arc::new(MockLlm::new().with_failure("401 unauthorized"));
        let err = generator(mock).generate_batch(1).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    /// 忽略模型回复，固定返回一个值的提取器
    struct FixedExtractor(Value);

    impl JsonExtractor for FixedExtractor {
        fn extract(&self, _text: &str, _shape: JsonShape) -> Result<Value, ParseError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_custom_extractor_replaces_default() {
        let fixed = json!([{
            "question": "What is 7 squared?",
            "choices": {"A": "14", "B": "49", "C": "77", "D": "343"},
            "answer": "B"
        }]);
        // 回复本身没有 JSON，默认提取器会失败
        let mock = Arc::new(MockLlm::new().with_response("no json at all"));
        let questions = generator(mock)
            .with_extractor(Arc::new(FixedExtractor(fixed)))
            .generate_batch(1)
            .await
            .unwrap();
        assert_eq!(questions[0].question(), "What is 7 squared?");
    }

    #[tokio::test]
    async fn test_generate_one_wraps_parse_error() {
        let mock = Arc::new(MockLlm::new().with_response("Here is a question: x + 1 = 2"));
        let err = generator(mock).generate_one().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Response { ref context, source: ParseError::NoJsonFound { .. } }
                if context == "生成单道题"
        ));
    }

    #[tokio::test]
    async fn test_generate_one_expects_object() {
        let body = json!({
            "question": "What is 10% of 50?",
            "choices": {"A": "0.5", "B": "5", "C": "50", "D": "500"},
            "answer": "B"
        });
        let mock = Arc::new(MockLlm::new().with_response(format!("Sure! {}", body)));
        let question = generator(mock).generate_one().await.unwrap();
        assert_eq!(question.answer(), "B");
        assert!(!question.id().is_empty());
    }
}
