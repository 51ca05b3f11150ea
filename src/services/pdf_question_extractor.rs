//! 真题抽取服务 - 业务能力层
//!
//! 把一个 PDF 文件连同抽取提示词发给模型，从回复中取出题目数组。
//! 一次调用只处理一个文件；多文件遍历和数量上限在 `orchestrator::real_question_collector`。

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, FileError, ParseError};
use crate::models::record::QuestionRecord;
use crate::prompts::EXTRACTION_PROMPT;
use crate::services::json_extractor::{DelimiterExtractor, JsonExtractor, JsonShape};
use crate::services::llm_service::{CompletionRequest, FileAttachment, LanguageModel};
use crate::utils::logging::truncate_text;

/// PDF 真题抽取服务
pub struct PdfQuestionExtractor {
    llm: Arc<dyn LanguageModel>,
    extractor: Arc<dyn JsonExtractor>,
    max_tokens: u32,
    temperature: f32,
}

impl PdfQuestionExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            llm,
            extractor: Arc::new(DelimiterExtractor::new()),
            // 一份试卷的题目较多，按生成的输出上限给
            max_tokens: config.generation_max_tokens,
            temperature: config.evaluation_temperature,
        }
    }

    /// 替换 JSON 提取器
    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// 从单个 PDF 抽取题目
    ///
    /// # 参数
    /// - `path`: PDF 文件路径
    ///
    /// # 返回
    /// 按模型输出顺序排列的题目记录，不做实体校验（真题可能没有答案）。
    /// 数组中不是题目记录的元素会被跳过并记录警告；
    /// 回复里找不到数组时返回 [`AppError::Response`]。
    pub async fn extract_from_file(&self, path: &Path) -> Result<Vec<QuestionRecord>, AppError> {
        let path_str = path.display().to_string();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| FileError::ReadFailed {
                path: path_str.clone(),
                source,
            })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path_str.clone());
        debug!("发送 {}（{} 字节）", filename, data.len());

        let request = CompletionRequest::new(EXTRACTION_PROMPT, self.max_tokens, self.temperature)
            .with_attachment(FileAttachment::pdf(filename, data));

        let response = self.llm.complete(&request).await?;
        debug!("抽取响应: {}", truncate_text(&response, 200));

        let context = format!("抽取 {}", path_str);
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

        let total = items.len();
        let records: Vec<QuestionRecord> = items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("⚠️ {} 第 {} 项不是题目记录，已跳过: {}", path_str, idx + 1, e);
                    None
                }
            })
            .collect();

        info!("✓ {} 抽取到 {}/{} 道题", path_str, records.len(), total);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_llm::MockLlm;
    use serde_json::json;
    use std::path::PathBuf;

    fn write_pdf(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4\n% test\n").unwrap();
        path
    }

    fn extractor(mock: Arc<MockLlm>) -> PdfQuestionExtractor {
        PdfQuestionExtractor::new(mock, &Config::default())
    }

    #[tokio::test]
    async fn test_sends_file_with_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "sat_2023.pdf");
        let reply = json!([
            {"id": "1", "question": "What is 20% of 50?", "choices": {"A": "5", "B": "10", "C": "15", "D": "20"}, "answer": "B"},
            {"id": "2", "question": "If 3x = 12, what is x?", "choices": {"A": "3", "B": "4", "C": "6", "D": "9"}}
        ]);
        let mock = Arc::new(MockLlm::new().with_response(format!("```json\n{}\n```", reply)));

        let records = extractor(mock.clone()).extract_from_file(&path).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].answer, "B");
        assert_eq!(records[1].answer, "");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_message, EXTRACTION_PROMPT);
        assert_eq!(requests[0].attachments.len(), 1);
        let attachment = &requests[0].attachments[0];
        assert_eq!(attachment.filename, "sat_2023.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert!(attachment.data.starts_with(b"%PDF"));
        assert_eq!(requests[0].max_tokens, Config::default().generation_max_tokens);
    }

    #[tokio::test]
    async fn test_skips_items_that_are_not_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "mixed.pdf");
        let reply = json!([
            {"question": "What is 2 + 2?", "choices": {"A": "3", "B": "4", "C": "5", "D": "6"}, "answer": "B"},
            {"note": "page 3 is a figure"}
        ]);
        let mock = Arc::new(MockLlm::new().with_response(reply.to_string()));

        let records = extractor(mock).extract_from_file(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "What is 2 + 2?");
    }

    #[tokio::test]
    async fn test_reply_without_array_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "scan.pdf");
        let mock = Arc::new(MockLlm::new().with_response("The document is unreadable."));

        let err = extractor(mock).extract_from_file(&path).await.unwrap_err();
        match err {
            AppError::Response { context, source } => {
                assert!(context.ends_with("scan.pdf"));
                assert!(matches!(source, ParseError::NoJsonFound { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_makes_no_call() {
        let mock = Arc::new(MockLlm::new());
        let err = extractor(mock.clone())
            .extract_from_file(Path::new("missing/exam.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "exam.pdf");
        let mock = Arc::new(MockLlm::new().with_failure("413 payload too large"));
        let err = extractor(mock).extract_from_file(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
