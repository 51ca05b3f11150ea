//! 真题收集器 - 编排层
//!
//! ## 职责
//!
//! 依次把 PDF 文件交给 [`PdfQuestionExtractor`]，累计题目直到达到上限：
//!
//! 1. **逐个文件**：按给定顺序处理，不并发
//! 2. **单文件失败**：记录警告后跳过，继续下一个文件
//! 3. **达到上限**：停止处理剩余文件，多出的题目截断

use std::path::PathBuf;
use tracing::{info, warn};

use crate::models::record::QuestionRecord;
use crate::services::pdf_question_extractor::PdfQuestionExtractor;
use crate::utils::logging::truncate_text;

/// 默认收集的真题数量
pub const DEFAULT_REAL_QUESTION_LIMIT: usize = 10;

/// 真题收集器
pub struct RealQuestionCollector {
    extractor: PdfQuestionExtractor,
    limit: usize,
}

impl RealQuestionCollector {
    pub fn new(extractor: PdfQuestionExtractor) -> Self {
        Self {
            extractor,
            limit: DEFAULT_REAL_QUESTION_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 从文件列表中收集最多 `limit` 道题
    ///
    /// # 参数
    /// - `files`: 待处理的 PDF 路径，按顺序处理
    ///
    /// # 返回
    /// 收集到的题目记录；所有文件都失败时为空
    pub async fn collect(&self, files: &[PathBuf]) -> Vec<QuestionRecord> {
        let mut records = Vec::new();
        if self.limit == 0 {
            return records;
        }

        let total_files = files.len();
        for (idx, file) in files.iter().enumerate() {
            info!("📄 处理第 {}/{} 个文件: {}", idx + 1, total_files, file.display());

            match self.extractor.extract_from_file(file).await {
                Ok(batch) => records.extend(batch),
                Err(e) => {
                    warn!("⚠️ 跳过 {}: {}", file.display(), e);
                    continue;
                }
            }

            if records.len() >= self.limit {
                info!("已收集 {} 道题，达到上限 {}，停止处理", records.len(), self.limit);
                break;
            }
        }

        records.truncate(self.limit);
        for (idx, record) in records.iter().enumerate() {
            info!("题目 {}: {}", idx + 1, truncate_text(&record.question, 100));
        }
        records
    }
}
