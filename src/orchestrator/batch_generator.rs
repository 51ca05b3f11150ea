//! 分批生成器 - 编排层
//!
//! ## 职责
//!
//! 把"生成 N 道题"拆成若干次不超过 [`MAX_QUESTIONS_PER_CALL`] 的调用：
//!
//! 1. **N ≤ 上限**：直接一次调用，错误原样返回
//! 2. **N > 上限**：拆成 `ceil(N / 上限)` 批，依次执行后按顺序拼接
//! 3. **某批失败**：立即停止，返回 [`ChunkFailure`](crate::error::ChunkFailure)，
//!    其中保留此前各批已生成的题目，由调用方决定是否使用
//!
//! 不做重试，也不并发：每批完成后再开始下一批。

use tracing::{error, info};

use crate::error::AppError;
use crate::models::question::Question;
use crate::services::question_generator::{QuestionGenerator, MAX_QUESTIONS_PER_CALL};
use crate::utils::logging::{log_chunk_complete, log_chunk_start};

/// 把 `total` 拆成每批不超过 `per_call` 的批次大小
///
/// 除最后一批外每批都是 `per_call`
pub fn plan_chunks(total: usize, per_call: usize) -> Vec<usize> {
    let per_call = per_call.max(1);
    (0..total)
        .step_by(per_call)
        .map(|start| per_call.min(total - start))
        .collect()
}

/// 分批生成器
pub struct BatchGenerator {
    generator: QuestionGenerator,
    per_call: usize,
}

impl BatchGenerator {
    pub fn new(generator: QuestionGenerator) -> Self {
        Self {
            generator,
            per_call: MAX_QUESTIONS_PER_CALL,
        }
    }

    /// 生成 `count` 道题
    pub async fn generate(&self, count: usize) -> Result<Vec<Question>, AppError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        if count <= self.per_call {
            info!("🧮 单次生成 {} 道题", count);
            return self.generator.generate_batch(count).await;
        }

        let chunks = plan_chunks(count, self.per_call);
        let total_chunks = chunks.len();
        let mut questions = Vec::with_capacity(count);

        for (idx, chunk_size) in chunks.into_iter().enumerate() {
            let chunk_num = idx + 1;
            log_chunk_start(chunk_num, total_chunks, chunk_size, count);

            match self.generator.generate_batch(chunk_size).await {
                Ok(batch) => {
                    log_chunk_complete(chunk_num, batch.len(), chunk_size);
                    questions.extend(batch);
                }
                Err(e) => {
                    error!(
                        "❌ 第 {}/{} 批生成失败: {}（已完成 {} 道题）",
                        chunk_num,
                        total_chunks,
                        e,
                        questions.len()
                    );
                    return Err(AppError::chunk_failed(chunk_num, total_chunks, questions, e));
                }
            }
        }

        Ok(questions)
    }
}
