//! 真伪鉴别评估 - 编排层
//!
//! 流程：
//! 1. 真题记为 `real_<i>`，生成题记为 `gen_<i>`，合并
//! 2. 打乱顺序，来源只记在本地
//! 3. 逐题调用 [`AuthenticityJudge`]，提示词中不带来源
//! 4. 汇总整体、真题子集、生成题子集的识别率

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::models::evaluation::{AuthenticityPrediction, AuthenticityReport};
use crate::models::record::QuestionRecord;
use crate::services::authenticity_judge::AuthenticityJudge;

/// 带来源标记的题目，只在本模块内可见
struct LabeledRecord {
    id: String,
    is_real: bool,
    record: QuestionRecord,
}

fn label_records(real: &[QuestionRecord], generated: &[QuestionRecord]) -> Vec<LabeledRecord> {
    let tag = |prefix: &str, is_real: bool, records: &[QuestionRecord]| -> Vec<LabeledRecord> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let id = format!("{}_{}", prefix, i);
                LabeledRecord {
                    record: QuestionRecord {
                        id: Some(id.clone()),
                        ..record.clone()
                    },
                    id,
                    is_real,
                }
            })
            .collect()
    };

    let mut labeled = tag("real", true, real);
    labeled.extend(tag("gen", false, generated));
    labeled
}

/// 真伪鉴别评估器
pub struct AuthenticityEvaluator {
    judge: AuthenticityJudge,
}

impl AuthenticityEvaluator {
    pub fn new(judge: AuthenticityJudge) -> Self {
        Self { judge }
    }

    /// 使用线程随机数打乱顺序
    pub async fn evaluate(
        &self,
        real: &[QuestionRecord],
        generated: &[QuestionRecord],
    ) -> Result<AuthenticityReport, TransportError> {
        // ThreadRng 不是 Send，不能跨 await 持有
        let labeled = shuffled(real, generated, &mut rand::thread_rng());
        self.judge_all(labeled).await
    }

    /// 使用给定随机数源打乱顺序，便于复现
    ///
    /// # 参数
    /// - `real`: 真题
    /// - `generated`: 生成题
    /// - `rng`: 打乱顺序用的随机数源
    ///
    /// # 返回
    /// 按打乱后顺序排列的预测和汇总；任一次调用出现传输错误即整体失败
    pub async fn evaluate_with_rng<R: Rng + ?Sized>(
        &self,
        real: &[QuestionRecord],
        generated: &[QuestionRecord],
        rng: &mut R,
    ) -> Result<AuthenticityReport, TransportError> {
        let labeled = shuffled(real, generated, rng);
        self.judge_all(labeled).await
    }

    async fn judge_all(&self, labeled: Vec<LabeledRecord>) -> Result<AuthenticityReport, TransportError> {
        let total = labeled.len();
        info!("🔍 开始真伪鉴别，共 {} 道题", total);

        let mut predictions = Vec::with_capacity(total);
        for (idx, item) in labeled.into_iter().enumerate() {
            debug!("鉴别第 {}/{} 道题", idx + 1, total);
            let predicted_real = self.judge.predict_is_real(&item.record).await?;
            predictions.push(AuthenticityPrediction::new(item.id, item.is_real, predicted_real));
        }

        let report = AuthenticityReport::from_predictions(predictions);
        info!(
            "✅ 真伪鉴别完成: {}/{} 判断正确",
            report.summary.correct_predictions, report.summary.total_questions
        );
        Ok(report)
    }
}

fn shuffled<R: Rng + ?Sized>(
    real: &[QuestionRecord],
    generated: &[QuestionRecord],
    rng: &mut R,
) -> Vec<LabeledRecord> {
    let mut labeled = label_records(real, generated);
    labeled.shuffle(rng);
    labeled
}
