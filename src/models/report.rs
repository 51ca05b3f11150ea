//! 输出文件结构
//!
//! - 生成结果：`{"questions": [...], "summary": {...}}`
//! - 评估结果：`{"results": [...], "summary": {...}}`

use serde::Serialize;

use crate::models::evaluation::{ratio, EvaluationResult};
use crate::models::question::Question;

/// 单道题及其（可选的）评估结论
#[derive(Debug, Clone, Serialize)]
pub struct QuestionEntry {
    #[serde(flatten)]
    pub question: Question,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResult>,
}

impl QuestionEntry {
    pub fn new(question: Question, evaluation: Option<EvaluationResult>) -> Self {
        Self {
            question,
            evaluation,
        }
    }
}

/// 一次运行的统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    /// 未做评估时为 `None`
    pub accurate: Option<usize>,
    pub accuracy_rate: Option<f64>,
    pub generated_at: String,
}

impl RunSummary {
    /// 根据条目统计；`evaluated` 为 false 时不填准确率
    pub fn from_entries(entries: &[QuestionEntry], evaluated: bool) -> Self {
        let total = entries.len();
        let accurate = entries
            .iter()
            .filter(|e| e.evaluation.as_ref().is_some_and(|r| r.correct))
            .count();

        Self {
            total,
            accurate: evaluated.then_some(accurate),
            accuracy_rate: (evaluated && total > 0).then(|| ratio(accurate, total)),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 生成结果文件
#[derive(Debug, Clone, Serialize)]
pub struct QuestionsFile {
    pub questions: Vec<QuestionEntry>,
    pub summary: RunSummary,
}

impl QuestionsFile {
    pub fn new(questions: Vec<QuestionEntry>, evaluated: bool) -> Self {
        let summary = RunSummary::from_entries(&questions, evaluated);
        Self { questions, summary }
    }
}

/// 评估结果文件
#[derive(Debug, Clone, Serialize)]
pub struct ResultsFile {
    pub results: Vec<QuestionEntry>,
    pub summary: RunSummary,
}

impl ResultsFile {
    pub fn new(results: Vec<QuestionEntry>) -> Self {
        let summary = RunSummary::from_entries(&results, true);
        Self { results, summary }
    }
}
