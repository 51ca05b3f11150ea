//! 评估结果数据结构

use serde::{Deserialize, Serialize};

/// 准确性评估结论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub correct: bool,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_steps: Option<String>,
}

/// 单道题的真伪判断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityPrediction {
    pub id: String,
    pub is_real: bool,
    pub predicted_real: bool,
    pub correct: bool,
}

impl AuthenticityPrediction {
    pub fn new(id: impl Into<String>, is_real: bool, predicted_real: bool) -> Self {
        Self {
            id: id.into(),
            is_real,
            predicted_real,
            correct: is_real == predicted_real,
        }
    }
}

/// 某一类题目（真题 / 生成题）的识别统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetSummary {
    pub count: usize,
    pub correctly_identified: usize,
    pub accuracy: f64,
}

impl SubsetSummary {
    fn tally<'a>(predictions: impl Iterator<Item = &'a AuthenticityPrediction>) -> Self {
        let (count, correctly_identified) = predictions.fold((0, 0), |(n, ok), p| {
            (n + 1, ok + usize::from(p.correct))
        });
        Self {
            count,
            correctly_identified,
            accuracy: ratio(correctly_identified, count),
        }
    }
}

/// 真伪识别汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticitySummary {
    pub total_questions: usize,
    pub correct_predictions: usize,
    pub accuracy_percentage: f64,
    pub real_questions: SubsetSummary,
    pub generated_questions: SubsetSummary,
}

impl AuthenticitySummary {
    /// 从逐题判断结果汇总
    ///
    /// 任一分母为 0 时对应比例记为 0
    pub fn from_predictions(predictions: &[AuthenticityPrediction]) -> Self {
        let total_questions = predictions.len();
        let correct_predictions = predictions.iter().filter(|p| p.correct).count();

        Self {
            total_questions,
            correct_predictions,
            accuracy_percentage: ratio(correct_predictions, total_questions) * 100.0,
            real_questions: SubsetSummary::tally(predictions.iter().filter(|p| p.is_real)),
            generated_questions: SubsetSummary::tally(
                predictions.iter().filter(|p| !p.is_real),
            ),
        }
    }

    /// 总体识别准确率（0..=1）
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct_predictions, self.total_questions)
    }
}

/// 真伪评估报告
///
/// 准确率越低，说明生成题越难与真题区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityReport {
    pub accuracy: f64,
    pub predictions: Vec<AuthenticityPrediction>,
    pub summary: AuthenticitySummary,
}

impl AuthenticityReport {
    pub fn from_predictions(predictions: Vec<AuthenticityPrediction>) -> Self {
        let summary = AuthenticitySummary::from_predictions(&predictions);
        Self {
            accuracy: summary.accuracy(),
            predictions,
            summary,
        }
    }
}

/// 除零时返回 0
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
