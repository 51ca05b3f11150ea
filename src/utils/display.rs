//! 终端展示
//!
//! 面向用户的输出走 stdout，日志经 tracing 走 stderr；这里只负责拼字符串。

use crate::models::evaluation::{AuthenticityReport, EvaluationResult, SubsetSummary};
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use crate::models::report::{QuestionEntry, RunSummary};
use crate::utils::logging::truncate_text;

/// 分节标题
pub fn section_header(title: &str) -> String {
    format!("{}\n{}\n{}", "=".repeat(60), title, "=".repeat(60))
}

/// 单道题的展示块
///
/// # 参数
/// - `question`: 题目
/// - `index`: 序号（从 1 开始）
/// - `total`: 题目总数
pub fn render_question(question: &Question, index: usize, total: usize) -> String {
    format!(
        "Question {}/{}\n{}\n\n{}\nAnswer: {}",
        index,
        total,
        "─".repeat(60),
        question.format_for_display(),
        question.answer()
    )
}

pub fn render_evaluation(evaluation: &EvaluationResult) -> String {
    let verdict = if evaluation.correct { "✅ Accurate" } else { "❌ Inaccurate" };
    let mut out = format!("Evaluation: {}", verdict);
    if !evaluation.explanation.is_empty() {
        out.push_str(&format!("\nExplanation: {}", evaluation.explanation));
    }
    if let Some(steps) = evaluation.solution_steps.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("\nSolution: {}", steps));
    }
    out
}

/// 题目加可选评估结论
pub fn render_entry(entry: &QuestionEntry, index: usize, total: usize) -> String {
    let mut out = render_question(&entry.question, index, total);
    if let Some(evaluation) = &entry.evaluation {
        out.push_str("\n\n");
        out.push_str(&render_evaluation(evaluation));
    }
    out
}

pub fn render_run_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        section_header("Summary"),
        format!("Total questions: {}", summary.total),
    ];
    if let (Some(accurate), Some(rate)) = (summary.accurate, summary.accuracy_rate) {
        lines.push(format!("Accurate: {}/{}", accurate, summary.total));
        lines.push(format!("Accuracy rate: {:.1}%", rate * 100.0));
    }
    lines.push(format!("Generated at: {}", summary.generated_at));
    lines.join("\n")
}

fn render_subset(name: &str, subset: &SubsetSummary) -> String {
    format!(
        "{}: {}/{} correctly identified ({:.1}%)",
        name,
        subset.correctly_identified,
        subset.count,
        subset.accuracy * 100.0
    )
}

pub fn render_authenticity_report(report: &AuthenticityReport) -> String {
    let summary = &report.summary;
    [
        section_header("Authenticity Evaluation"),
        format!(
            "Overall: {}/{} correct ({:.1}%)",
            summary.correct_predictions, summary.total_questions, summary.accuracy_percentage
        ),
        render_subset("Real questions", &summary.real_questions),
        render_subset("Generated questions", &summary.generated_questions),
        "Lower accuracy means generated questions are harder to tell apart from real ones.".to_string(),
    ]
    .join("\n")
}

/// 抽取结果：每道题只显示题干前 100 个字符
pub fn render_extracted(records: &[QuestionRecord]) -> String {
    let mut lines = vec![section_header(&format!("Extracted {} questions", records.len()))];
    for (idx, record) in records.iter().enumerate() {
        lines.push(format!("Question {}: {}", idx + 1, truncate_text(&record.question, 100)));
        if !record.answer.is_empty() {
            lines.push(format!("Correct answer: {}", record.answer));
        }
    }
    lines.join("\n")
}
