use std::collections::BTreeMap;

use crate::models::question::Question;
use crate::models::record::QuestionRecord;

pub const ACCURACY_SYSTEM_PROMPT: &str = r#"You are a mathematics expert tasked with verifying the accuracy of SAT math questions and their answers.

Your job is to:
1. Solve the given math problem step by step
2. Check if the provided correct answer is actually correct
3. Verify that all other answer choices are incorrect
4. Return a JSON response indicating whether the question is mathematically accurate

Be extremely thorough and check your work. Consider edge cases and alternative solution methods.

Return your analysis as a JSON object with this EXACT format (ensure all string values are on a single line):
{
    "correct": true,
    "explanation": "Brief explanation of your verification on a single line",
    "solution_steps": "Step-by-step solution on a single line with steps separated by semicolons"
}
"#;

fn render_choices(choices: &BTreeMap<String, String>) -> String {
    choices
        .iter()
        .map(|(label, text)| format!("{}) {}", label, text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 准确性评估提示词：题干、四个选项和给定答案
pub fn build_accuracy_prompt(question: &Question) -> String {
    format!(
        "Please verify the following SAT math question.\n\n\
         Question:\n{}\n\n\
         Choices:\n{}\n\n\
         Stated correct answer: {}\n\n\
         Solve the problem, decide whether the stated answer is correct and \
         whether every other choice is wrong, then respond with the JSON object described above.",
        question.question(),
        render_choices(question.choices()),
        question.answer()
    )
}

/// 真伪判断提示词
///
/// 只包含题目内容，不包含来源标记
pub fn build_authenticity_prompt(record: &QuestionRecord) -> String {
    let answer_line = if record.answer.is_empty() {
        String::new()
    } else {
        format!("\n\nAnswer: {}", record.answer)
    };

    format!(
        "You are an expert on official SAT math content published by the College Board.\n\n\
         Below is a multiple-choice math question. It is either a real SAT question or one \
         generated by an AI model. Decide which.\n\n\
         Question:\n{}\n\n\
         Choices:\n{}{}\n\n\
         Consider wording, difficulty, distractor design and formatting conventions.\n\
         Respond with a JSON object on a single line in this exact format:\n\
         {{\"is_real\": true, \"reasoning\": \"short reason\"}}\n\
         Use true if you believe it is a real SAT question and false if you believe it was generated.",
        record.question,
        render_choices(&record.choices),
        answer_line
    )
}
