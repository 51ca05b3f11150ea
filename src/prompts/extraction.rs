/// 从 SAT 练习 PDF 中抽取题目的提示词，随 PDF 文件一起发送
pub const EXTRACTION_PROMPT: &str = r#"Please analyze the attached SAT math practice PDF and extract its questions into JSON.

Work through the document one question at a time (each question usually starts on a new page):
1. Skip any question that needs a graph, figure, table or diagram to be understood or solved.
2. Keep only text-based questions whose arithmetic uses plain numbers and basic operations. Do not use unicode escape sequences.
3. For every question you keep, copy the question ID if one is printed, the complete question text, and all four answer choices.
4. If a kept question has no printed choices, solve it, verify the answer, then write three choices you have checked to be wrong and use them with the correct answer as choices A to D.
5. Record the letter of the correct choice.

Respond with a single JSON array and keep every string value on a single line:
[
    {
        "id": "question-id-if-printed",
        "question": "Complete question text here",
        "choices": {
            "A": "First choice",
            "B": "Second choice",
            "C": "Third choice",
            "D": "Fourth choice"
        },
        "answer": "B"
    }
]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_asks_for_array_of_records() {
        assert!(EXTRACTION_PROMPT.contains("JSON array"));
        for key in ["\"question\"", "\"choices\"", "\"answer\""] {
            assert!(EXTRACTION_PROMPT.contains(key), "missing {}", key);
        }
        assert!(EXTRACTION_PROMPT.contains("graph, figure, table or diagram"));
    }
}
