use serde_json::json;

/// 出题范围
pub const TOPIC_POOL: [&str; 6] = [
    "linear equations",
    "quadratics",
    "systems of equations",
    "functions",
    "word problems",
    "basic statistics",
];

pub const GENERATION_SYSTEM_PROMPT: &str = r#"You are an expert SAT math question generator. Generate high-quality, text-only SAT math questions that are indistinguishable from official College Board content.

Rules:
1. Create standard 4-option multiple choice questions (A, B, C, D)
2. Focus on the topics you are given
3. Ensure mathematical accuracy - the correct answer must be verifiable
4. Match SAT style and difficulty level
5. Use clear, concise language
6. Avoid complex formatting or special symbols beyond basic math notation
7. Keep every string value on a single line

Each question must be a JSON object with exactly this shape:
{
    "question": "The question text here",
    "choices": {
        "A": "first choice",
        "B": "second choice",
        "C": "third choice",
        "D": "fourth choice"
    },
    "answer": "B"
}
"#;

/// 少样本示例：(题干, [A, B, C, D], 答案)
const FEW_SHOT_EXAMPLES: [(&str, [&str; 4], &str); 3] = [
    (
        "If 3x + 7 = 22, what is the value of x?",
        ["3", "5", "7", "15"],
        "B",
    ),
    (
        "A store offers a 20% discount on all items. If the discounted price of a jacket is $64, what was the original price?",
        ["$51.20", "$76.80", "$80.00", "$84.00"],
        "C",
    ),
    (
        "If f(x) = 2x² - 3x + 1, what is f(2)?",
        ["1", "3", "5", "7"],
        "B",
    ),
];

fn few_shot_block() -> String {
    let mut text = String::from("Here are some example SAT questions:\n\n");
    for (i, (question, choices, answer)) in FEW_SHOT_EXAMPLES.iter().enumerate() {
        let example = json!({
            "question": question,
            "choices": {
                "A": choices[0],
                "B": choices[1],
                "C": choices[2],
                "D": choices[3],
            },
            "answer": answer,
        });
        text.push_str(&format!(
            "Example {}:\n{}\n\n",
            i + 1,
            serde_json::to_string_pretty(&example).unwrap_or_default()
        ));
    }
    text
}

/// 单道题的生成提示词，期望模型返回一个 JSON 对象
pub fn build_single_generation_prompt() -> String {
    format!(
        "{}Now generate a new SAT math question on one of these topics: {}. \
         Follow the same format. Make it unique and different from the examples. \
         Return only the JSON object.",
        few_shot_block(),
        TOPIC_POOL.join(", ")
    )
}

/// 批量生成提示词，期望模型返回一个 JSON 数组
///
/// # 参数
/// - `count`: 本次要生成的题目数量
pub fn build_batch_generation_prompt(count: usize) -> String {
    format!(
        "{}Now generate exactly {} new SAT math questions following the same format. \
         Spread them across these topics: {}. \
         Every question must be unique and different from the examples and from each other. \
         Return only a JSON array containing exactly {} question objects.",
        few_shot_block(),
        count,
        TOPIC_POOL.join(", "),
        count
    )
}
