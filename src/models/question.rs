//! 题目实体
//!
//! 所有来源（模型输出、文件加载、测试数据）构造的 `Question` 都必须经过
//! [`Question::new`] 校验，构造完成后不可修改。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::record::QuestionRecord;

/// 选项标签，按显示顺序排列
pub const CHOICE_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// 单道四选一数学题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    id: String,
    question: String,
    choices: BTreeMap<String, String>,
    answer: String,
}

impl Question {
    /// 创建并校验题目
    ///
    /// # 参数
    /// - `id`: 题目ID，为 `None` 时生成 UUID
    /// - `question`: 题干
    /// - `choices`: 选项标签到选项内容的映射
    /// - `answer`: 正确答案标签
    ///
    /// # 返回
    /// 按 数量 → 标签 → 答案 的顺序校验，返回第一个不满足的规则
    pub fn new(
        id: Option<String>,
        question: impl Into<String>,
        choices: BTreeMap<String, String>,
        answer: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let answer = answer.into();

        if choices.len() != CHOICE_LABELS.len() {
            return Err(ValidationError::InvalidChoiceCount {
                count: choices.len(),
            });
        }

        if !choices.keys().map(String::as_str).eq(CHOICE_LABELS) {
            return Err(ValidationError::InvalidChoiceLabels {
                labels: choices.keys().cloned().collect(),
            });
        }

        if !choices.contains_key(&answer) {
            return Err(ValidationError::AnswerNotInChoices { answer });
        }

        Ok(Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            question: question.into(),
            choices,
            answer,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn choices(&self) -> &BTreeMap<String, String> {
        &self.choices
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// 用于显示的题目文本
    ///
    /// 题干、空行，然后按标签顺序输出 `A) ...` 到 `D) ...`
    pub fn format_for_display(&self) -> String {
        let mut lines = vec![self.question.clone(), String::new()];
        // BTreeMap 按键排序，与插入顺序无关
        for (label, text) in &self.choices {
            lines.push(format!("{}) {}", label, text));
        }
        lines.join("\n")
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = ValidationError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(record.id, record.question, record.choices, record.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn abcd() -> BTreeMap<String, String> {
        choices(&[("A", "3"), ("B", "5"), ("C", "7"), ("D", "15")])
    }

    #[test]
    fn test_valid_question_keeps_answer() {
        for answer in CHOICE_LABELS {
            let q = Question::new(None, "If 3x+7=22, what is x?", abcd(), answer).unwrap();
            assert_eq!(q.answer(), answer);
            assert_eq!(q.choices().len(), 4);
        }
    }

    #[test]
    fn test_generates_id_when_absent() {
        let a = Question::new(None, "q", abcd(), "A").unwrap();
        let b = Question::new(None, "q", abcd(), "A").unwrap();
        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());

        let c = Question::new(Some("sat-001".to_string()), "q", abcd(), "A").unwrap();
        assert_eq!(c.id(), "sat-001");
    }

    #[test]
    fn test_wrong_choice_count() {
        let three = choices(&[("A", "1"), ("B", "2"), ("C", "3")]);
        assert_eq!(
            Question::new(None, "q", three, "A").unwrap_err(),
            ValidationError::InvalidChoiceCount { count: 3 }
        );

        let five = choices(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")]);
        assert_eq!(
            Question::new(None, "q", five, "A").unwrap_err(),
            ValidationError::InvalidChoiceCount { count: 5 }
        );
    }

    #[test]
    fn test_wrong_choice_labels() {
        let lower = choices(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        assert!(matches!(
            Question::new(None, "q", lower, "a").unwrap_err(),
            ValidationError::InvalidChoiceLabels { .. }
        ));

        let shifted = choices(&[("A", "1"), ("B", "2"), ("C", "3"), ("E", "4")]);
        assert_eq!(
            Question::new(None, "q", shifted, "A").unwrap_err(),
            ValidationError::InvalidChoiceLabels {
                labels: vec!["A".into(), "B".into(), "C".into(), "E".into()]
            }
        );
    }

    #[test]
    fn test_answer_not_in_choices() {
        assert_eq!(
            Question::new(None, "q", abcd(), "E").unwrap_err(),
            ValidationError::AnswerNotInChoices {
                answer: "E".to_string()
            }
        );
        // 答案按原样比较
        assert!(Question::new(None, "q", abcd(), "b").is_err());
        assert!(Question::new(None, "q", abcd(), " B").is_err());
    }

    #[test]
    fn test_count_checked_before_labels_and_answer() {
        let bad = choices(&[("X", "1"), ("Y", "2")]);
        assert_eq!(
            Question::new(None, "q", bad, "Z").unwrap_err(),
            ValidationError::InvalidChoiceCount { count: 2 }
        );
    }

    #[test]
    fn test_format_for_display_example() {
        let q = Question::new(None, "If 3x+7=22, what is x?", abcd(), "B").unwrap();
        assert_eq!(
            q.format_for_display(),
            "If 3x+7=22, what is x?\n\nA) 3\nB) 5\nC) 7\nD) 15"
        );
    }

    #[test]
    fn test_display_order_ignores_insertion_order() {
        let mut reversed = BTreeMap::new();
        for (k, v) in [("D", "d"), ("C", "c"), ("B", "b"), ("A", "a")] {
            reversed.insert(k.to_string(), v.to_string());
        }
        let q = Question::new(None, "q", reversed, "C").unwrap();
        let formatted = q.format_for_display();
        let lines: Vec<&str> = formatted.lines().skip(2).collect();
        assert_eq!(lines, vec!["A) a", "B) b", "C) c", "D) d"]);
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let ok: Question = serde_json::from_str(
            r#"{"question": "If 3x+7=22, what is x?", "choices": {"C":"7","A":"3","D":"15","B":"5"}, "answer":"B"}"#,
        )
        .unwrap();
        assert_eq!(ok.answer(), "B");

        let bad = serde_json::from_str::<Question>(
            r#"{"question": "q", "choices": {"A":"1","B":"2","C":"3","D":"4"}, "answer":"F"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_uses_canonical_field_names() {
        let q = Question::new(Some("q1".into()), "q", abcd(), "D").unwrap();
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["id"], "q1");
        assert_eq!(value["question"], "q");
        assert_eq!(value["answer"], "D");
        assert_eq!(value["choices"]["B"], "5");
    }
}
