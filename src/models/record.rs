//! 输入边界的题目记录
//!
//! 历史文件和模型输出存在两套字段名：
//! - 题干：`question` / `content`
//! - 答案：`answer` / `correct_answer`
//!
//! 在这里统一成一种形状，再交给 [`Question`] 校验，歧义不会进入实体层。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::question::Question;

/// 未经校验的题目记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "content")]
    pub question: String,
    pub choices: BTreeMap<String, String>,
    /// 部分真题文件不带答案，缺省为空串，由实体校验拦截
    #[serde(alias = "correct_answer", default)]
    pub answer: String,
}

impl From<&Question> for QuestionRecord {
    fn from(q: &Question) -> Self {
        Self {
            id: Some(q.id().to_string()),
            question: q.question().to_string(),
            choices: q.choices().clone(),
            answer: q.answer().to_string(),
        }
    }
}
