use crate::error::FileError;
use crate::models::question::Question;
use crate::models::record::QuestionRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// 把 JSON 值规整为题目记录列表
///
/// 接受三种形状：
/// - 题目数组
/// - 带 `questions`（或 `results`）键的对象
/// - 单个题目对象
pub fn parse_question_records(value: Value, path: &str) -> Result<Vec<QuestionRecord>, FileError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match map.remove("questions").or_else(|| map.remove("results")) {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(FileError::UnsupportedShape {
                        path: path.to_string(),
                        detail: format!("questions 字段应为数组，实际为 {}", json_kind(&other)),
                    })
                }
                None => vec![Value::Object(map)],
            }
        }
        other => {
            return Err(FileError::UnsupportedShape {
                path: path.to_string(),
                detail: format!("顶层应为数组或对象，实际为 {}", json_kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|source| FileError::JsonParseFailed {
                path: path.to_string(),
                source,
            })
        })
        .collect()
}

/// 从文件加载题目记录（不做实体校验，真题文件用）
pub async fn load_question_records(path: &Path) -> Result<Vec<QuestionRecord>> {
    let path_str = path.display().to_string();

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let value: Value =
        serde_json::from_str(&content).map_err(|source| FileError::JsonParseFailed {
            path: path_str.clone(),
            source,
        })?;

    let records = parse_question_records(value, &path_str)?;
    tracing::info!("成功加载 {} 个题目记录: {}", records.len(), path_str);

    Ok(records)
}

/// 从文件加载并校验题目
///
/// 任意一道题校验失败即返回错误，错误信息包含题号
pub async fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let records = load_question_records(path).await?;

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            Question::try_from(record)
                .with_context(|| format!("{} 中第 {} 道题校验失败", path.display(), idx + 1))
        })
        .collect()
}

/// 以格式化 JSON 写入文件，必要时创建父目录
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let path_str = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: path_str.clone(),
                source,
            })?;
    }

    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("无法序列化输出: {}", path_str))?;

    fs::write(path, json)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path_str.clone(),
            source,
        })?;

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(text_key: &str, answer_key: &str) -> Value {
        json!({
            text_key: "If 3x+7=22, what is x?",
            "choices": {"A": "3", "B": "5", "C": "7", "D": "15"},
            answer_key: "B"
        })
    }

    #[test]
    fn test_accepts_bare_array() {
        let records =
            parse_question_records(json!([sample("question", "answer"), sample("content", "correct_answer")]), "mem")
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_accepts_questions_wrapper_with_extra_fields() {
        let mut entry = sample("question", "answer");
        entry["evaluation"] = json!({"correct": true, "explanation": ""});
        let value = json!({"questions": [entry], "summary": {"total": 1}});

        let records = parse_question_records(value, "mem").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer, "B");
    }

    #[test]
    fn test_accepts_results_wrapper() {
        let value = json!({"results": [sample("content", "answer")], "summary": {}});
        assert_eq!(parse_question_records(value, "mem").unwrap().len(), 1);
    }

    #[test]
    fn test_accepts_single_object() {
        let records = parse_question_records(sample("content", "correct_answer"), "mem").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "If 3x+7=22, what is x?");
    }

    #[test]
    fn test_rejects_scalars() {
        assert!(matches!(
            parse_question_records(json!("nope"), "mem"),
            Err(FileError::UnsupportedShape { .. })
        ));
        assert!(matches!(
            parse_question_records(json!({"questions": 3}), "mem"),
            Err(FileError::UnsupportedShape { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_load_questions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("questions.json");

        save_json(&path, &json!({"questions": [sample("question", "answer")]}))
            .await
            .unwrap();

        let questions = load_questions(&path).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer(), "B");
    }

    #[tokio::test]
    async fn test_load_reports_invalid_question_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut bad = sample("question", "answer");
        bad["answer"] = json!("Z");
        save_json(&path, &json!([sample("question", "answer"), bad]))
            .await
            .unwrap();

        let err = load_questions(&path).await.unwrap_err();
        assert!(format!("{:#}", err).contains("第 2 道题"));
    }

    #[tokio::test]
    async fn test_malformed_file_error_names_path() {
        let _ = tracing_subscriber::fmt().with_writer(std::io::sink).try_init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{\"question\": ").await.unwrap();

        let err = load_question_records(&path).await.unwrap_err();
        match err.downcast_ref::<FileError>() {
            Some(FileError::JsonParseFailed { path: reported, .. }) => {
                assert!(reported.ends_with("broken.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let good = dir.path().join("good.json");
        save_json(&good, &json!([sample("question", "answer")])).await.unwrap();
        assert_eq!(load_question_records(&good).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_question_records(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FileError>(),
            Some(FileError::NotFound { .. })
        ));
    }
}
