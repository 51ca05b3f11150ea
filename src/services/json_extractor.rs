//! JSON 提取服务 - 业务能力层
//!
//! 模型被要求在回复中嵌入 JSON，但常常会在前后加说明文字、markdown 代码块，
//! 或在字符串值里直接换行导致 JSON 语法错误。这里负责把 JSON 值找回来。
//!
//! 默认实现 [`DelimiterExtractor`] 分两步：
//! 1. 取第一个开分隔符到最后一个闭分隔符之间的片段
//! 2. 把 `"key": "..."` 字符串值内的裸换行替换为空格，再严格解析
//!
//! 已知限制：分隔符扫描不理解字符串内容，外层片段以外的字符串里出现同类括号时
//! 可能多截或少截。调用方只依赖 [`JsonExtractor`] trait，可替换为更严格的实现。

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

use crate::error::ParseError;

/// 期望的顶层 JSON 形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    /// (开分隔符, 闭分隔符)
    pub fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonShape::Object => write!(f, "对象"),
            JsonShape::Array => write!(f, "数组"),
        }
    }
}

/// 从模型输出中提取 JSON 值
pub trait JsonExtractor: Send + Sync {
    fn extract(&self, text: &str, shape: JsonShape) -> Result<Value, ParseError>;
}

/// `"key": "...跨行..."`
static MULTILINE_STRING_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""\s*:\s*"[^"]*[\r\n][^"]*""#).expect("multiline string pattern is valid")
});

/// 基于首尾分隔符扫描的提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterExtractor;

impl DelimiterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 定位候选片段（含首尾分隔符）
    ///
    /// 找不到开分隔符、闭分隔符，或闭分隔符在开分隔符之前时返回 `None`
    pub fn locate(text: &str, shape: JsonShape) -> Option<&str> {
        let (open, close) = shape.delimiters();
        let start = text.find(open)?;
        let end = text.rfind(close)?;
        if end < start {
            return None;
        }
        Some(&text[start..=end])
    }
}

impl JsonExtractor for DelimiterExtractor {
    fn extract(&self, text: &str, shape: JsonShape) -> Result<Value, ParseError> {
        let candidate = Self::locate(text, shape).ok_or_else(|| ParseError::NoJsonFound {
            expected: shape,
            raw: text.to_string(),
        })?;

        let normalized = normalize_multiline_strings(candidate);
        if let Cow::Owned(_) = normalized {
            debug!("已规整字符串值中的换行");
        }

        serde_json::from_str(&normalized).map_err(|source| ParseError::InvalidJson {
            raw: text.to_string(),
            source,
        })
    }
}

/// 把字符串值内的裸换行替换为空格
///
/// 对已规整的文本再次调用不会产生变化
pub fn normalize_multiline_strings(json: &str) -> Cow<'_, str> {
    MULTILINE_STRING_VALUE.replace_all(json, |caps: &regex::Captures| {
        caps[0].replace(['\r', '\n'], " ")
    })
}
