//! 错误类型
//!
//! 按来源分层：解析 / 校验 / 传输 / 分批生成 / 文件 / 配置，
//! 统一由 [`AppError`] 包装。CLI 层再用 `anyhow` 附加上下文。

use thiserror::Error;

use crate::models::question::Question;
use crate::services::json_extractor::JsonShape;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法从模型输出中提取 JSON
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 生成或抽取流程中模型回复无法解析，附带所处步骤
    #[error("模型回复解析失败（{context}）: {source}")]
    Response {
        context: String,
        #[source]
        source: ParseError,
    },
    /// 题目实体校验失败
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// LLM 调用失败（网络 / 鉴权 / 限流）
    #[error("LLM错误: {0}")]
    Transport(#[from] TransportError),
    /// 分批生成时某一批失败
    #[error(transparent)]
    ChunkFailed(Box<ChunkFailure>),
    /// 文件读写错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 响应解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 找不到成对的开闭分隔符
    #[error("响应中未找到 JSON {expected}")]
    NoJsonFound { expected: JsonShape, raw: String },
    /// 找到了候选片段，但规整后仍不是合法 JSON
    #[error("JSON解析失败: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    /// JSON 合法，但结构与预期的题目记录不符
    #[error("响应结构不符合预期 ({detail})")]
    UnexpectedStructure { detail: String, raw: String },
}

impl ParseError {
    /// 出错时的原始文本
    pub fn raw(&self) -> &str {
        match self {
            ParseError::NoJsonFound { raw, .. }
            | ParseError::InvalidJson { raw, .. }
            | ParseError::UnexpectedStructure { raw, .. } => raw,
        }
    }
}

/// 题目校验错误
///
/// 校验顺序固定：数量 → 标签 → 答案，返回第一个不满足的规则
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("选项必须恰好有 4 个，实际为 {count} 个")]
    InvalidChoiceCount { count: usize },
    #[error("选项标签必须为 A、B、C、D，实际为 {labels:?}")]
    InvalidChoiceLabels { labels: Vec<String> },
    #[error("正确答案 {answer:?} 不在选项标签中")]
    AnswerNotInChoices { answer: String },
}

/// LLM 传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuild {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 分批生成中某一批失败
///
/// `completed` 保留之前各批已生成的题目，由调用方决定是否使用
#[derive(Debug, Error)]
#[error(
    "第 {}/{} 批生成失败（此前已完成 {} 道题）: {}",
    .chunk,
    .total,
    .completed.len(),
    .source
)]
pub struct ChunkFailure {
    /// 失败批次（从 1 开始）
    pub chunk: usize,
    /// 批次总数
    pub total: usize,
    /// 此前已成功生成的题目
    pub completed: Vec<Question>,
    #[source]
    pub source: AppError,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON文件解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("文件格式不受支持 ({path}): {detail}")]
    UnsupportedShape { path: String, detail: String },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 包装分批失败
    pub fn chunk_failed(
        chunk: usize,
        total: usize,
        completed: Vec<Question>,
        source: AppError,
    ) -> Self {
        AppError::ChunkFailed(Box::new(ChunkFailure {
            chunk,
            total,
            completed,
            source,
        }))
    }
}

impl AppError {
    /// 给解析错误附加所处步骤
    pub fn response(context: impl Into<String>, source: ParseError) -> Self {
        AppError::Response {
            context: context.into(),
            source,
        }
    }
}

impl TransportError {
    /// 创建 LLM API 调用错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TransportError::ApiCallFailed {
            model: model.into(),
            source: source.into(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
