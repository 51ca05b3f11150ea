//! LLM 服务 - 业务能力层
//!
//! 只负责"发一条提示词、拿回文本"的能力，不关心提示词内容和结果解析
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartText,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TransportError;

/// 随用户消息一起发送的文件（如 PDF）
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FileAttachment {
    pub fn pdf(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: "application/pdf".to_string(),
            data,
        }
    }

    /// `data:<mime>;base64,<内容>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

// 文件内容可能很大，调试输出只给长度
impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// 单次模型调用的请求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub user_message: String,
    pub system_message: Option<String>,
    pub attachments: Vec<FileAttachment>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user_message: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            user_message: user_message.into(),
            system_message: None,
            attachments: Vec::new(),
            max_tokens,
            temperature,
        }
    }

    pub fn with_system(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_attachment(mut self, attachment: FileAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// 模型调用能力
///
/// 传输层错误（网络 / 鉴权 / 限流）原样返回，不做重试
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, TransportError>;

    fn model_name(&self) -> &str;
}

/// 基于 OpenAI 兼容接口的 LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_messages(
        request: &CompletionRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, TransportError> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = request.system_message.as_deref() {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| TransportError::RequestBuild {
                    source: Box::new(e),
                })?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 有附件时使用多部分内容：文本 + 文件
        let content = if request.attachments.is_empty() {
            ChatCompletionRequestUserMessageContent::Text(request.user_message.clone())
        } else {
            let mut content_parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: request.user_message.clone(),
                },
            )];
            for attachment in &request.attachments {
                content_parts.push(Self::file_part(attachment)?);
            }
            debug!("用户消息包含 {} 个文件", request.attachments.len());
            ChatCompletionRequestUserMessageContent::Array(content_parts)
        };

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| TransportError::RequestBuild {
                source: Box::new(e),
            })?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }

    /// 构建 `{"type": "file", "file": {...}}` 内容块
    ///
    /// `FileObject` 没有公开字段和构建器，只能经由其 JSON 形状构造
    fn file_part(
        attachment: &FileAttachment,
    ) -> Result<ChatCompletionRequestUserMessageContentPart, TransportError> {
        let part = serde_json::json!({
            "type": "file",
            "file": {
                "filename": attachment.filename,
                "file_data": attachment.to_data_url(),
            }
        });
        serde_json::from_value(part).map_err(|e| TransportError::RequestBuild {
            source: Box::new(e),
        })
    }
}

#[async_trait]
impl LanguageModel for LlmService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, TransportError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let messages = Self::build_messages(request)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| TransportError::RequestBuild {
                source: Box::new(e),
            })?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                TransportError::api_call_failed(&self.model_name, e)
            })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| TransportError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
