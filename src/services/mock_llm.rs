//! 脚本化的模型实现
//!
//! 按顺序返回预置的回复并记录每次请求，用于在没有网络的情况下驱动生成和评估流程

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::TransportError;
use crate::services::llm_service::{CompletionRequest, LanguageModel};

const MOCK_MODEL_NAME: &str = "mock-llm";

/// 脚本化模型
#[derive(Debug, Default)]
pub struct MockLlm {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条成功回复
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// 追加一次传输失败
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    pub fn push_response(&self, text: impl Into<String>) {
        self.push(Ok(text.into()));
    }

    /// 到目前为止收到的请求
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, entry: Result<String, String>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(entry);
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(TransportError::api_call_failed(MOCK_MODEL_NAME, message)),
            None => Err(TransportError::EmptyContent {
                model: MOCK_MODEL_NAME.to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL_NAME
    }
}
