//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责多题流程和命令调度，下层服务只处理单次调用。
//!
//! ## 模块划分
//!
//! ### `batch_generator` - 分批生成
//! - 把 N 道题拆成每批不超过单次上限的调用
//! - 顺序执行并按顺序拼接
//! - 中途失败时带回已完成的题目
//!
//! ### `authenticity_evaluator` - 真伪鉴别
//! - 标记来源、混合、打乱
//! - 逐题判断并汇总识别率
//!
//! ### `real_question_collector` - 真题收集
//! - 逐个 PDF 抽取题目，单个文件失败时跳过
//! - 达到数量上限后停止
//!
//! ### `app` - 应用主流程
//! - 持有模型客户端
//! - 把子命令落到上面三个模块和评估服务上
//! - 负责终端输出和结果文件
//!
//! ## 层次关系
//!
//! ```text
//! app (处理子命令)
//!     ↓
//! batch_generator / authenticity_evaluator / real_question_collector
//!     ↓
//! services (能力层：generate / evaluate / judge / extract)
//!     ↓
//! LanguageModel (LlmService / MockLlm)
//! ```

pub mod app;
pub mod authenticity_evaluator;
pub mod batch_generator;
pub mod real_question_collector;

// 重新导出主要类型
pub use app::{App, OnEvaluationError};
pub use authenticity_evaluator::AuthenticityEvaluator;
pub use batch_generator::{plan_chunks, BatchGenerator};
pub use real_question_collector::{RealQuestionCollector, DEFAULT_REAL_QUESTION_LIMIT};
