//! 提示词构造
//!
//! 纯函数，只拼接字符串，不发起调用

pub mod evaluation;
pub mod extraction;
pub mod generation;

pub use evaluation::{build_accuracy_prompt, build_authenticity_prompt, ACCURACY_SYSTEM_PROMPT};
pub use extraction::EXTRACTION_PROMPT;
pub use generation::{
    build_batch_generation_prompt, build_single_generation_prompt, GENERATION_SYSTEM_PROMPT,
    TOPIC_POOL,
};
