pub mod accuracy_evaluator;
pub mod authenticity_judge;
pub mod json_extractor;
pub mod llm_service;
pub mod mock_llm;
pub mod pdf_question_extractor;
pub mod question_generator;

pub use accuracy_evaluator::AccuracyEvaluator;
pub use authenticity_judge::AuthenticityJudge;
pub use json_extractor::{DelimiterExtractor, JsonExtractor, JsonShape};
pub use llm_service::{CompletionRequest, FileAttachment, LanguageModel, LlmService};
pub use mock_llm::MockLlm;
pub use pdf_question_extractor::PdfQuestionExtractor;
pub use question_generator::{QuestionGenerator, MAX_QUESTIONS_PER_CALL};
