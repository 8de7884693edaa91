pub mod kind;
pub mod response;

pub use kind::ResponseKind;
pub use response::{
    CodeContent, Flashcard, ProgressContent, QuizQuestion, Resource, ResourceCategory,
    ResourceContent, SchemaViolation, StructuredResponse, SummaryContent, TopicProgress,
};
