pub mod bulk_flow;
pub mod question_ctx;
pub mod question_flow;

pub use bulk_flow::{BulkFlow, BulkOutcome};
pub use question_ctx::DocumentCtx;
pub use question_flow::QuestionFlow;
