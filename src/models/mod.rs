pub mod answer;
pub mod call_style;
pub mod document;
pub mod layout;
pub mod loaders;
pub mod matrix;
pub mod question;

pub use answer::{AnswerRecord, BulkAnswer, FailedPair};
pub use call_style::{CallStyle, SamplingParams};
pub use document::Document;
pub use layout::{ColumnAlign, ColumnSpec, ReportLayout};
pub use loaders::{load_all_pdf_documents, load_question_set, load_report_layout};
pub use matrix::{DuplicatePolicy, ResultMatrix};
pub use question::{Question, QuestionSet, QUESTION_PREFIX};
