pub mod layout_loader;
pub mod pdf_loader;
pub mod question_loader;

pub use layout_loader::load_report_layout;
pub use pdf_loader::{load_all_pdf_documents, load_pdf_document};
pub use question_loader::load_question_set;
