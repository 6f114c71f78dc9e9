pub mod library;
pub mod question;

pub use library::{QuizMode, SavedFile, TestHistory};
pub use question::{Answer, Question};
