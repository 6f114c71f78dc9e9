pub mod quiz_session;

pub use quiz_session::{select_questions, CheckOutcome, QuizSession, Step};
