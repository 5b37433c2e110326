//! Integration tests for sql-quizzer.

pub mod executor_test;
pub mod grading_test;
pub mod quiz_test;
pub mod session_test;
