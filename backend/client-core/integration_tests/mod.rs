mod chat_tests;
mod error;
