// Session lifecycle: profile collection, chat intents, in-memory storage and the
// anonymized export/submission log.

pub mod anonymize;
pub mod chat;
pub mod export;
pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;
