// Catalog access and search
pub mod catalog_store;
pub mod search;

// Conversation pipeline
pub mod auto_reply;
pub mod chat;
pub mod completion;
pub mod prompt;
