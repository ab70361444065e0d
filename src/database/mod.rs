pub mod knowledge_base;
pub mod manager;
pub mod subjects;

pub use knowledge_base::{KnowledgeBaseStore, PgKnowledgeBase};
pub use manager::{DatabaseError, DatabaseManager};
pub use subjects::PgSubjectResolver;
