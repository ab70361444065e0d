pub mod answer;
pub mod error;
pub mod filename;
pub mod gemini;
pub mod ingest;
pub mod object_store;
pub mod staging;
pub mod subject_resolver;
pub mod summarizer;

pub use answer::AnswerGenerator;
pub use error::ServiceError;
pub use gemini::GeminiClient;
pub use ingest::{IngestError, IngestOutcome, IngestPipeline};
pub use object_store::{ObjectStore, SupabaseStorage};
pub use subject_resolver::SubjectResolver;
pub use summarizer::ContentSummarizer;
