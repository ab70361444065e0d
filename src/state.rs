use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, KnowledgeBaseStore, PgKnowledgeBase, PgSubjectResolver};
use crate::services::{
    AnswerGenerator, ContentSummarizer, GeminiClient, IngestPipeline, ObjectStore, SubjectResolver,
    SupabaseStorage,
};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<IngestPipeline>,
    pub knowledge_base: Arc<dyn KnowledgeBaseStore>,
    pub answers: Arc<dyn AnswerGenerator>,
}

/// Service handles the state is assembled from
pub struct Services {
    pub subjects: Arc<dyn SubjectResolver>,
    pub summarizer: Arc<dyn ContentSummarizer>,
    pub object_store: Arc<dyn ObjectStore>,
    pub knowledge_base: Arc<dyn KnowledgeBaseStore>,
    pub answers: Arc<dyn AnswerGenerator>,
}

impl AppState {
    pub fn new(config: AppConfig, services: Services) -> Self {
        let pipeline = IngestPipeline::new(
            services.subjects,
            services.summarizer,
            services.object_store,
            services.knowledge_base.clone(),
            config.ingest.clone(),
        );

        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            knowledge_base: services.knowledge_base,
            answers: services.answers,
        }
    }

    /// Connect to Postgres and build the production service clients
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("academic-api/", env!("CARGO_PKG_VERSION")))
            .timeout(config.api.http_timeout())
            .build()
            .context("failed to build HTTP client")?;

        let storage = SupabaseStorage::new(&config.supabase, http.clone())
            .context("invalid storage configuration")?;
        let gemini = Arc::new(GeminiClient::new(&config.gemini, http));

        let services = Services {
            subjects: Arc::new(PgSubjectResolver::new(pool.clone())),
            summarizer: gemini.clone(),
            object_store: Arc::new(storage),
            knowledge_base: Arc::new(PgKnowledgeBase::new(pool)),
            answers: gemini,
        };

        Ok(Self::new(config, services))
    }
}
