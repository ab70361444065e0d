use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub supabase: SupabaseConfig,
    pub gemini: GeminiConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    /// Overall limit on any outbound HTTP request
    pub http_timeout_secs: u64,
}

impl ApiConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared HS256 secret of the identity provider that issues access tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(skip_serializing)]
    pub service_key: String,
    pub storage_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Limit on one grounded-answer call
    pub answer_timeout_secs: u64,
}

impl GeminiConfig {
    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.answer_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub staging_dir: PathBuf,
    pub lookup_timeout_secs: u64,
    pub summarize_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub persist_timeout_secs: u64,
}

impl IngestConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn summarize_timeout(&self) -> Duration {
        Duration::from_secs(self.summarize_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_secs(self.persist_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    /// Preset defaults for `environment`, without reading the process environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    /// Names of required settings that are still empty after loading
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.database.url.is_empty() {
            missing.push("DATABASE_URL");
        }
        if self.security.jwt_secret.is_empty() {
            missing.push("SUPABASE_JWT_SECRET");
        }
        if self.supabase.url.is_empty() {
            missing.push("SUPABASE_URL");
        }
        if self.supabase.service_key.is_empty() {
            missing.push("SUPABASE_KEY");
        }
        if self.gemini.api_key.is_empty() {
            missing.push("GOOGLE_API_KEY");
        }
        missing
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(v) = env::var("ACADEMIC_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_HTTP_TIMEOUT_SECS") {
            self.api.http_timeout_secs = v.parse().unwrap_or(self.api.http_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Supabase overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.supabase.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SUPABASE_KEY") {
            self.supabase.service_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_STORAGE_BUCKET") {
            self.supabase.storage_bucket = v;
        }

        // Gemini overrides
        if let Ok(v) = env::var("GOOGLE_API_KEY") {
            self.gemini.api_key = v;
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.gemini.model = v;
        }
        if let Ok(v) = env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("GEMINI_ANSWER_TIMEOUT_SECS") {
            self.gemini.answer_timeout_secs = v.parse().unwrap_or(self.gemini.answer_timeout_secs);
        }

        // Ingest overrides
        if let Ok(v) = env::var("INGEST_STAGING_DIR") {
            self.ingest.staging_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("INGEST_LOOKUP_TIMEOUT_SECS") {
            self.ingest.lookup_timeout_secs = v.parse().unwrap_or(self.ingest.lookup_timeout_secs);
        }
        if let Ok(v) = env::var("INGEST_SUMMARIZE_TIMEOUT_SECS") {
            self.ingest.summarize_timeout_secs = v.parse().unwrap_or(self.ingest.summarize_timeout_secs);
        }
        if let Ok(v) = env::var("INGEST_UPLOAD_TIMEOUT_SECS") {
            self.ingest.upload_timeout_secs = v.parse().unwrap_or(self.ingest.upload_timeout_secs);
        }
        if let Ok(v) = env::var("INGEST_PERSIST_TIMEOUT_SECS") {
            self.ingest.persist_timeout_secs = v.parse().unwrap_or(self.ingest.persist_timeout_secs);
        }

        self
    }

    fn base() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 8000,
                enable_request_logging: true,
                max_request_size_bytes: 20 * 1024 * 1024, // 20MB
                http_timeout_secs: 180,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            supabase: SupabaseConfig {
                url: String::new(),
                service_key: String::new(),
                storage_bucket: "documentos".to_string(),
            },
            gemini: GeminiConfig {
                api_key: String::new(),
                model: "gemini-2.0-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                answer_timeout_secs: 60,
            },
            ingest: IngestConfig {
                staging_dir: env::temp_dir().join("academic-api-uploads"),
                lookup_timeout_secs: 10,
                summarize_timeout_secs: 120,
                upload_timeout_secs: 60,
                persist_timeout_secs: 10,
            },
        }
    }

    fn development() -> Self {
        Self::base()
    }

    fn staging() -> Self {
        let mut config = Self::base();
        config.environment = Environment::Staging;
        config.api.max_request_size_bytes = 10 * 1024 * 1024; // 10MB
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    fn production() -> Self {
        let mut config = Self::base();
        config.environment = Environment::Production;
        config.api.enable_request_logging = false;
        config.api.max_request_size_bytes = 10 * 1024 * 1024; // 10MB
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config.ingest.summarize_timeout_secs = 90;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
