use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub openai_api_key: String,
    pub api_base: String,
    pub text_model: String,
    pub vision_model: String,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

// Keeps the API key out of startup logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("openai_api_key", &if self.openai_api_key.is_empty() { "<unset>" } else { "<set>" })
            .field("api_base", &self.api_base)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            openai_api_key: String::new(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            text_model: "gpt-4".to_string(),
            vision_model: "gpt-4o".to_string(),
            max_tokens: 1000,
            request_timeout_secs: 120,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            charts_dir: PathBuf::from("generated-charts"),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl StorageConfig {
    /// Storage rooted under `base_dir` (useful for tests and containers)
    pub fn under(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            upload_dir: base_dir.join("uploads"),
            charts_dir: base_dir.join("generated-charts"),
            public_dir: base_dir.join("public"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LLMConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig::default();
        let llm = LLMConfig::default();
        let storage = StorageConfig::default();

        Ok(Self {
            server: ServerConfig {
                port: match env::var("PORT") {
                    Ok(port) => port.parse()?,
                    Err(_) => server.port,
                },
                host: env::var("HOST").unwrap_or(server.host),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(server.cors_allowed_origins),
                max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                    Ok(limit) => limit.parse()?,
                    Err(_) => server.max_upload_bytes,
                },
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or(llm.provider),
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: env::var("OPENAI_API_BASE").unwrap_or(llm.api_base),
                text_model: env::var("OPENAI_TEXT_MODEL").unwrap_or(llm.text_model),
                vision_model: env::var("OPENAI_VISION_MODEL").unwrap_or(llm.vision_model),
                max_tokens: match env::var("LLM_MAX_TOKENS") {
                    Ok(tokens) => tokens.parse()?,
                    Err(_) => llm.max_tokens,
                },
                request_timeout_secs: match env::var("LLM_TIMEOUT_SECS") {
                    Ok(secs) => secs.parse()?,
                    Err(_) => llm.request_timeout_secs,
                },
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(storage.upload_dir),
                charts_dir: env::var("CHARTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(storage.charts_dir),
                public_dir: env::var("PUBLIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(storage.public_dir),
            },
        })
    }
}
