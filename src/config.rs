use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_json_payload_size: usize,
    pub development: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub rate_limit_requests: u32,
    pub rate_limit_period: u64,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub search_timeout_secs: u64,
    pub ai_timeout_secs: u64,
    pub max_search_results: usize,
    pub ai_max_tokens: u32,
    pub ai_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                workers: num_cpus::get(),
                max_json_payload_size: 1_000_000, // 1MB
                development: false,
            },
            security: SecurityConfig {
                rate_limit_requests: 10,
                rate_limit_period: 60,
                allowed_origins: vec!["*".to_string()],
            },
            upstream: UpstreamConfig {
                search_timeout_secs: 10,
                ai_timeout_secs: 30,
                max_search_results: 8,
                ai_max_tokens: 800,
                ai_temperature: 0.7,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        // Server configuration
        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port.parse()?;
        }
        if let Ok(workers) = env::var("WORKERS") {
            config.server.workers = workers.parse()?;
        }
        if let Ok(max_json_payload_size) = env::var("MAX_JSON_PAYLOAD_SIZE") {
            config.server.max_json_payload_size = max_json_payload_size.parse()?;
        }
        if let Ok(environment) = env::var("ENVIRONMENT") {
            config.server.development = environment == "development";
        }

        // Security configuration
        if let Ok(rate_limit_requests) = env::var("RATE_LIMIT_REQUESTS") {
            config.security.rate_limit_requests = rate_limit_requests.parse()?;
        }
        if let Ok(rate_limit_period) = env::var("RATE_LIMIT_PERIOD") {
            config.security.rate_limit_period = rate_limit_period.parse()?;
        }
        if let Ok(allowed_origins) = env::var("ALLOWED_ORIGINS") {
            config.security.allowed_origins = allowed_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .collect();
        }

        // Upstream configuration
        if let Ok(search_timeout_secs) = env::var("SEARCH_TIMEOUT_SECS") {
            config.upstream.search_timeout_secs = search_timeout_secs.parse()?;
        }
        if let Ok(ai_timeout_secs) = env::var("AI_TIMEOUT_SECS") {
            config.upstream.ai_timeout_secs = ai_timeout_secs.parse()?;
        }
        if let Ok(max_search_results) = env::var("MAX_SEARCH_RESULTS") {
            config.upstream.max_search_results = max_search_results.parse()?;
        }
        if let Ok(ai_max_tokens) = env::var("AI_MAX_TOKENS") {
            config.upstream.ai_max_tokens = ai_max_tokens.parse()?;
        }
        if let Ok(ai_temperature) = env::var("AI_TEMPERATURE") {
            config.upstream.ai_temperature = ai_temperature.parse()?;
        }

        Ok(config)
    }
}
