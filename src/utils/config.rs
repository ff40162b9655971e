/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub max_content_length: usize,
    pub max_reply_depth: u32,
    pub max_comments_per_post: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "interactions-service".to_string()),
            port: env_or("SERVICE_PORT", 8004),
            mongodb_uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            max_content_length: env_or("MAX_CONTENT_LENGTH", 1000),
            max_reply_depth: env_or("MAX_REPLY_DEPTH", 5),
            max_comments_per_post: env_or("MAX_COMMENTS_PER_POST", 1000),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            service_name: "interactions-service".to_string(),
            port: 8004,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            max_content_length: 1000,
            max_reply_depth: 5,
            max_comments_per_post: 1000,
        }
    }
}
