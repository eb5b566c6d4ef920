#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub marketplace_id: i64,
    pub marketplace_name: String,
    pub bridge_host: String,
    pub bridge_login: String,
    pub bridge_password: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub max_concurrent_products: usize,
    pub product_type_marker: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("marketplace_id", &self.marketplace_id)
            .field("marketplace_name", &self.marketplace_name)
            .field("bridge_host", &self.bridge_host)
            .field("bridge_login", &self.bridge_login)
            .field("bridge_password", &"[redacted]")
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("max_concurrent_products", &self.max_concurrent_products)
            .field("product_type_marker", &self.product_type_marker)
            .finish()
    }
}
