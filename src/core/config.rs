use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) database_host: String,
    pub(crate) database_port: u16,
    pub(crate) database_name: String,
    pub(crate) database_user: String,
    pub(crate) database_password: String,
    pub(crate) log_level: String,
    pub(crate) port: u16,
    pub(crate) secret: String,
    pub(crate) store_timeout_ms: u64,
    pub(crate) max_connections: u32,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("database_host", &self.database_host)
            .field("database_port", &self.database_port)
            .field("database_name", &self.database_name)
            .field("database_user", &self.database_user)
            .field("log_level", &self.log_level)
            .field("port", &self.port)
            .field("store_timeout_ms", &self.store_timeout_ms)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

impl Args {
    pub(crate) fn database_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    pub(crate) fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

pub(crate) fn load() -> Result<Args, config::ConfigError> {
    config::Config::builder()
        .set_default("database_port", 5432)?
        .set_default("log_level", "info")?
        .set_default("port", 8080)?
        .set_default("store_timeout_ms", 5000)?
        .set_default("max_connections", 5)?
        .add_source(config::Environment::with_prefix("MUSICVIBE"))
        .build()?
        .try_deserialize::<Args>()
}
