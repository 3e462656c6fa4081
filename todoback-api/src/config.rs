/// Configuration management for the API server
///
/// Configuration is read once at startup and passed down explicitly; nothing
/// in the server reads the environment after `main` has built [`Config`].
///
/// `configs/app.env` and `.env` are loaded into the process environment if
/// they exist, then the `config` crate reads these variables:
///
/// - `APP_HOST`: Host to bind to (default: 0.0.0.0)
/// - `APP_PORT`: Port to bind to (default: 8080)
/// - `SECRET`: Session token signing secret (required, at least 32 characters)
/// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`: PostgreSQL
///   connection parameters
/// - `DATABASE_URL`: Full connection string, overrides the `DB_*` parameters
/// - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
/// - `RUST_LOG`: Log filter (read by `main`, not by this module)
///
/// # Example
///
/// ```no_run
/// use todoback_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::Deserialize;
use todoback_shared::db::pool::PoolConfig;

/// Minimum accepted length of the signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,

    /// Connection string that replaces the individual parameters
    pub url_override: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Whether to apply migrations at startup
    pub run_migrations: bool,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for session token signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Flat view of the environment, as the `config` crate sees it
#[derive(Debug, Deserialize)]
struct EnvSettings {
    app_host: String,
    app_port: u16,
    secret: Option<String>,
    db_host: String,
    db_port: u16,
    db_user: String,
    db_password: String,
    db_name: String,
    database_url: Option<String>,
    db_max_connections: u32,
    run_migrations: bool,
}

impl Config {
    /// Loads configuration from env files and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET` is missing or too short, or if a variable
    /// has a value of the wrong type (e.g. a non-numeric `APP_PORT`).
    pub fn from_env() -> anyhow::Result<Self> {
        // Both files are optional
        dotenvy::from_filename("configs/app.env").ok();
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Self::from_settings(settings)
    }

    /// Builds configuration from an already assembled `config` source
    ///
    /// Keys are the lower-cased variable names (`app_port`, `db_host`, ...).
    pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("app_host", "0.0.0.0")?
            .set_default("app_port", 8080)?
            .set_default("db_host", "localhost")?
            .set_default("db_port", 5432)?
            .set_default("db_user", "postgres")?
            .set_default("db_password", "")?
            .set_default("db_name", "todoback")?
            .set_default("db_max_connections", 10)?
            .set_default("run_migrations", true)?
            .add_source(settings)
            .build()?;

        let env: EnvSettings = settings.try_deserialize()?;

        let secret = env
            .secret
            .ok_or_else(|| anyhow::anyhow!("SECRET environment variable is required"))?;

        if secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!("SECRET must be at least {} characters long", MIN_SECRET_LENGTH);
        }

        Ok(Self {
            api: ApiConfig {
                host: env.app_host,
                port: env.app_port,
            },
            database: DatabaseConfig {
                host: env.db_host,
                port: env.db_port,
                user: env.db_user,
                password: env.db_password,
                name: env.db_name,
                url_override: env.database_url.filter(|url| !url.is_empty()),
                max_connections: env.db_max_connections,
                run_migrations: env.run_migrations,
            },
            jwt: JwtConfig { secret },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl DatabaseConfig {
    /// PostgreSQL connection string
    pub fn url(&self) -> String {
        match &self.url_override {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    /// Pool settings derived from this configuration
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.url(),
            max_connections: self.max_connections,
            ..PoolConfig::default()
        }
    }
}
