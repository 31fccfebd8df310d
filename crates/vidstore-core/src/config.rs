//! Configuration module
//!
//! Environment-sourced configuration for the API server: database settings,
//! upload policy (mime allow-list, size limit), and blob storage layout.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SERVER_PORT: u16 = 8000;
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024 * 1024;
const UPLOAD_CHUNK_SIZE: usize = 1024 * 1024;

/// Upload acceptance policy, passed into the file service at construction.
///
/// An empty `allowed_mime_types` list means no mime restriction; a
/// `max_file_size_bytes` of 0 means no size limit.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub allowed_mime_types: Vec<String>,
    pub max_file_size_bytes: u64,
}

impl UploadPolicy {
    /// Check a client-declared content type against the allow-list.
    /// Mime parameters (e.g. `; charset=...`) are ignored for the comparison.
    pub fn allows_mime(&self, content_type: &str) -> bool {
        if self.allowed_mime_types.is_empty() {
            return true;
        }
        let normalized = content_type
            .split(';')
            .next()
            .map(|s| s.trim())
            .unwrap_or(content_type)
            .to_lowercase();
        self.allowed_mime_types
            .iter()
            .any(|ct| normalized == ct.to_lowercase())
    }

    /// The size limit, if one is configured.
    pub fn size_limit(&self) -> Option<u64> {
        if self.max_file_size_bytes > 0 {
            Some(self.max_file_size_bytes)
        } else {
            None
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub allowed_mime_types: Vec<String>,
    pub max_file_size_bytes: u64,
    pub storage_dir: String,
    pub upload_chunk_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => database_url_from_parts()?,
        };

        let allowed_mime_types = env::var("ALLOWED_FILE_TYPES")
            .unwrap_or_else(|_| "video/mp4,video/mpeg".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            allowed_mime_types,
            max_file_size_bytes: env::var("MAX_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| MAX_FILE_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_FILE_SIZE_BYTES),
            storage_dir: env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage".to_string()),
            upload_chunk_size: env::var("UPLOAD_CHUNK_SIZE")
                .unwrap_or_else(|_| UPLOAD_CHUNK_SIZE.to_string())
                .parse()
                .unwrap_or(UPLOAD_CHUNK_SIZE),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.upload_chunk_size == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CHUNK_SIZE must be greater than 0"));
        }

        Ok(())
    }

    /// The upload acceptance policy derived from this configuration.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            allowed_mime_types: self.allowed_mime_types.clone(),
            max_file_size_bytes: self.max_file_size_bytes,
        }
    }
}

/// Compose a connection URL from the discrete DB_* variables when
/// DATABASE_URL is not set.
fn database_url_from_parts() -> Result<String, anyhow::Error> {
    let host = env::var("DB_HOST")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL or DB_HOST must be set"))?;
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let name = env::var("DB_NAME").map_err(|_| anyhow::anyhow!("DB_NAME must be set"))?;
    let user = env::var("DB_USER").map_err(|_| anyhow::anyhow!("DB_USER must be set"))?;
    let pass = env::var("DB_PASS").unwrap_or_default();

    Ok(format!(
        "postgresql://{}:{}@{}:{}/{}",
        user, pass, host, port, name
    ))
}
