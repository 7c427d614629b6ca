use std::{env, time::Duration};

use anyhow::{Context, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub presign_ttl: Duration,
    pub max_upload_bytes: usize,
    pub quiz_pass_percent: u32,
    pub concurrency_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000)?;

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "memory" => StorageBackend::Memory,
            other => bail!("unsupported STORAGE_BACKEND {other}"),
        };
        let s3_bucket = env::var("S3_BUCKET").ok();
        if storage_backend == StorageBackend::S3 && s3_bucket.is_none() {
            bail!("S3_BUCKET is required when STORAGE_BACKEND=s3");
        }

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 24)?,
            storage_backend,
            s3_bucket,
            presign_ttl: Duration::from_secs(parse_or("PRESIGN_TTL_SECS", 3600)?),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            quiz_pass_percent: parse_or("QUIZ_PASS_PERCENT", 60)?,
            concurrency_limit: parse_or("CONCURRENCY_LIMIT", 100)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}
