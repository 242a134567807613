use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_UPLOAD_EXPIRY_SECS: u64 = 36_000;
pub const DEFAULT_REGION: &str = "eu-north-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lifetime of presigned upload URLs, in seconds
    #[serde(default = "default_upload_expiry_secs")]
    pub upload_expiry_secs: u64,
    /// Forward the listing `Prefix` query parameter to the store. Off by
    /// default: listings are rooted at the bucket root.
    #[serde(default)]
    pub forward_prefix: bool,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    S3(S3BackendConfig),
    Memory(MemoryBackendConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3BackendConfig {
    #[serde(default = "default_region")]
    pub region: String,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBackendConfig {
    pub bucket: String,
    /// Base URL clients use to reach this server's store routes.
    /// Defaults to `http://<host>:<port>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    /// Fixed signing secret; a random one is generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
}

/// Values from the command line or environment that take precedence over
/// the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bucket: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

fn default_upload_expiry_secs() -> u64 {
    DEFAULT_UPLOAD_EXPIRY_SECS
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Config {
    /// Load a JSON or YAML config, picked by file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    pub fn upload_expiry(&self) -> Duration {
        Duration::from_secs(self.upload_expiry_secs)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        match &mut self.backend {
            BackendConfig::S3(s3) => {
                if let Some(bucket) = overrides.bucket {
                    s3.bucket = bucket;
                }
                if overrides.access_key_id.is_some() {
                    s3.access_key_id = overrides.access_key_id;
                }
                if overrides.secret_access_key.is_some() {
                    s3.secret_access_key = overrides.secret_access_key;
                }
            }
            BackendConfig::Memory(mem) => {
                if let Some(bucket) = overrides.bucket {
                    mem.bucket = bucket;
                }
            }
        }
    }
}
