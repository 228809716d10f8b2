use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variables read into [`Config`]. Keys are matched case-insensitively
/// and lowercased into field names.
const ENV_KEYS: &[&str] = &[
    "CONNECTION_URL",
    "PORT",
    "LOGLEVEL",
    "RECEIPTS_DIR",
    "PUBLIC_DIR",
    "COOKIE_SECRET",
    "RECEIPT_FONT",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// sqlx SQLite URL, e.g. `sqlite://paygate.db`.
    pub connection_url: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    #[serde(default = "default_receipts_dir")]
    pub receipts_dir: PathBuf,

    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Base64 encoded key material (at least 64 bytes) for the private cookie jar.
    #[serde(default)]
    pub cookie_secret: Option<String>,

    /// TrueType/OpenType font for receipts, replacing the bundled DejaVu Sans
    /// (e.g. a CJK font when payer names need those glyphs).
    #[serde(default)]
    pub receipt_font: Option<PathBuf>,
}

fn default_port() -> u16 {
    3000
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_receipts_dir() -> PathBuf {
    PathBuf::from("receipts")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_url: "sqlite::memory:".to_string(),
            port: default_port(),
            loglevel: default_loglevel(),
            receipts_dir: default_receipts_dir(),
            public_dir: default_public_dir(),
            cookie_secret: None,
            receipt_font: None,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new().merge(Env::raw().only(ENV_KEYS))
    }

    /// Load from the process environment. Fails when `CONNECTION_URL` is unset.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}
