use clap::Parser;
use serde::Deserialize;
use std::fs::read_to_string;
use std::io;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "Resources/hawaii.sqlite";
const DEFAULT_IP: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the sqlite weather database
    #[arg(short, long, env = "CLIMATE_DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Optional toml file with the same settings as the flags
    #[arg(long, env = "CLIMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ip to listen to
    #[arg(short, long, env = "CLIMATE_IP")]
    pub ip: Option<String>,

    #[arg(short, long, env = "CLIMATE_PORT")]
    pub port: Option<u16>,

    #[arg(short, long, env = "KEY_FILE_PATH")]
    pub key_file_path: Option<PathBuf>,

    #[arg(short, long, env = "CERT_FILE_PATH")]
    pub cert_file_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read from '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse toml from '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Cannot parse ip \"{ip}\": {source}")]
    InvalidIp { ip: String, source: AddrParseError },
    #[error("Both a key file and a certificate file are needed for tls")]
    IncompleteTls,
}

/// Contents of the settings file. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub database_path: Option<PathBuf>,
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub key_file_path: Option<PathBuf>,
    pub cert_file_path: Option<PathBuf>,
}

impl FileSettings {
    pub fn read(path: &Path) -> Result<FileSettings, ConfigError> {
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TlsSettings {
    pub key_file_path: PathBuf,
    pub cert_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub address: SocketAddr,
    pub tls: Option<TlsSettings>,
}

impl Settings {
    /// Resolve settings from the command line, reading the settings file if
    /// one is named.
    pub fn load(args: Args) -> Result<Settings, ConfigError> {
        let file = match &args.config {
            Some(path) => FileSettings::read(path)?,
            None => FileSettings::default(),
        };
        Settings::merge(args, file)
    }

    /// Command line and environment win over the file, the file wins over
    /// the defaults.
    pub fn merge(args: Args, file: FileSettings) -> Result<Settings, ConfigError> {
        let database_path = args
            .database_path
            .or(file.database_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let ip = args
            .ip
            .or(file.ip)
            .unwrap_or_else(|| DEFAULT_IP.to_string());
        let ip = ip
            .parse::<IpAddr>()
            .map_err(|source| ConfigError::InvalidIp { ip, source })?;
        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let tls = match (
            args.key_file_path.or(file.key_file_path),
            args.cert_file_path.or(file.cert_file_path),
        ) {
            (Some(key_file_path), Some(cert_file_path)) => Some(TlsSettings {
                key_file_path,
                cert_file_path,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };
        Ok(Settings {
            database_path,
            address: SocketAddr::new(ip, port),
            tls,
        })
    }
}
