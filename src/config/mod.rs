// Configuration module entry point
// Loads layered configuration and resolves what the server should preview

mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{PreviewError, Result};

pub use types::{Config, LoggingConfig, ServerConfig, UiConfig, ValidatorConfig};

/// Config file looked up in the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "swagger-preview";

/// Subdirectory of the user cache directory holding the UI bundle
pub const CACHE_SUBDIR: &str = "swagger-preview";

pub const DEFAULT_RELEASE_API: &str =
    "https://api.github.com/repos/swagger-api/swagger-ui/releases/latest";

pub const DEFAULT_VALIDATOR_URL: &str = "http://online.swagger.io/validator/debug";

impl Config {
    /// Load configuration: defaults, then the config file (optional unless
    /// given explicitly), then `SWAGGER_PREVIEW__SECTION__KEY` variables.
    pub fn load_from(config_path: Option<&Path>) -> std::result::Result<Self, config::ConfigError> {
        let file = match config_path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("SWAGGER_PREVIEW").separator("__"))
            .set_default("server.listen", ":8080")?
            .set_default("logging.verbose", false)?
            .set_default("ui.release_api", DEFAULT_RELEASE_API)?
            .set_default("ui.force_update", false)?
            .set_default("validator.url", DEFAULT_VALIDATOR_URL)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration and apply command-line overrides on top
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::load_from(cli.config.as_deref())?;
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(listen) = &cli.listen {
            self.server.listen.clone_from(listen);
        }
        if cli.verbose > 0 {
            self.logging.verbose = true;
        }
        if cli.update {
            self.ui.force_update = true;
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen_addr(&self.server.listen)
    }

    /// Directory holding the downloaded archive and the extracted `dist/`
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.ui.cache_dir {
            return Ok(PathBuf::from(dir));
        }
        dirs::cache_dir()
            .map(|dir| dir.join(CACHE_SUBDIR))
            .ok_or(PreviewError::NoCacheDir)
    }
}

/// Parse a listen address. `:PORT` listens on all interfaces; anything else
/// is `HOST:PORT`, resolved through the system resolver when not a literal.
pub fn parse_listen_addr(listen: &str) -> Result<SocketAddr> {
    let candidate = if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    };

    if let Ok(addr) = candidate.parse::<SocketAddr>() {
        return Ok(addr);
    }

    candidate
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| PreviewError::ListenAddr(listen.to_string()))
}

/// What the server previews
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every `.json`/`.yml`/`.yaml` file below the directory
    Directory(PathBuf),
    /// One specification file, served as `/swagger.yml`
    File(PathBuf),
}

impl Target {
    pub fn detect(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PreviewError::TargetNotFound(path.to_path_buf())
            } else {
                PreviewError::Io(e)
            }
        })?;

        if metadata.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            Ok(Self::File(path.to_path_buf()))
        }
    }

    /// Directory served after the UI bundle by the fallback resolver
    pub fn content_root(&self) -> PathBuf {
        match self {
            Self::Directory(dir) => dir.clone(),
            Self::File(file) => match file.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}
