use crate::config::ToolsConfig;
use std::fmt;

pub use process::*;

mod process;

/// Environment override for every rasterizer run. Inkscape checks it to
/// avoid re-invoking itself from extensions during batch exports.
const RASTERIZER_ENV: (&str, &str) = ("SELF_CALL", "xxx");

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    const EXPORT_FILENAME_SINCE: Version = Version { major: 1, minor: 0 };

    /// Parses `<major>.<minor>[...]`, ignoring anything after the minor
    /// version.
    pub fn parse(s: &str) -> Option<Version> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts
            .next()?
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()?;
        Some(Version { major, minor })
    }

    /// Finds the version in the first line of `--version` output, which looks
    /// like `Inkscape 1.2.2 (b0a8486541, 2022-12-01)`.
    pub fn from_version_output(output: &str) -> Option<Version> {
        output
            .lines()
            .next()?
            .split_whitespace()
            .nth(1)
            .and_then(Version::parse)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The rasterizer's flag for naming the exported file. Its name changed
/// with 1.0.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ExportFlag {
    ExportFilename,
    ExportPng,
}

impl ExportFlag {
    pub fn for_version(version: Version) -> Self {
        if version >= Version::EXPORT_FILENAME_SINCE {
            ExportFlag::ExportFilename
        } else {
            ExportFlag::ExportPng
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            ExportFlag::ExportFilename => "--export-filename",
            ExportFlag::ExportPng => "--export-png",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("rasterizer '{0}' could not be run, is it installed?")]
    RasterizerMissing(String, #[source] std::io::Error),
    #[error("couldn't determine {0} version from output {1:?}")]
    UnknownVersion(String, String),
}

/// What the external tools on this system can do. Probed once, then shared
/// read-only by every conversion.
#[derive(Debug, Clone)]
pub struct ToolCapabilities {
    pub rasterizer: Tool,
    pub rasterizer_version: Version,
    pub export_flag: ExportFlag,
    pub optimizer: Option<Tool>,
}

impl ToolCapabilities {
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn probe(config: &ToolsConfig) -> Result<Self, ProbeError> {
        let rasterizer = Tool::from_path(&config.rasterizer)
            .with_env_var(RASTERIZER_ENV.0, RASTERIZER_ENV.1);
        let (_, output) = rasterizer
            .read(["--version"])
            .await
            .map_err(|e| ProbeError::RasterizerMissing(rasterizer.name(), e))?;
        let rasterizer_version = Version::from_version_output(&output)
            .ok_or_else(|| ProbeError::UnknownVersion(rasterizer.name(), output.trim().to_owned()))?;
        let export_flag = ExportFlag::for_version(rasterizer_version);
        tracing::debug!(
            "{} {} uses {}",
            rasterizer.name(),
            rasterizer_version,
            export_flag.flag()
        );

        let optimizer = Tool::from_path(&config.optimizer);
        let optimizer = match optimizer.read(["-v"]).await {
            Ok(_) => Some(optimizer),
            Err(e) => {
                tracing::warn!(
                    "optimizer '{}' could not be run ({}), icons won't be compressed",
                    optimizer.name(),
                    e
                );
                None
            }
        };

        Ok(ToolCapabilities {
            rasterizer,
            rasterizer_version,
            export_flag,
            optimizer,
        })
    }
}
