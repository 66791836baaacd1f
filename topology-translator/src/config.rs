use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::constants::DEFAULT_LIFETIME_SECS;
use crate::service::ServiceDefinition;
use crate::translate::Peering;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors returned when loading the translator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid configuration in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    nsa: PathBuf,
    topology: Option<PathBuf>,
    mapping: Option<PathBuf>,
    dds: Option<String>,
    #[serde(default)]
    lifetime: u64,
    nmwg: Option<NmwgFile>,
    #[serde(default)]
    client: ClientFile,
    #[serde(default)]
    service_definition: Vec<ServiceDefinition>,
    #[serde(default)]
    peering: Vec<Peering>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NmwgFile {
    base_url: String,
    #[serde(default)]
    parameter: Vec<QueryParameter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientFile {
    timeout_seconds: Option<u64>,
    ca_certificate: Option<PathBuf>,
}

/// Extra query parameter sent with the NMWG topology request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParameter {
    pub name: String,
    pub value: String,
}

/// Where the NMWG topology is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmwgSource {
    pub base_url: Url,
    pub parameters: Vec<QueryParameter>,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
    /// Additional PEM trust root, resolved against the base directory.
    pub ca_certificate: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ca_certificate: None,
        }
    }
}

/// Resolved translator configuration.
///
/// Relative paths in the file are resolved against the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub nsa_file: PathBuf,
    pub topology_file: Option<PathBuf>,
    pub mapping_file: Option<PathBuf>,
    pub dds: Option<Url>,
    /// Document lifetime in seconds.
    pub lifetime: u64,
    pub nmwg: Option<NmwgSource>,
    pub client: ClientConfig,
    /// Never empty; falls back to [`ServiceDefinition::evts_agole`].
    pub service_definitions: Vec<ServiceDefinition>,
    /// Peerings keyed by link id.
    pub peerings: BTreeMap<String, Peering>,
}

impl Configuration {
    /// Load `file` (relative to `basedir` unless absolute).
    pub fn load(basedir: &Path, file: &Path) -> Result<Self, ConfigError> {
        let path = resolve(basedir, file);
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml(basedir, &raw, path.display().to_string())?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration text; `origin` names the source in errors.
    pub fn from_toml(basedir: &Path, raw: &str, origin: String) -> Result<Self, ConfigError> {
        let parsed: ConfigFile = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.clone(),
            source,
        })?;

        let invalid = |reason: String| ConfigError::Invalid {
            path: origin.clone(),
            reason,
        };

        let dds = parsed
            .dds
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|err| invalid(format!("dds url {raw}: {err}"))))
            .transpose()?;

        let nmwg = parsed
            .nmwg
            .map(|nmwg| {
                Url::parse(&nmwg.base_url)
                    .map(|base_url| NmwgSource {
                        base_url,
                        parameters: nmwg.parameter,
                    })
                    .map_err(|err| invalid(format!("nmwg base_url {}: {err}", nmwg.base_url)))
            })
            .transpose()?;

        let timeout = match parsed.client.timeout_seconds {
            Some(0) => return Err(invalid("client timeout_seconds must be positive".to_string())),
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let service_definitions = if parsed.service_definition.is_empty() {
            vec![ServiceDefinition::evts_agole()]
        } else {
            parsed.service_definition
        };

        let peerings = parsed
            .peering
            .into_iter()
            .filter(|peering| !peering.id.trim().is_empty())
            .map(|peering| (peering.id.clone(), peering))
            .collect();

        Ok(Self {
            nsa_file: resolve(basedir, &parsed.nsa),
            topology_file: parsed.topology.map(|p| resolve(basedir, &p)),
            mapping_file: parsed.mapping.map(|p| resolve(basedir, &p)),
            dds,
            lifetime: if parsed.lifetime == 0 {
                DEFAULT_LIFETIME_SECS
            } else {
                parsed.lifetime
            },
            nmwg,
            client: ClientConfig {
                timeout,
                ca_certificate: parsed.client.ca_certificate.map(|p| resolve(basedir, &p)),
            },
            service_definitions,
            peerings,
        })
    }

    /// Service type of the first service definition.
    pub fn service_type(&self) -> Option<&str> {
        self.service_definitions
            .first()
            .map(|sd| sd.service_type.as_str())
    }
}

fn resolve(basedir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        basedir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use super::{ConfigError, Configuration};

    const MINIMAL: &str = r#"nsa = "nsa.xml""#;

    #[test]
    fn minimal_file_gets_defaults() {
        let config =
            Configuration::from_toml(Path::new("/srv/nsi"), MINIMAL, "inline".to_string())
                .expect("parse");
        assert_eq!(config.nsa_file, Path::new("/srv/nsi/nsa.xml"));
        assert_eq!(config.lifetime, 5_184_000);
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert_eq!(config.service_definitions.len(), 1);
        assert_eq!(config.service_definitions[0].id, "EVTS.A-GOLE");
        assert_eq!(
            config.service_type(),
            Some("http://services.ogf.org/nsi/2013/07/definitions/EVTS.A-GOLE")
        );
        assert!(config.dds.is_none());
        assert!(config.peerings.is_empty());
    }

    #[test]
    fn parses_sources_services_and_peerings() {
        let raw = r#"
            nsa = "nsa.xml"
            topology = "/tmp/topology.xml"
            dds = "https://dds.example.net/dds"
            lifetime = 600

            [nmwg]
            base_url = "https://topology.example.net/topology"
            [[nmwg.parameter]]
            name = "format"
            value = "xml"

            [client]
            timeout_seconds = 5
            ca_certificate = "certs/ca.pem"

            [[service_definition]]
            id = "EVTS.A-GOLE"
            name = "EVTS"
            service_type = "type"
            encoding = "http://schemas.ogf.org/nml/2012/10/ethernet"
            label_type = "http://schemas.ogf.org/nml/2012/10/ethernet#vlan"
            include = ["albu"]

            [[peering]]
            id = "urn:ogf:network:es.net:2013::a:b:c"
            inbound = "urn:ogf:network:peer:2013::x:out"
            [peering.labels]
            type = "http://schemas.ogf.org/nml/2012/10/ethernet#vlan"
            value = "100-200"

            [[peering]]
            id = ""
        "#;
        let config = Configuration::from_toml(Path::new("/srv/nsi"), raw, "inline".to_string())
            .expect("parse");

        assert_eq!(config.topology_file.as_deref(), Some(Path::new("/tmp/topology.xml")));
        assert_eq!(config.lifetime, 600);
        assert_eq!(
            config.dds.as_ref().map(|u| u.as_str()),
            Some("https://dds.example.net/dds")
        );
        let nmwg = config.nmwg.expect("nmwg source");
        assert_eq!(nmwg.parameters[0].name, "format");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert_eq!(
            config.client.ca_certificate.as_deref(),
            Some(Path::new("/srv/nsi/certs/ca.pem"))
        );
        assert_eq!(config.service_definitions[0].include, vec!["albu".to_string()]);
        assert!(!config.service_definitions[0].label_swapping);
        assert_eq!(config.peerings.len(), 1);
        let peering = &config.peerings["urn:ogf:network:es.net:2013::a:b:c"];
        assert_eq!(peering.outbound, None);
        assert_eq!(peering.labels.as_ref().map(|l| l.value.as_str()), Some("100-200"));
    }

    #[test]
    fn rejects_bad_urls_and_unknown_keys() {
        let err = Configuration::from_toml(
            Path::new("."),
            "nsa = \"nsa.xml\"\ndds = \"not a url\"",
            "inline".to_string(),
        )
        .expect_err("bad url");
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = Configuration::from_toml(
            Path::new("."),
            "nsa = \"nsa.xml\"\nbogus = 1",
            "inline".to_string(),
        )
        .expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_resolves_paths_against_basedir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("config.toml"), MINIMAL).expect("write config");

        let config = Configuration::load(dir.path(), Path::new("config.toml")).expect("load");
        assert_eq!(config.nsa_file, dir.path().join("nsa.xml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Configuration::load(Path::new("/nonexistent"), Path::new("config.toml"))
            .expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
