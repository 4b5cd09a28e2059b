use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const API_PATH: &str = "/v2-beta";

#[derive(thiserror::Error, Debug)]
pub enum CredentialsError {
    #[error("HOME is not set; pass --credentials explicitly")]
    NoHome,
    #[error("invalid credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no credentials file and {0} is not set")]
    MissingEnv(&'static str),
    #[error("invalid cattle url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Layout written by the rancher CLI. Other keys belong to that tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliConfigFile {
    url: String,
    access_key: String,
    secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    File(PathBuf),
    Env,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::File(p) => write!(f, "file:{}", p.display()),
            CredentialSource::Env => write!(f, "env"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    /// API base, always ending in exactly one `/`.
    pub url: String,
    pub access_key: String,
    pub secret_key: String,
    pub source: CredentialSource,
}

pub fn default_cli_config_path() -> Result<PathBuf, CredentialsError> {
    let home = std::env::var("HOME").map_err(|_| CredentialsError::NoHome)?;
    Ok(PathBuf::from(home).join(".rancher/cli.json"))
}

pub fn resolve(path: &Path) -> Result<Credentials, CredentialsError> {
    resolve_with(path, |k| std::env::var(k).ok())
}

pub fn resolve_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, CredentialsError> {
    let creds = match std::fs::read_to_string(path) {
        Ok(raw) => {
            let file: CliConfigFile =
                serde_json::from_str(&raw).map_err(|source| CredentialsError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            Credentials {
                url: join_api_path(&file.url)?,
                access_key: file.access_key,
                secret_key: file.secret_key,
                source: CredentialSource::File(path.to_path_buf()),
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "credentials file unreadable, falling back to environment");
            let var = |name: &'static str| env(name).ok_or(CredentialsError::MissingEnv(name));
            let url = var("CATTLE_URL")?;
            validate_url(&url)?;
            Credentials {
                url,
                access_key: var("CATTLE_ACCESS_KEY")?,
                secret_key: var("CATTLE_SECRET_KEY")?,
                source: CredentialSource::Env,
            }
        }
    };

    let creds = Credentials {
        url: with_trailing_slash(&creds.url),
        ..creds
    };
    info!("Using cattle url: {:?}", creds.url);
    Ok(creds)
}

/// Replaces the path of `raw` with the API root, the way a relative-reference
/// join against an absolute path does.
fn join_api_path(raw: &str) -> Result<String, CredentialsError> {
    let base = validate_url(raw)?;
    base.join(API_PATH)
        .map(|u| u.to_string())
        .map_err(|e| CredentialsError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
}

fn validate_url(raw: &str) -> Result<Url, CredentialsError> {
    Url::parse(raw).map_err(|e| CredentialsError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_cli_json(dir: &TempDir, body: &str) -> PathBuf {
        let p = dir.path().join("cli.json");
        std::fs::write(&p, body).unwrap();
        p
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn file_url_path_is_replaced_with_api_root() {
        let dir = TempDir::new().unwrap();
        let p = write_cli_json(
            &dir,
            r#"{"url":"https://rancher.example.com/v1/schemas","accessKey":"AK","secretKey":"SK","environment":"1a5"}"#,
        );
        let c = resolve_with(&p, no_env).unwrap();
        assert_eq!(c.url, "https://rancher.example.com/v2-beta/");
        assert_eq!(c.access_key, "AK");
        assert_eq!(c.secret_key, "SK");
        assert_eq!(c.source, CredentialSource::File(p));
    }

    #[test]
    fn bare_host_gets_api_root() {
        let dir = TempDir::new().unwrap();
        let p = write_cli_json(
            &dir,
            r#"{"url":"http://10.0.0.5:8080","accessKey":"a","secretKey":"s"}"#,
        );
        assert_eq!(resolve_with(&p, no_env).unwrap().url, "http://10.0.0.5:8080/v2-beta/");
    }

    #[test]
    fn missing_file_falls_back_to_env_verbatim() {
        let dir = TempDir::new().unwrap();
        let env: HashMap<&str, &str> = [
            ("CATTLE_URL", "http://cattle:8080/v2-beta///"),
            ("CATTLE_ACCESS_KEY", "ENVAK"),
            ("CATTLE_SECRET_KEY", "ENVSK"),
        ]
        .into_iter()
        .collect();
        let c = resolve_with(&dir.path().join("missing.json"), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(c.url, "http://cattle:8080/v2-beta/");
        assert_eq!(c.access_key, "ENVAK");
        assert_eq!(c.source, CredentialSource::Env);
    }

    #[test]
    fn env_fallback_names_the_missing_variable() {
        let dir = TempDir::new().unwrap();
        let err = resolve_with(&dir.path().join("missing.json"), |k| {
            (k == "CATTLE_URL").then(|| "http://cattle/".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, CredentialsError::MissingEnv("CATTLE_ACCESS_KEY")));
    }

    #[test]
    fn malformed_file_does_not_fall_back() {
        let dir = TempDir::new().unwrap();
        let p = write_cli_json(&dir, r#"{"url":"http://x"}"#);
        let err = resolve_with(&p, |_| Some("ignored".to_string())).unwrap_err();
        assert!(matches!(err, CredentialsError::Parse { .. }));
    }

    #[test]
    fn relative_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let p = write_cli_json(
            &dir,
            r#"{"url":"rancher.local","accessKey":"a","secretKey":"s"}"#,
        );
        assert!(matches!(
            resolve_with(&p, no_env).unwrap_err(),
            CredentialsError::InvalidUrl { .. }
        ));
    }
}
