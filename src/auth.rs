use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

/// Where a credential may come from. Precedence is env, then token file, then CLI argument.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub env_key: Option<String>,
    pub token_path: Option<PathBuf>,
    pub arg_key: Option<String>,
}

/// Last seen state of the token file.
#[derive(Debug, Clone, PartialEq)]
struct TokenObservation {
    modified: SystemTime,
    value: Option<String>,
}

/// Resolves the API key on every request, picking up rotations of the
/// token file without restarting the process.
#[derive(Debug)]
pub struct CredentialResolver {
    sources: CredentialSources,
    observed: Mutex<Option<TokenObservation>>,
}

impl CredentialResolver {
    pub fn new(sources: CredentialSources) -> Self {
        let resolver = Self { sources, observed: Mutex::new(None) };
        resolver.refresh_file();
        resolver
    }

    pub fn resolve(&self) -> Option<String> {
        // Keep the file observation current even when the env var wins
        let from_file = self.refresh_file();

        self.sources
            .env_key
            .clone()
            .or(from_file)
            .or_else(|| self.sources.arg_key.clone())
    }

    fn refresh_file(&self) -> Option<String> {
        let path = self.sources.token_path.as_ref()?;
        let mut observed = self.observed.lock().unwrap_or_else(|e| e.into_inner());

        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if observed.take().is_some() {
                    tracing::info!(path = %path.display(), "Token file removed");
                }
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot stat token file, keeping cached token");
                return observed.as_ref().and_then(|o| o.value.clone());
            }
        };

        if let Some(o) = observed.as_ref() {
            if o.modified == modified {
                return o.value.clone();
            }
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let value = Some(content.trim().to_string()).filter(|v| !v.is_empty());
                tracing::info!(path = %path.display(), present = value.is_some(), "Token file refreshed");
                *observed = Some(TokenObservation { modified, value: value.clone() });
                value
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read token file, keeping cached token");
                observed.as_ref().and_then(|o| o.value.clone())
            }
        }
    }
}
