use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole pack toolchain.
/// Every module returns `Result<T, PackError>`.
#[derive(Debug, Error)]
pub enum PackError {
    // ── Metadata ────────────────────────────────────────
    #[error("Failed to fetch component {uid} {version}: {reason}")]
    Fetch {
        uid: String,
        version: String,
        reason: String,
    },

    #[error("Failed to resolve all dependencies. Missing: {}", .0.join(", "))]
    UnresolvedDependency(Vec<String>),

    // ── Loader ──────────────────────────────────────────
    #[error("Loader not supported: {0}")]
    UnsupportedLoader(String),

    #[error("Unsupported component: {0}")]
    UnsupportedComponent(String),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Config ──────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type PackResult<T> = Result<T, PackError>;

impl PackError {
    pub(crate) fn fetch(uid: &str, version: &str, reason: impl ToString) -> Self {
        PackError::Fetch {
            uid: uid.to_string(),
            version: version.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for PackError {
    fn from(source: std::io::Error) -> Self {
        PackError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_dependency_lists_every_id() {
        let err = PackError::UnresolvedDependency(vec![
            "net.fabricmc.intermediary".into(),
            "org.lwjgl3".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Failed to resolve all dependencies. Missing: net.fabricmc.intermediary, org.lwjgl3"
        );
    }

    #[test]
    fn fetch_error_names_component_and_version() {
        let err = PackError::fetch("net.minecraft", "1.20.1", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "Failed to fetch component net.minecraft 1.20.1: HTTP 404"
        );
    }
}
