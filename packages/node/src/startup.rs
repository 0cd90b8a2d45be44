//! Process lifecycle helpers used by `main`: the startup mapping load and
//! the shutdown signal.

use std::path::Path;

use ldr::{MappingError, MappingTable, ResultCache, UrlMapper};
use tracing::{info, warn};

/// How many rules are echoed to the log after a startup load.
const EXAMPLE_RULES: usize = 3;

/// Load `path` into `mapper`, replacing its table. Returns the number of
/// rules installed.
///
/// A failure leaves the mapper untouched; the caller decides whether it is
/// fatal.
pub fn load_startup_mappings(mapper: &UrlMapper, path: &Path) -> Result<usize, MappingError> {
    let table = MappingTable::from_file(path)?;

    for (pattern, replacement) in table.iter().take(EXAMPLE_RULES) {
        info!("  {pattern} -> {replacement}");
    }
    if table.len() > EXAMPLE_RULES {
        info!("  ... and {} more", table.len() - EXAMPLE_RULES);
    }

    let count = mapper.replace(table);
    info!("loaded {count} mappings from {}", path.display());
    Ok(count)
}

/// Resolves on Ctrl-C or (on Unix) SIGTERM, after clearing `cache`.
pub async fn shutdown_signal(cache: std::sync::Arc<dyn ResultCache>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("interrupt received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }

    match cache.clear().await {
        Ok(cleared) => info!("cache cleared ({cleared} entries)"),
        Err(e) => warn!("failed to clear cache: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_load_installs_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        std::fs::write(
            &path,
            r#"{"https://w3id.org/a/*": "file:///srv/a/${rest}", "https://w3id.org/b": "https://b.example/"}"#,
        )
        .unwrap();

        let mapper = UrlMapper::default();
        assert_eq!(load_startup_mappings(&mapper, &path).unwrap(), 2);
        assert_eq!(mapper.map("https://w3id.org/a/x"), "file:///srv/a/x");
    }

    #[test]
    fn failed_startup_load_keeps_existing_table() {
        let mapper = UrlMapper::new(MappingTable::new().with("a", "b"));
        let err = load_startup_mappings(&mapper, Path::new("/no/such/file.json"));
        assert!(matches!(err, Err(MappingError::Read { .. })));
        assert_eq!(mapper.len(), 1);
    }

    #[test]
    fn malformed_startup_file_is_reported_to_the_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        std::fs::write(&path, "{not json").unwrap();

        let mapper = UrlMapper::new(MappingTable::new().with("a", "b"));
        let err = load_startup_mappings(&mapper, &path);
        assert!(matches!(err, Err(MappingError::Parse { .. })));
        assert_eq!(mapper.map("a"), "b");
    }
}
