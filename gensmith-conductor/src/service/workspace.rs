//! Per-task scratch workspaces
//!
//! Each task is processed in an isolated directory under a configurable
//! root, identified by a short random id. The directory holds the
//! generated user-configuration file the CLI is pointed at and the log
//! file its output is captured in. The whole directory is removed when
//! the task is finalized, whatever the outcome.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

const USER_CONFIG_FILE: &str = "gensmith-user-config.json";
const LOG_FILE: &str = "gensmith.log";

/// Hex characters of the UUID kept as the work-context identifier
const ID_LEN: usize = 8;

/// Isolated working state for one task
///
/// All four values are produced together by `prepare` and torn down
/// together by `cleanup`.
#[derive(Debug, Clone)]
pub struct WorkContext {
    /// Short identifier, first 8 hex chars of a random UUID
    pub id: String,
    /// Exclusive scratch directory for this task
    pub dir: PathBuf,
    /// Generated user-configuration file handed to the CLI
    pub user_config_path: PathBuf,
    /// Log file the CLI's output is captured in
    pub log_path: PathBuf,
}

/// Service trait for work-context lifecycle
pub trait WorkspaceService: Send + Sync {
    /// Creates a fresh work context
    ///
    /// A directory collision on the generated id is a fatal error for
    /// this task attempt, not silently retried.
    fn prepare(&self) -> Result<WorkContext>;

    /// Removes the context's scratch directory and everything in it
    fn cleanup(&self, ctx: &WorkContext) -> Result<()>;
}

type IdSource = Box<dyn Fn() -> Uuid + Send + Sync>;

/// Filesystem-backed workspace service
pub struct ScratchWorkspace {
    root: PathBuf,
    id_source: IdSource,
}

/// Contents of the generated per-task user configuration file
///
/// Points the CLI at output locations inside the scratch directory so a
/// task never writes outside its own context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedUserConfig {
    output_dir: PathBuf,
    cache_dir: PathBuf,
}

impl ScratchWorkspace {
    /// Creates a workspace service rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            id_source: Box::new(Uuid::new_v4),
        }
    }

    /// Replaces the random identifier source, for deterministic paths in
    /// tests
    #[cfg(test)]
    fn with_id_source(mut self, source: IdSource) -> Self {
        self.id_source = source;
        self
    }
}

impl WorkspaceService for ScratchWorkspace {
    fn prepare(&self) -> Result<WorkContext> {
        let id = (self.id_source)().simple().to_string()[..ID_LEN].to_string();
        let dir = self.root.join(&id);

        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create workspace root {}", self.root.display())
        })?;

        // An existing directory means an id collision; fatal for this
        // task attempt.
        fs::create_dir(&dir)
            .with_context(|| format!("Failed to create scratch directory {}", dir.display()))?;

        let user_config_path = dir.join(USER_CONFIG_FILE);
        let log_path = dir.join(LOG_FILE);

        let user_config = GeneratedUserConfig {
            output_dir: dir.join("output"),
            cache_dir: dir.join("cache"),
        };
        let body = serde_json::to_string_pretty(&user_config)
            .context("Failed to serialize user configuration")?;
        fs::write(&user_config_path, body).with_context(|| {
            format!(
                "Failed to write user configuration {}",
                user_config_path.display()
            )
        })?;

        // The CLI appends to the log file; create it up front so log
        // shipping has something to read even when dispatch never starts.
        fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

        debug!(id = %id, dir = %dir.display(), "prepared work context");

        Ok(WorkContext {
            id,
            dir,
            user_config_path,
            log_path,
        })
    }

    fn cleanup(&self, ctx: &WorkContext) -> Result<()> {
        fs::remove_dir_all(&ctx.dir)
            .with_context(|| format!("Failed to remove scratch directory {}", ctx.dir.display()))?;

        debug!(id = %ctx.id, "removed work context");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gensmith-ws-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_prepare_is_deterministic_with_fixed_id_source() {
        let root = temp_root("det");
        let _ = fs::remove_dir_all(&root);

        let ws = ScratchWorkspace::new(root.clone()).with_id_source(Box::new(Uuid::nil));

        let ctx = ws.prepare().unwrap();
        assert_eq!(ctx.id, "00000000");
        assert_eq!(ctx.dir, root.join("00000000"));
        assert_eq!(ctx.user_config_path, ctx.dir.join("gensmith-user-config.json"));
        assert_eq!(ctx.log_path, ctx.dir.join("gensmith.log"));
        assert!(ctx.user_config_path.is_file());
        assert!(ctx.log_path.is_file());

        let body = fs::read_to_string(&ctx.user_config_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(value["outputDir"].as_str().unwrap().ends_with("output"));

        ws.cleanup(&ctx).unwrap();
        assert!(!ctx.dir.exists());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_prepare_fails_on_id_collision() {
        let root = temp_root("collide");
        let _ = fs::remove_dir_all(&root);

        let ws = ScratchWorkspace::new(root.clone()).with_id_source(Box::new(Uuid::nil));

        let first = ws.prepare().unwrap();
        assert!(ws.prepare().is_err());

        ws.cleanup(&first).unwrap();
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_random_ids_are_short_hex() {
        let root = temp_root("hex");
        let _ = fs::remove_dir_all(&root);

        let ws = ScratchWorkspace::new(root.clone());
        let ctx = ws.prepare().unwrap();

        assert_eq!(ctx.id.len(), 8);
        assert!(ctx.id.chars().all(|c| c.is_ascii_hexdigit()));

        ws.cleanup(&ctx).unwrap();
        let _ = fs::remove_dir_all(&root);
    }
}
