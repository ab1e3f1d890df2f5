//! Backend bridge to the external knowledge store.
//!
//! Tool calls are serviced by a collaborator process invoked once per call
//! as `<command> <script> <method> <json-args>`. The collaborator emits a
//! single JSON object on stdout and exits 0 on success, or writes
//! diagnostics to stderr and exits nonzero on failure.

use std::path::PathBuf;

use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::config::MembankConfig;
use crate::errors::{MembankError, Result};

/// A client capable of servicing knowledge-store calls.
///
/// The dispatcher is generic over this trait so the process-spawning
/// transport can be swapped for an in-process or networked backend.
pub trait BackendClient {
    /// Invokes the backend method with the given argument object and
    /// returns its JSON payload.
    fn invoke(
        &self,
        method: &str,
        args: &Value,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

/// Shared backends delegate through the pointer, so an `Arc`-wrapped
/// client is itself a `BackendClient`.
impl<T: BackendClient + ?Sized + Send + Sync> BackendClient for std::sync::Arc<T> {
    fn invoke(
        &self,
        method: &str,
        args: &Value,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        (**self).invoke(method, args)
    }
}

/// A `BackendClient` that spawns a fresh bridge process per call.
///
/// No retry and no timeout: a hung bridge process stalls the
/// corresponding request until the process exits.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    command: String,
    script: String,
    project_root: PathBuf,
}

impl ProcessBridge {
    /// Creates a bridge rooted at the given project directory.
    pub fn new(config: &MembankConfig, project_root: PathBuf) -> Self {
        Self {
            command: config.bridge_command.clone(),
            script: config.bridge_script.clone(),
            project_root,
        }
    }
}

impl BackendClient for ProcessBridge {
    async fn invoke(&self, method: &str, args: &Value) -> Result<Value> {
        let args_json = serde_json::to_string(args)?;
        debug!(method, "invoking bridge process");

        let output = Command::new(&self.command)
            .arg(&self.script)
            .arg(method)
            .arg(&args_json)
            .current_dir(&self.project_root)
            .output()
            .await
            .map_err(|e| MembankError::BridgeSpawn {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MembankError::BridgeExecution {
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).map_err(|_| MembankError::BridgeProtocol {
            output: stdout.to_string(),
        })
    }
}
