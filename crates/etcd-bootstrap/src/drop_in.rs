use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

use proven_etcd_membership::BootstrapDirective;
use tracing::info;

static DROP_IN_TEMPLATE: &str = include_str!("../templates/drop-in.conf");

/// Systemd drop-in exposing the directive to the etcd unit.
pub struct DropIn {
    path: PathBuf,
}

impl DropIn {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[allow(clippy::literal_string_with_formatting_args)]
    pub fn render(directive: &BootstrapDirective) -> String {
        DROP_IN_TEMPLATE
            .replace("{initial_cluster}", &directive.initial_cluster_string())
            .replace("{initial_cluster_state}", directive.mode.as_str())
    }

    /// Writes the drop-in, creating parent directories as needed.
    pub fn write(&self, directive: &BootstrapDirective) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io("failed to create drop-in directory", e))?;
        }

        std::fs::write(&self.path, Self::render(directive))
            .map_err(|e| Error::Io("failed to write drop-in file", e))?;

        info!(
            "wrote {} with initial cluster state {}",
            self.path().display(),
            directive.mode
        );

        Ok(())
    }
}
