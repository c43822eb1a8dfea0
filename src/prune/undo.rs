use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PruneError;

#[derive(Debug, Clone)]
enum FileState {
    Text(String),
    /// Not valid UTF-8; the script can only point at it
    Binary,
}

/// Shell script that restores every file the pruner touched
#[derive(Debug, Default)]
pub struct UndoScript {
    /// First recorded state of each file
    file_states: BTreeMap<PathBuf, FileState>,
}

impl UndoScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of a file before modification. Later records for
    /// the same path are ignored so the script restores the original.
    pub fn record_file_state(&mut self, path: &Path, contents: &str) {
        self.file_states
            .entry(path.to_path_buf())
            .or_insert_with(|| FileState::Text(contents.to_string()));
    }

    pub fn record_binary_file(&mut self, path: &Path) {
        self.file_states
            .entry(path.to_path_buf())
            .or_insert(FileState::Binary);
    }

    /// Record whatever is currently on disk at `path`
    pub fn record_path(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(contents) => self.record_file_state(path, &contents),
            Err(_) => self.record_binary_file(path),
        }
    }

    pub fn render(&self) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/bash\n");
        script.push_str("# SearchDeadRes Undo Script\n");
        script.push_str("# Generated automatically - run to restore pruned resources\n");
        script.push('\n');
        script.push_str("set -e\n");
        script.push('\n');
        script.push_str("echo 'Restoring pruned resources...'\n");
        script.push('\n');

        for (file_path, state) in &self.file_states {
            let escaped_path = file_path.display().to_string().replace('\'', "'\\''");

            match state {
                FileState::Text(contents) => {
                    script.push_str(&format!("# Restore {}\n", file_path.display()));
                    script.push_str(&format!("mkdir -p \"$(dirname '{}')\"\n", escaped_path));
                    script.push_str(&format!("cat > '{}' << 'SEARCHDEADRES_EOF'\n", escaped_path));
                    script.push_str(contents);
                    if !contents.ends_with('\n') {
                        script.push('\n');
                    }
                    script.push_str("SEARCHDEADRES_EOF\n");
                    script.push_str(&format!("echo '  Restored: {}'\n", escaped_path));
                }
                FileState::Binary => {
                    script.push_str(&format!(
                        "# Binary file {} cannot be restored by this script\n",
                        file_path.display()
                    ));
                    script.push_str(&format!("echo '  Skipped binary: {}'\n", escaped_path));
                }
            }
            script.push('\n');
        }

        script.push_str("echo 'Done! All text files restored.'\n");
        script
    }

    /// Write the undo script to a file
    /// Fail early when `path` could never be written
    pub fn check_target(path: &Path) -> Result<(), PruneError> {
        let parent_missing = path
            .parent()
            .is_some_and(|parent| !parent.as_os_str().is_empty() && !parent.is_dir());
        if parent_missing || path.is_dir() {
            return Err(PruneError::UndoTarget(path.to_path_buf()));
        }
        Ok(())
    }

    pub fn write(&self, path: &Path) -> Result<(), PruneError> {
        std::fs::write(path, self.render())?;

        // Make executable on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Get the number of files recorded
    pub fn file_count(&self) -> usize {
        self.file_states.len()
    }
}
