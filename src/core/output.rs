//! Writing generated scripts to disk

use crate::{core::generator::GeneratedScripts, error::Result, utils::fs::FileSystemUtils};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Writes job and monitoring scripts into an output directory
#[derive(Debug)]
pub struct ScriptWriter {
    output_dir: PathBuf,
    fs_utils: FileSystemUtils,
}

impl ScriptWriter {
    /// Create a writer targeting the given directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Write `<JOB>.sql` and, when present, `<JOB>_monitor.sql`
    #[instrument(skip(self, scripts), fields(job = %scripts.job_name))]
    pub fn write(&self, scripts: &GeneratedScripts) -> Result<Vec<PathBuf>> {
        self.fs_utils.create_dir_all(&self.output_dir)?;

        let mut written = Vec::new();

        let job_path = self.output_dir.join(format!("{}.sql", scripts.job_name));
        self.fs_utils.write_file(&job_path, &scripts.job_script)?;
        written.push(job_path);

        if let Some(monitor) = &scripts.monitor_script {
            let monitor_path = self
                .output_dir
                .join(format!("{}_monitor.sql", scripts.job_name));
            self.fs_utils.write_file(&monitor_path, monitor)?;
            written.push(monitor_path);
        }

        info!(
            "Wrote {} script(s) to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }
}
