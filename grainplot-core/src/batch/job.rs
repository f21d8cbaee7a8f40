//! Batch job definitions

use crate::error::Result;
use crate::render::{render_file, RenderOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A batch job to be processed
pub enum BatchJob {
    /// Render one `.xy` frame to an image
    Render {
        input: PathBuf,
        output: PathBuf,
        options: Arc<RenderOptions>,
    },

    /// Custom operation
    Custom {
        name: String,
        operation: Box<dyn FnOnce() -> Result<()> + Send>,
    },
}

impl BatchJob {
    /// Render `input` to a PNG next to it, swapping the extension
    pub fn render<P: AsRef<Path>>(input: P, options: Arc<RenderOptions>) -> Self {
        let input = input.as_ref().to_path_buf();
        let output = input.with_extension("png");
        BatchJob::Render {
            input,
            output,
            options,
        }
    }

    /// Get a display name for the job
    pub fn display_name(&self) -> String {
        match self {
            BatchJob::Render { input, .. } => {
                format!(
                    "Render {}",
                    input.file_name().unwrap_or_default().to_string_lossy()
                )
            }
            BatchJob::Custom { name, .. } => name.clone(),
        }
    }

    /// Get output file for the job
    pub fn output_file(&self) -> Option<&PathBuf> {
        match self {
            BatchJob::Render { output, .. } => Some(output),
            BatchJob::Custom { .. } => None,
        }
    }

    /// Run the job, returning the files it wrote
    pub(crate) fn execute(self) -> Result<Vec<PathBuf>> {
        match self {
            BatchJob::Render {
                input,
                output,
                options,
            } => {
                render_file(&input, &output, &options)?;
                Ok(vec![output])
            }
            BatchJob::Custom { operation, .. } => {
                operation()?;
                Ok(vec![])
            }
        }
    }
}

impl fmt::Debug for BatchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchJob::Render { input, output, .. } => f
                .debug_struct("Render")
                .field("input", input)
                .field("output", output)
                .finish_non_exhaustive(),
            BatchJob::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}
