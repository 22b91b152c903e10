use std::io;
use std::path::PathBuf;

/// Everything that can abort a chart render.
#[derive(Debug, thiserror::Error)]
pub enum TrendsError {
    /// An input series file does not exist or cannot be read.
    #[error("cannot read series file {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line of a series file is not UTF-8 text holding exactly two
    /// floating-point tokens.
    #[error("{file}:{line}: {reason} (line: {content:?})")]
    DataFormat {
        file: String,
        line: usize,
        content: String,
        reason: String,
    },

    /// An output file (or its temporary sibling) cannot be written.
    #[error("cannot write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The drawing, rasterising or PDF library reported a failure.
    #[error("render error: {0}")]
    Render(String),
}
