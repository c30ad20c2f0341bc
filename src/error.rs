//! Error management.

use derive_more::Display;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// The stage (and file, if any) a load or store failed in.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Source {
    #[display(fmt = "text graph {}", "show(_0)")]
    Text(Option<PathBuf>),
    #[display(fmt = "degree file {}", "show(_0)")]
    Degrees(Option<PathBuf>),
    #[display(fmt = "edge file {}", "show(_0)")]
    Edges(Option<PathBuf>),
    #[display(fmt = "label file {}", "show(_0)")]
    Labels(Option<PathBuf>),
}

fn show(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| String::from("<memory>"), |p| format!("`{}`", p.display()))
}

impl Source {
    pub fn text<P: AsRef<Path>>(path: P) -> Self {
        Source::Text(Some(path.as_ref().to_path_buf()))
    }

    pub fn degrees<P: AsRef<Path>>(path: P) -> Self {
        Source::Degrees(Some(path.as_ref().to_path_buf()))
    }

    pub fn edges<P: AsRef<Path>>(path: P) -> Self {
        Source::Edges(Some(path.as_ref().to_path_buf()))
    }

    pub fn labels<P: AsRef<Path>>(path: P) -> Self {
        Source::Labels(Some(path.as_ref().to_path_buf()))
    }
}

#[derive(Debug, Display)]
pub enum Error {
    /// The file is missing or unreadable/unwritable.
    #[display(fmt = "{}: {}", _0, _1)]
    Io(Source, std::io::Error),
    /// The input does not follow the grammar or the binary layout.
    #[display(fmt = "{}: malformed input: {}", _0, _1)]
    Format(Source, String),
    /// The input is well formed but describes an inconsistent graph.
    #[display(fmt = "{}: inconsistent graph: {}", _0, _1)]
    Structure(Source, String),
}

impl Error {
    pub fn source_stage(&self) -> &Source {
        match self {
            Error::Io(source, _) | Error::Format(source, _) | Error::Structure(source, _) => {
                source
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::Structure(Source::degrees("g.deg"), String::from("bad"));
        assert_eq!(err.to_string(), "degree file `g.deg`: inconsistent graph: bad");
        let err = Error::Format(Source::Labels(None), String::from("truncated"));
        assert_eq!(err.to_string(), "label file <memory>: malformed input: truncated");
    }
}
