use std::path::PathBuf;

use pdep_code::CodeError;
use pdep_parse::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Code(#[from] CodeError),
}
