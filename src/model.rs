//! Saved declaration trees
//!
//! Trees are stored with `bincode`, so C sources can be parsed once on a
//! machine with libclang and translated anywhere else.

use crate::decl::DeclTree;

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use snafu::ResultExt;
use snafu::Snafu;

/// Error saving or loading declaration trees
#[derive(Debug, Snafu)]
pub enum ModelError {
    #[snafu(display("Could not open model {}: {}", path.display(), source))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not create model {}: {}", path.display(), source))]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Malformed model {}: {}", path.display(), source))]
    Decode {
        path: PathBuf,
        source: bincode::Error,
    },

    #[snafu(display("Could not write model {}: {}", path.display(), source))]
    Encode {
        path: PathBuf,
        source: bincode::Error,
    },
}

/// Write `trees` to `path`, replacing any existing file
pub fn save(path: &Path, trees: &[DeclTree]) -> Result<(), ModelError> {
    let file = File::create(path).context(Create { path })?;
    bincode::serialize_into(BufWriter::new(file), trees).context(Encode { path })
}

/// Read trees written by [`save`]
pub fn load(path: &Path) -> Result<Vec<DeclTree>, ModelError> {
    let file = File::open(path).context(Open { path })?;
    bincode::deserialize_from(BufReader::new(file)).context(Decode { path })
}
