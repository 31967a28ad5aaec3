// One error type for the whole program.
// Every variant states *where* things went wrong, and names the path or value involved.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing a frame to the window failed

    #[error("Config error: {0}")]
    Config(String), // Bad arguments, detected before any window exists

    #[error("file '{}' does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("could not load image '{}': {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not load image '{}': it has no pixels", .0.display())]
    EmptyImage(PathBuf),

    #[error("could not export image '{}': {source}", .path.display())]
    ImageExport {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_path() {
        let err = Error::MissingInput(PathBuf::from("shots/a.png"));
        assert_eq!(err.to_string(), "file 'shots/a.png' does not exist");

        let err = Error::EmptyImage(PathBuf::from("b.jpg"));
        assert!(err.to_string().contains("'b.jpg'"));
    }
}
