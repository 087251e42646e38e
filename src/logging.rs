use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Route `log` output to an append-only file; the terminal belongs to the UI.
/// Level comes from `RUST_LOG` and defaults to info.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // A second init (e.g. from tests) keeps the first logger.
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file_and_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("lapring.log");
        init_file_logger(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("state");
        fs::write(&blocker, b"not a directory").unwrap();
        assert!(init_file_logger(&blocker.join("lapring.log")).is_err());
    }
}
