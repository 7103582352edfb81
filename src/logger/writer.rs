//! Log file handling

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use std::fs::{File, OpenOptions};
use std::sync::Mutex;

/// Opens the configured log file, creating its directory first
///
/// The returned `Mutex<File>` implements `MakeWriter`, so it can be handed
/// straight to a `fmt` layer.
pub fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    let path_str = config.path.display().to_string();

    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| LoggerError::io(&path_str, e))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(config.append)
        .truncate(!config.append)
        .open(&config.path)
        .map_err(|e| LoggerError::io(&path_str, e))?;

    Ok(Mutex::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::LogFormat;
    use std::io::Write;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path: dir.path().join("nested").join("app.log"),
            append,
            format: LogFormat::Json,
        }
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);
        open_log_file(&config).unwrap();
        assert!(config.path.exists());
    }

    #[test]
    fn test_append_preserves_content() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);
        {
            let file = open_log_file(&config).unwrap();
            writeln!(file.lock().unwrap(), "first").unwrap();
        }
        {
            let file = open_log_file(&config).unwrap();
            writeln!(file.lock().unwrap(), "second").unwrap();
        }
        let content = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_truncate_when_not_appending() {
        let dir = TempDir::new().unwrap();
        let mut config = file_config(&dir, true);
        {
            let file = open_log_file(&config).unwrap();
            writeln!(file.lock().unwrap(), "old").unwrap();
        }
        config.append = false;
        open_log_file(&config).unwrap();
        assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "");
    }
}
