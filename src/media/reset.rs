use std::io::ErrorKind;
use std::path::Path;

/// Remove every entry under `dir`, creating it when missing. An empty or
/// missing directory is not an error. Returns the number of entries removed.
pub async fn reset_output_dir(dir: &Path) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tokio::fs::create_dir_all(dir).await?;
            log::debug!("created output directory {}", dir.display());
            return Ok(0);
        }
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
        removed += 1;
    }
    log::info!("reset {}: removed {} entries", dir.display(), removed);
    Ok(removed)
}
