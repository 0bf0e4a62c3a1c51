use std::{io::ErrorKind, path::Path};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};

/// Reads the whole file under a shared lock. A missing file is reported as [None] rather than an
/// error, since absence is a valid state for files created lazily.
pub async fn read_shared(path: &Path) -> Result<Option<String>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    file.lock_shared()?;
    let mut contents = String::new();
    let result = file.read_to_string(&mut contents).await;
    file.unlock_async().await?;
    result?;

    Ok(Some(contents))
}

/// Replaces the contents of a file with the result of `update` while holding an exclusive lock,
/// so that concurrent writers from other processes can't interleave a read and a write. The file
/// is created if it doesn't exist, in which case `update` receives an empty string.
pub async fn rewrite_exclusive(
    path: &Path,
    update: impl FnOnce(String) -> Result<String>,
) -> Result<()> {
    let mut file = File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await?;

    // Semi-safe acquire-release for a file
    file.lock_exclusive()?;
    let result = rewrite_with_file(&mut file, update).await;
    file.unlock_async().await?;
    result
}

async fn rewrite_with_file(
    file: &mut File,
    update: impl FnOnce(String) -> Result<String>,
) -> Result<()> {
    let mut previous = String::new();
    file.read_to_string(&mut previous).await?;

    let next = update(previous)?;

    file.rewind().await?;
    file.set_len(0).await?;
    file.write_all(next.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{read_shared, rewrite_exclusive};

    #[tokio::test]
    async fn test_read_missing_file() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(read_shared(&dir.path().join("missing")).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_rewrite_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("file");

        rewrite_exclusive(&path, |previous| {
            assert!(previous.is_empty());
            Ok("first".into())
        })
        .await?;

        assert_eq!(read_shared(&path).await?.as_deref(), Some("first"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rewrite_shorter_content_truncates() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("file");

        rewrite_exclusive(&path, |_| Ok("a much longer line of text".into())).await?;
        rewrite_exclusive(&path, |previous| {
            assert_eq!(previous, "a much longer line of text");
            Ok("short".into())
        })
        .await?;

        assert_eq!(read_shared(&path).await?.as_deref(), Some("short"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_keeps_contents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("file");

        rewrite_exclusive(&path, |_| Ok("kept".into())).await?;
        let result = rewrite_exclusive(&path, |_| Err(anyhow::anyhow!("nope"))).await;

        assert!(result.is_err());
        assert_eq!(read_shared(&path).await?.as_deref(), Some("kept"));
        Ok(())
    }
}
