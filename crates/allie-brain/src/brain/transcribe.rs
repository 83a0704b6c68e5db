use std::path::{Path, PathBuf};

use allie_core::error::{AllieError, Result};
use allie_core::types::new_id;
use allie_llm::provider::TranscriptionProvider;

use super::Brain;

/// Stage an upload on disk, hand it to `provider`, and remove it again.
///
/// The provider sniffs the audio format from the extension, so the staged
/// file is renamed to `.mp3` before submission. The file is removed whether
/// or not transcription succeeds.
pub async fn transcribe_file<P: TranscriptionProvider>(
    provider: &P,
    uploads_dir: &Path,
    bytes: &[u8],
) -> Result<String> {
    tokio::fs::create_dir_all(uploads_dir).await?;
    let staged = uploads_dir.join(new_id());
    write_staged(&staged, bytes).await?;

    let audio: PathBuf = staged.with_extension("mp3");
    if let Err(e) = tokio::fs::rename(&staged, &audio).await {
        remove_quietly(&staged).await;
        return Err(e.into());
    }

    let result = provider.transcribe(&audio).await;
    remove_quietly(&audio).await;
    result
}

/// Write an upload to `path`, leaving nothing behind when the write fails
/// part way.
async fn write_staged(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = tokio::fs::write(path, bytes).await {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            remove_quietly(path).await;
        }
        return Err(e.into());
    }
    Ok(())
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove staged upload");
    }
}

impl Brain {
    pub async fn transcribe(&self, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(AllieError::BadRequest("No audio file uploaded".to_string()));
        }
        tracing::info!(bytes = bytes.len(), "transcribing upload");
        let dir = Path::new(&self.config.server.uploads_dir);
        transcribe_file(&self.llm, dir, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeTranscriber {
        fail: bool,
        seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
    }

    impl FakeTranscriber {
        fn new(fail: bool) -> Self {
            Self { fail, seen: Mutex::new(None) }
        }
    }

    impl TranscriptionProvider for FakeTranscriber {
        async fn transcribe(&self, path: &Path) -> Result<String> {
            let bytes = tokio::fs::read(path).await?;
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), bytes));
            if self.fail {
                Err(AllieError::Transcription("model unavailable".to_string()))
            } else {
                Ok("hello world".to_string())
            }
        }
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_success_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FakeTranscriber::new(false);

        let text = transcribe_file(&provider, dir.path(), b"ID3audio").await.unwrap();
        assert_eq!(text, "hello world");

        let (path, bytes) = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(bytes, b"ID3audio");
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_failure_still_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FakeTranscriber::new(true);

        let err = transcribe_file(&provider, dir.path(), b"ID3audio").await.unwrap_err();
        assert!(matches!(err, AllieError::Transcription(_)));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_failed_staging_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("upload");

        let err = write_staged(&target, b"ID3audio").await.unwrap_err();
        assert!(matches!(err, AllieError::Io(_)));
        assert!(!target.exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_creates_missing_uploads_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        let provider = FakeTranscriber::new(false);

        transcribe_file(&provider, &nested, b"x").await.unwrap();
        assert!(nested.is_dir());
        assert!(dir_is_empty(&nested));
    }
}
