//! File storage for encrypted bundles.

use anyhow::{Context, Result, anyhow};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::crypto::AesBundle;

/// A file holding one serialized [`AesBundle`].
///
/// Writes are atomic: either the previous file or the new one is on disk,
/// never a partial write.
#[derive(Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `true` if the storage file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the entire storage file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Saves data to the storage file using atomic write.
    ///
    /// 1. Writing data to a temporary file with random name
    /// 2. Syncing the temporary file to disk
    /// 3. Atomically replacing the old file with the new one
    /// 4. Syncing the parent directory to ensure the rename is persisted
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;

        let tmp_path = self.random_tmp_path()?;

        // securely create temp file (fail if exists)
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .context("failed to create temporary file")?;

        tmp_file.write_all(data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = self.atomic_replace(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        // fsync directory
        #[cfg(not(target_os = "windows"))]
        File::open(parent)?.sync_all()?;

        debug!(path = %self.path.display(), bytes = data.len(), "storage file written");
        Ok(())
    }

    /// Writes `bundle` as pretty-printed JSON.
    pub fn save_bundle(&self, bundle: &AesBundle) -> Result<()> {
        let mut json = bundle.to_json();
        json.push('\n');
        self.save(json.as_bytes())
    }

    /// Reads a bundle previously written by [`Storage::save_bundle`].
    pub fn load_bundle(&self) -> Result<AesBundle> {
        let data = self.load()?;
        serde_json::from_slice(&data)
            .with_context(|| format!("{} is not a valid AES bundle", self.path.display()))
    }

    /// Returns the path to the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory; a bare file name lives in the current directory.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Generates a unique temporary file path in the same directory.
    ///
    /// Format: `filename.tmp.<randomhex>`
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8]; // 64 bit entropy
        fill(&mut buf).map_err(|_| anyhow!("OS random generator unavailable"))?;

        let rand_string = buf.iter().map(|b| format!("{:02x}", b)).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .with_context(|| format!("{} has no file name", self.path.display()))?
            .to_string_lossy();

        let tmp_name = format!("{}.tmp.{}", file_name, rand_string);

        Ok(self.path.with_file_name(tmp_name))
    }

    /// Atomically replaces the target file with the temporary file.
    ///
    /// Uses Windows `ReplaceFileW` API with `REPLACEFILE_WRITE_THROUGH` flag.
    /// `ReplaceFileW` needs an existing target, so a first save is a rename.
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        if !self.path.exists() {
            fs::rename(tmp_path, &self.path).context("rename failed")?;
            return Ok(());
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY:
        // - Strings are valid UTF-16 and null-terminated
        // - Pointers remain valid during the call
        // - Windows does not retain the pointers after return
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            let err = std::io::Error::last_os_error();
            return Err(err).context("atomic replace failed");
        }

        Ok(())
    }

    /// On Unix, `rename()` is atomic when both paths are on the same filesystem.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        fs::rename(tmp_path, &self.path).context("atomic rename failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_bundle() -> AesBundle {
        AesBundle {
            salt_b64: "c2FsdHNhbHRzYWx0c2FsdA==".into(),
            nonce_b64: "bm9uY2Vub25jZTE=".into(),
            ciphertext_b64: "Y2lwaGVydGV4dA==".into(),
        }
    }

    // --------------------------------------------------
    // LOAD TESTS
    // --------------------------------------------------

    #[test]
    fn load_returns_written_data() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("bundle.json"));
        storage.save(b"hello world").unwrap();

        assert_eq!(storage.load().unwrap(), b"hello world");
    }

    #[test]
    fn load_fails_if_file_does_not_exist() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("missing.json"));

        let err = storage.load().unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    // --------------------------------------------------
    // BUNDLE TESTS
    // --------------------------------------------------

    #[test]
    fn bundle_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("bundle.json"));

        storage.save_bundle(&sample_bundle()).unwrap();
        assert_eq!(storage.load_bundle().unwrap(), sample_bundle());
    }

    #[test]
    fn saved_bundle_is_pretty_json_with_three_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        Storage::new(&path).save_bundle(&sample_bundle()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn load_bundle_rejects_garbage() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("bundle.json"));
        storage.save(b"{not json").unwrap();

        assert!(storage.load_bundle().is_err());
    }

    // --------------------------------------------------
    // EXISTS TESTS
    // --------------------------------------------------

    #[test]
    fn exists_tracks_saves() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("bundle.json"));

        assert!(!storage.exists());
        storage.save(b"data").unwrap();
        assert!(storage.exists());
    }

    // --------------------------------------------------
    // RANDOM TMP PATH TESTS
    // --------------------------------------------------

    #[test]
    fn random_tmp_path_is_a_unique_sibling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let storage = Storage::new(path.clone());

        let a = storage.random_tmp_path().unwrap();
        let b = storage.random_tmp_path().unwrap();

        assert_eq!(a.parent(), path.parent());
        assert_ne!(a, path);
        assert_ne!(a, b);
    }

    #[test]
    fn random_tmp_path_needs_a_file_name() {
        let storage = Storage::new("/");
        assert!(storage.random_tmp_path().is_err());
    }

    // --------------------------------------------------
    // SAVE EDGE CASES
    // --------------------------------------------------

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let storage = Storage::new(path.clone());

        storage.save(b"first").unwrap();
        storage.save(b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn tmp_file_is_removed_after_success() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("bundle.json"));
        storage.save(b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        assert_eq!(entries, vec!["bundle.json"]);
    }

    #[test]
    fn parent_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("bundle.json");

        Storage::new(nested.clone()).save(b"data").unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        let storage = Storage::new("bundle.json");
        assert_eq!(storage.parent_dir(), Path::new("."));
    }
}
