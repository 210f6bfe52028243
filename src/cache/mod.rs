//! Fingerprint-gated cache for generated artifacts.
//!
//! An artifact is stored next to a fingerprint of the source text it was
//! generated from:
//! ```text
//! quiz/{content}.json       # artifact (JSON)
//! quiz/{content}_hash.txt   # hex MD5 of the source text
//! ```
//! A call whose source fingerprint matches the stored one is served from
//! disk; any other call invokes the generator exactly once and replaces
//! both files. A failed generation leaves both files untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StudyError};
use crate::storage::{read_optional, tmp_path_for};

/// Stable digest of a source text (lowercase hex MD5)
pub fn content_fingerprint(source_text: &str) -> String {
    format!("{:x}", md5::compute(source_text.as_bytes()))
}

/// One cached artifact and its fingerprint file
pub struct GenerationCache {
    artifact_path: PathBuf,
    fingerprint_path: PathBuf,
}

impl GenerationCache {
    pub fn new(artifact_path: PathBuf, fingerprint_path: PathBuf) -> Self {
        Self {
            artifact_path,
            fingerprint_path,
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn fingerprint_path(&self) -> &Path {
        &self.fingerprint_path
    }

    fn stored_fingerprint(&self) -> Result<Option<String>> {
        Ok(read_optional(&self.fingerprint_path)?.map(|f| f.trim().to_string()))
    }

    /// Whether the cached artifact was generated from exactly `source_text`
    pub fn is_fresh(&self, source_text: &str) -> Result<bool> {
        self.matches(&content_fingerprint(source_text))
    }

    fn matches(&self, fingerprint: &str) -> Result<bool> {
        if !self.artifact_path.exists() {
            return Ok(false);
        }
        Ok(self.stored_fingerprint()?.as_deref() == Some(fingerprint))
    }

    /// Return the cached artifact for `source_text`, or generate, persist and
    /// return a new one.
    pub fn get_or_regenerate<T, F>(&self, source_text: &str, generate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> Result<T>,
    {
        let fingerprint = content_fingerprint(source_text);

        if self.matches(&fingerprint)? {
            log::debug!("Cache hit for {}", self.artifact_path.display());
            let content = fs::read_to_string(&self.artifact_path)?;
            return serde_json::from_str(&content)
                .map_err(|e| StudyError::corrupt(&self.artifact_path, e));
        }

        log::info!("Cache miss for {}, regenerating", self.artifact_path.display());
        let artifact = generate(source_text)?;
        self.store(&artifact, &fingerprint)?;
        Ok(artifact)
    }

    /// Write artifact and fingerprint. Both land in temp files first. The old
    /// fingerprint is removed before the artifact is replaced and the new one
    /// is renamed in last, so an interrupted store leaves no fingerprint and
    /// the next call regenerates.
    fn store<T: Serialize>(&self, artifact: &T, fingerprint: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(artifact)
            .map_err(|e| StudyError::corrupt(&self.artifact_path, e))?;

        if let Some(parent) = self.artifact_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(parent) = self.fingerprint_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let artifact_tmp = tmp_path_for(&self.artifact_path);
        let fingerprint_tmp = tmp_path_for(&self.fingerprint_path);
        fs::write(&artifact_tmp, json)?;
        fs::write(&fingerprint_tmp, fingerprint)?;

        self.invalidate()?;
        fs::rename(&artifact_tmp, &self.artifact_path)?;
        fs::rename(&fingerprint_tmp, &self.fingerprint_path)?;
        Ok(())
    }

    /// Drop the fingerprint so the next call regenerates
    pub fn invalidate(&self) -> Result<()> {
        if self.fingerprint_path.exists() {
            fs::remove_file(&self.fingerprint_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn create_test_cache() -> (GenerationCache, TempDir) {
        let temp = TempDir::new().unwrap();
        let cache = GenerationCache::new(
            temp.path().join("quiz").join("Sorting.json"),
            temp.path().join("quiz").join("Sorting_hash.txt"),
        );
        (cache, temp)
    }

    fn upper(calls: &Cell<usize>) -> impl FnOnce(&str) -> Result<Vec<String>> + '_ {
        move |source: &str| {
            calls.set(calls.get() + 1);
            Ok(vec![source.to_uppercase()])
        }
    }

    #[test]
    fn test_fingerprint_is_stable_md5() {
        assert_eq!(content_fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_fingerprint("abc"), content_fingerprint("abc"));
        assert_ne!(content_fingerprint("abc"), content_fingerprint("abd"));
    }

    #[test]
    fn test_second_call_is_cache_hit() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);

        let first: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        let second: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert!(cache.is_fresh("heap").unwrap());
        assert_eq!(
            fs::read_to_string(cache.fingerprint_path()).unwrap(),
            content_fingerprint("heap")
        );
    }

    #[test]
    fn test_changed_source_regenerates_once() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);

        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        let changed: Vec<String> = cache.get_or_regenerate("heaq", upper(&calls)).unwrap();
        let again: Vec<String> = cache.get_or_regenerate("heaq", upper(&calls)).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(changed, vec!["HEAQ"]);
        assert_eq!(again, changed);
        assert_eq!(
            fs::read_to_string(cache.fingerprint_path()).unwrap(),
            content_fingerprint("heaq")
        );
        assert!(fs::read_to_string(cache.artifact_path()).unwrap().contains("HEAQ"));
    }

    #[test]
    fn test_missing_fingerprint_is_a_miss() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);

        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        cache.invalidate().unwrap();
        assert!(!cache.is_fresh("heap").unwrap());

        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_missing_artifact_is_a_miss() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);

        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        fs::remove_file(cache.artifact_path()).unwrap();

        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_generation_keeps_stale_cache() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);
        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();

        let result: Result<Vec<String>> = cache.get_or_regenerate("stack", |_| {
            Err(StudyError::MalformedArtifact("bad".into()))
        });

        assert!(matches!(result, Err(StudyError::MalformedArtifact(_))));
        assert!(cache.is_fresh("heap").unwrap());
        assert!(fs::read_to_string(cache.artifact_path()).unwrap().contains("HEAP"));
    }

    #[test]
    fn test_new_artifact_without_fingerprint_regenerates() {
        let (cache, _temp) = create_test_cache();
        let calls = Cell::new(0);
        let _: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();

        // State left by a store for "stack" that stopped after the artifact rename
        fs::write(cache.artifact_path(), r#"["STACK"]"#).unwrap();
        fs::remove_file(cache.fingerprint_path()).unwrap();

        let value: Vec<String> = cache.get_or_regenerate("heap", upper(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(value, vec!["HEAP"]);
    }

    #[test]
    fn test_failed_artifact_replace_drops_old_fingerprint() {
        let (cache, _temp) = create_test_cache();
        // A non-empty directory in place of the artifact makes the rename fail
        fs::create_dir_all(cache.artifact_path().join("blocker")).unwrap();
        fs::write(cache.fingerprint_path(), content_fingerprint("heap")).unwrap();

        let result: Result<Vec<String>> =
            cache.get_or_regenerate("stack", |_| Ok(vec!["STACK".to_string()]));

        assert!(result.is_err());
        assert!(!cache.fingerprint_path().exists());
        assert!(!cache.is_fresh("heap").unwrap());
    }

    #[test]
    fn test_failed_first_generation_writes_nothing() {
        let (cache, _temp) = create_test_cache();
        let result: Result<Vec<String>> = cache.get_or_regenerate("heap", |_| {
            Err(StudyError::GeneratorUnavailable("offline".into()))
        });

        assert!(result.is_err());
        assert!(!cache.artifact_path().exists());
        assert!(!cache.fingerprint_path().exists());
    }

    #[test]
    fn test_corrupt_artifact_is_reported() {
        let (cache, _temp) = create_test_cache();
        fs::create_dir_all(cache.artifact_path().parent().unwrap()).unwrap();
        fs::write(cache.artifact_path(), "{not json").unwrap();
        fs::write(cache.fingerprint_path(), content_fingerprint("heap")).unwrap();

        let result: Result<Vec<String>> = cache.get_or_regenerate("heap", |_| Ok(vec![]));
        assert!(matches!(result, Err(StudyError::CorruptData { .. })));
    }
}
