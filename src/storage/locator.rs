//! Resolution of the base directory every persisted artifact lives under.
//!
//! Preference order: the `SMARTSTUDY_DIR` override, a `SmartStudy` folder on
//! a non-system volume, then `./SmartStudy`. A candidate only wins once it
//! has been created and a probe file could be written to it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudyError};

/// Name of the folder created on the chosen volume
pub const BASE_DIR_NAME: &str = "SmartStudy";

/// Environment variable overriding the volume search
pub const BASE_DIR_ENV: &str = "SMARTSTUDY_DIR";

const PROBE_FILE: &str = ".write_probe";

/// Locate (and create) the base directory.
///
/// Only fails when even the working-directory fallback cannot be created.
pub fn locate_base_directory() -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(dir));
    }
    candidates.extend(volume_candidates());

    let fallback = std::env::current_dir()
        .map(|cwd| cwd.join(BASE_DIR_NAME))
        .unwrap_or_else(|_| PathBuf::from(BASE_DIR_NAME));

    locate_in(&candidates, &fallback)
}

/// Pick the first usable candidate, falling back to `fallback`.
pub fn locate_in(candidates: &[PathBuf], fallback: &Path) -> Result<PathBuf> {
    for candidate in candidates {
        match prepare(candidate) {
            Ok(()) => {
                log::info!("Using storage directory {}", candidate.display());
                return Ok(candidate.clone());
            }
            Err(e) => {
                log::debug!("Skipping storage candidate {}: {}", candidate.display(), e);
            }
        }
    }

    prepare(fallback).map_err(|e| {
        StudyError::StorageUnavailable(format!("{}: {}", fallback.display(), e))
    })?;
    log::info!("Using fallback storage directory {}", fallback.display());
    Ok(fallback.to_path_buf())
}

/// Create the directory and prove it is writable
fn prepare(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)
}

#[cfg(windows)]
fn volume_candidates() -> Vec<PathBuf> {
    // C: is the system drive
    ('D'..='Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter)))
        .filter(|root| root.exists())
        .map(|root| root.join(BASE_DIR_NAME))
        .collect()
}

#[cfg(target_os = "macos")]
fn volume_candidates() -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir("/Volumes") else {
        return Vec::new();
    };

    let mut roots: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        // The boot volume shows up as a symlink to `/`
        .filter(|entry| entry.file_type().map_or(false, |t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    roots.sort();
    roots.into_iter().map(|root| root.join(BASE_DIR_NAME)).collect()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn volume_candidates() -> Vec<PathBuf> {
    match fs::read_to_string("/proc/mounts") {
        Ok(mounts) => removable_mount_points(&mounts)
            .into_iter()
            .map(|root| root.join(BASE_DIR_NAME))
            .collect(),
        Err(e) => {
            log::debug!("Cannot read mount table: {}", e);
            Vec::new()
        }
    }
}

#[cfg(not(any(windows, unix)))]
fn volume_candidates() -> Vec<PathBuf> {
    Vec::new()
}

/// Mount points from a `/proc/mounts` table that look like user volumes.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn removable_mount_points(mounts: &str) -> Vec<PathBuf> {
    const PREFIXES: [&str; 3] = ["/media/", "/run/media/", "/mnt/"];
    // WSL exposes the Windows system drive here
    const SYSTEM_MOUNTS: [&str; 1] = ["/mnt/c"];

    mounts
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(unescape_mount_path)
        .filter(|point| PREFIXES.iter().any(|p| point.starts_with(p)))
        .filter(|point| !SYSTEM_MOUNTS.contains(&point.as_str()))
        .map(PathBuf::from)
        .collect()
}

/// The mount table octal-escapes whitespace (`\040` for a space)
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn unescape_mount_path(raw: &str) -> String {
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_usable_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first").join(BASE_DIR_NAME);
        let second = temp.path().join("second").join(BASE_DIR_NAME);
        let fallback = temp.path().join("fallback");

        let chosen = locate_in(&[first.clone(), second], &fallback).unwrap();
        assert_eq!(chosen, first);
        assert!(first.is_dir());
        assert!(!fallback.exists());
        assert!(!first.join(PROBE_FILE).exists());
    }

    #[test]
    fn test_uncreatable_candidate_is_skipped() {
        let temp = TempDir::new().unwrap();
        // A regular file blocks directory creation beneath it
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let broken = blocker.join(BASE_DIR_NAME);
        let good = temp.path().join("volume").join(BASE_DIR_NAME);

        let chosen = locate_in(&[broken, good.clone()], &temp.path().join("fb")).unwrap();
        assert_eq!(chosen, good);
    }

    #[test]
    fn test_falls_back_when_no_volume() {
        let temp = TempDir::new().unwrap();
        let fallback = temp.path().join(BASE_DIR_NAME);

        let chosen = locate_in(&[], &fallback).unwrap();
        assert_eq!(chosen, fallback);
        assert!(chosen.is_dir());
        fs::write(chosen.join("courses.json"), "[]").unwrap();
    }

    #[test]
    fn test_unusable_fallback_is_fatal() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let err = locate_in(&[], &blocker.join(BASE_DIR_NAME)).unwrap_err();
        assert!(matches!(err, StudyError::StorageUnavailable(_)));
    }

    #[test]
    fn test_removable_mount_points() {
        let table = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
proc /proc proc rw 0 0
/dev/sdb1 /media/sam/USB\\040STICK vfat rw 0 0
/dev/sdc1 /run/media/sam/backup ext4 rw 0 0
C:\\134 /mnt/c 9p rw 0 0
/dev/sdd1 /mnt/data ext4 rw 0 0
";
        let points = removable_mount_points(table);
        assert_eq!(
            points,
            vec![
                PathBuf::from("/media/sam/USB STICK"),
                PathBuf::from("/run/media/sam/backup"),
                PathBuf::from("/mnt/data"),
            ]
        );
    }
}
