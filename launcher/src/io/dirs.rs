//! Input verification and output tree provisioning.
//!
//! Only the root process touches the filesystem. Other ranks return an empty
//! [`Provisioned`] and trust the root's result.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, instrument, warn};

use crate::core::paths::{RunPaths, backup_path};
use crate::core::role::ProcessRole;
use crate::error::{Error, Result};

/// Timestamp layout of backup directory names, in local time. One-second
/// resolution.
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What provisioning did to the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provisioned {
    /// Where a pre-existing output directory was moved, if there was one.
    pub backup: Option<PathBuf>,
}

impl Provisioned {
    /// Human-readable warning about the backup; empty when nothing was moved.
    pub fn warning(&self) -> String {
        match &self.backup {
            Some(backup) => format!(
                "Output directory exists; old output renamed to {}",
                backup.display()
            ),
            None => String::new(),
        }
    }
}

/// Current backup timestamp, wall-clock local time.
pub fn backup_stamp() -> String {
    Local::now().format(BACKUP_STAMP_FORMAT).to_string()
}

/// Verify the input directory and lay out a fresh output tree.
///
/// Steps, root only: fail if the input directory is missing; move an existing
/// output directory aside to `<output>__backup@<stamp>`; create the output
/// directory and its fixed subdirectories.
pub fn verify_and_provision(paths: &RunPaths, role: &ProcessRole) -> Result<Provisioned> {
    provision_with_stamp(paths, role, &backup_stamp())
}

/// [`verify_and_provision`] with a caller-supplied backup timestamp.
#[instrument(skip_all, fields(rank = role.rank(), input = %paths.input_dir.display(), output = %paths.output_dir.display()))]
pub fn provision_with_stamp(
    paths: &RunPaths,
    role: &ProcessRole,
    stamp: &str,
) -> Result<Provisioned> {
    if !role.is_root() {
        debug!("not root, skipping directory provisioning");
        return Ok(Provisioned::default());
    }

    if !paths.input_dir.is_dir() {
        return Err(Error::MissingInputDirectory {
            path: paths.input_dir.clone(),
        });
    }

    let backup = backup_existing_output(&paths.output_dir, stamp)?;

    for dir in paths.output_tree() {
        create_dir(&dir)?;
    }
    info!(subdirs = paths.output_tree().len() - 1, "output tree ready");

    Ok(Provisioned { backup })
}

fn backup_existing_output(output_dir: &Path, stamp: &str) -> Result<Option<PathBuf>> {
    if !output_dir.exists() {
        return Ok(None);
    }
    if !output_dir.is_dir() {
        return Err(Error::OutputNotDirectory {
            path: output_dir.to_path_buf(),
        });
    }
    let backup = backup_path(output_dir, stamp);
    // A same-second backup would land on an existing name; refuse rather than
    // let rename replace it.
    if backup.exists() {
        return Err(Error::Backup {
            from: output_dir.to_path_buf(),
            to: backup,
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "backup target already exists",
            ),
        });
    }
    fs::rename(output_dir, &backup).map_err(|source| Error::Backup {
        from: output_dir.to_path_buf(),
        to: backup.clone(),
        source,
    })?;
    warn!(backup = %backup.display(), "existing output directory moved aside");
    Ok(Some(backup))
}

/// Create `path` if missing; an existing directory is left alone.
fn create_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| Error::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::OUTPUT_SUBDIRS;

    fn scratch() -> (tempfile::TempDir, RunPaths) {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = RunPaths::new(temp.path().join("input"), temp.path().join("output"));
        (temp, paths)
    }

    fn assert_fresh_tree(paths: &RunPaths) {
        assert!(paths.output_dir.is_dir());
        for name in OUTPUT_SUBDIRS {
            assert!(paths.output_dir.join(name).is_dir(), "missing {name}");
        }
    }

    #[test]
    fn creates_tree_without_warning_when_output_is_new() {
        let (_temp, paths) = scratch();
        fs::create_dir(&paths.input_dir).expect("mkdir input");

        let provisioned =
            provision_with_stamp(&paths, &ProcessRole::serial(), "20260101_000000")
                .expect("provision");

        assert_eq!(provisioned, Provisioned::default());
        assert!(provisioned.warning().is_empty());
        assert_fresh_tree(&paths);
    }

    #[test]
    fn existing_output_is_backed_up_and_recreated() {
        let (temp, paths) = scratch();
        fs::create_dir(&paths.input_dir).expect("mkdir input");
        fs::create_dir(&paths.output_dir).expect("mkdir output");
        fs::write(paths.output_dir.join("result.nc"), "old").expect("write old result");

        let provisioned =
            provision_with_stamp(&paths, &ProcessRole::serial(), "20260101_000000")
                .expect("provision");

        let backup = temp.path().join("output__backup@20260101_000000");
        assert_eq!(provisioned.backup.as_deref(), Some(backup.as_path()));
        assert!(!provisioned.warning().is_empty());
        assert!(provisioned.warning().contains("output__backup@20260101_000000"));
        assert_eq!(
            fs::read_to_string(backup.join("result.nc")).expect("read backup"),
            "old"
        );
        assert_fresh_tree(&paths);
        assert!(!paths.output_dir.join("result.nc").exists());
    }

    #[test]
    fn missing_input_fails_before_touching_output() {
        let (_temp, paths) = scratch();

        let err = provision_with_stamp(&paths, &ProcessRole::serial(), "s").unwrap_err();

        assert!(matches!(err, Error::MissingInputDirectory { ref path } if *path == paths.input_dir));
        assert!(!paths.output_dir.exists());
    }

    #[test]
    fn input_that_is_a_file_counts_as_missing() {
        let (_temp, paths) = scratch();
        fs::write(&paths.input_dir, "not a dir").expect("write file");

        let err = provision_with_stamp(&paths, &ProcessRole::serial(), "s").unwrap_err();
        assert!(matches!(err, Error::MissingInputDirectory { .. }));
    }

    #[test]
    fn output_that_is_a_file_is_fatal() {
        let (_temp, paths) = scratch();
        fs::create_dir(&paths.input_dir).expect("mkdir input");
        fs::write(&paths.output_dir, "not a dir").expect("write file");

        let err = provision_with_stamp(&paths, &ProcessRole::serial(), "s").unwrap_err();
        assert!(matches!(err, Error::OutputNotDirectory { .. }));
    }

    #[test]
    fn same_stamp_backup_collision_is_refused() {
        let (temp, paths) = scratch();
        fs::create_dir(&paths.input_dir).expect("mkdir input");
        fs::create_dir(&paths.output_dir).expect("mkdir output");
        fs::create_dir(temp.path().join("output__backup@dup")).expect("mkdir backup");

        let err = provision_with_stamp(&paths, &ProcessRole::serial(), "dup").unwrap_err();

        assert!(matches!(err, Error::Backup { .. }));
        assert!(paths.output_dir.is_dir());
    }

    #[test]
    fn non_root_performs_no_filesystem_action() {
        let (_temp, paths) = scratch();

        let provisioned =
            provision_with_stamp(&paths, &ProcessRole::new(1, 0), "s").expect("provision");

        assert_eq!(provisioned, Provisioned::default());
        assert!(!paths.output_dir.exists());
    }

    #[test]
    fn backup_stamp_is_compact_and_non_empty() {
        let stamp = backup_stamp();
        assert_eq!(stamp.len(), "20260101_000000".len());
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn backup_stamp_follows_local_wall_clock() {
        let before = Local::now().naive_local();
        let stamp = backup_stamp();
        let after = Local::now().naive_local();

        let parsed = chrono::NaiveDateTime::parse_from_str(&stamp, BACKUP_STAMP_FORMAT)
            .expect("parse stamp");
        let slack = chrono::Duration::seconds(1);
        assert!(parsed >= before - slack, "{parsed} before {before}");
        assert!(parsed <= after + slack, "{parsed} after {after}");
    }
}
