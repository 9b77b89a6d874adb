//! Position of this process within the cooperating process group.

use crate::error::{Error, Result};

/// Rank environment variables exported by common MPI launchers, in lookup order.
pub const RANK_VARS: [&str; 4] = [
    "OMPI_COMM_WORLD_RANK",
    "PMI_RANK",
    "PMIX_RANK",
    "SLURM_PROCID",
];

/// Rank designated as root unless stated otherwise.
pub const DEFAULT_ROOT_RANK: u32 = 0;

/// This process's rank and the root rank, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRole {
    rank: u32,
    root: u32,
}

impl ProcessRole {
    pub fn new(rank: u32, root: u32) -> Self {
        Self { rank, root }
    }

    /// A single-process run.
    pub fn serial() -> Self {
        Self::new(DEFAULT_ROOT_RANK, DEFAULT_ROOT_RANK)
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn root(&self) -> u32 {
        self.root
    }

    pub fn is_root(&self) -> bool {
        self.rank == self.root
    }
}

/// Build the role from launcher variables; `lookup` maps a name to its value.
///
/// The first variable present wins. No variable at all means a serial run.
pub fn role_from_lookup<F>(lookup: F) -> Result<ProcessRole>
where
    F: Fn(&str) -> Option<String>,
{
    for var in RANK_VARS {
        if let Some(value) = lookup(var) {
            let rank = value.trim().parse::<u32>().map_err(|_| Error::InvalidRank {
                var,
                value: value.clone(),
            })?;
            return Ok(ProcessRole::new(rank, DEFAULT_ROOT_RANK));
        }
    }
    Ok(ProcessRole::serial())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_launcher_variables_means_serial_root() {
        let role = role_from_lookup(lookup_from(&[])).expect("role");
        assert_eq!(role, ProcessRole::serial());
        assert!(role.is_root());
    }

    #[test]
    fn open_mpi_rank_takes_precedence() {
        let role = role_from_lookup(lookup_from(&[
            ("SLURM_PROCID", "0"),
            ("OMPI_COMM_WORLD_RANK", "3"),
        ]))
        .expect("role");
        assert_eq!(role.rank(), 3);
        assert!(!role.is_root());
    }

    #[test]
    fn garbage_rank_is_an_error() {
        let err = role_from_lookup(lookup_from(&[("PMI_RANK", "two")])).unwrap_err();
        assert!(matches!(err, Error::InvalidRank { var: "PMI_RANK", .. }));
    }

    #[test]
    fn explicit_root_rank_is_honoured() {
        let role = ProcessRole::new(2, 2);
        assert!(role.is_root());
        assert!(!ProcessRole::new(0, 2).is_root());
    }
}
