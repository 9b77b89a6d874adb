//! Rank detection from the process launcher environment.

use tracing::debug;

use crate::core::role::{ProcessRole, role_from_lookup};
use crate::error::Result;

/// Determine this process's role from the variables set by `mpirun`/`srun`.
///
/// All processes of a group must be started with identical arguments; this is
/// a launch precondition and is not checked here.
pub fn detect_role() -> Result<ProcessRole> {
    let role = role_from_lookup(|var| std::env::var(var).ok())?;
    debug!(rank = role.rank(), root = role.root(), "process role detected");
    Ok(role)
}
