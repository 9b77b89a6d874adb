//! Side-effecting parts of startup.

pub mod channel;
pub mod dirs;
pub mod fenv;
pub mod group;
pub mod inparam;
