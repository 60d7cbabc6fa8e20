//! The command-line front end.

pub(crate) mod cli;
