//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod checksums;
pub(crate) mod status;
