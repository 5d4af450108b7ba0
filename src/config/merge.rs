//! Merge rules for client settings.

pub(crate) mod merge_policy;
