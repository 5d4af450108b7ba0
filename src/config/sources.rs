//! Settings sources, lowest precedence first: environment, user file, explicit file.

pub(crate) mod environment;
pub(crate) mod explicit_file;
pub(crate) mod user_file;
