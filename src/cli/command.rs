//! The command contract every registered resource action implements.

use super::environment::Environment;
use super::parse::{ExclusiveGroup, ParamSpec, ParsedArgs};
use crate::error::CliError;
use crate::formatting::Output;

/// One resource action, e.g. `sshkey list`.
pub trait CliCommand {
    /// Action name; `None` marks the namespace's default action.
    fn name(&self) -> Option<&'static str>;

    /// One-line summary shown in help listings.
    fn summary(&self) -> &'static str;

    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    fn exclusive_groups(&self) -> Vec<ExclusiveGroup> {
        Vec::new()
    }

    /// Run the body. `Ok(None)` prints nothing.
    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError>;
}
