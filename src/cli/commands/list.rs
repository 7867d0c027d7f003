//! `passcodec list`: show the registered schemes.

use crate::cli::{build_manager, output, Cli};
use crate::errors::Result;

pub fn execute(cli: &Cli) -> Result<()> {
    let manager = build_manager(cli)?;
    let ids = manager.ids();

    output::info(&format!("{} scheme(s) registered", ids.len()));
    output::print_schemes_table(&ids);
    output::tip("Detection tries schemes in this order and stops at the first claim.");
    Ok(())
}
