use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::cli::Cli;

pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
}
