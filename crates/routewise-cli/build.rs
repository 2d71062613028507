//! Renders man pages for the binary and each subcommand into `OUT_DIR/man`.

use clap::CommandFactory;
use clap_mangen::Man;
use std::path::{Path, PathBuf};

mod cli {
    include!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/cli.rs"));
}

fn render(cmd: clap::Command, path: &Path) -> std::io::Result<()> {
    let mut page = Vec::new();
    Man::new(cmd).render(&mut page)?;
    std::fs::write(path, page)
}

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_default();
    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir)?;

    let cmd = cli::Cli::command();
    for sub in cmd.get_subcommands() {
        let page = man_dir.join(format!("routewise-{}.1", sub.get_name()));
        render(sub.clone(), &page)?;
    }
    render(cmd, &man_dir.join("routewise.1"))
}
