use clap::CommandFactory;
use clap_complete::{Shell, generate_to};
use std::env;
use std::io::Error;
use std::path::Path;

include!("src/args.rs");

/// Completion directories that are only populated when the shell is set up for the user.
const COMPLETION_DIRS: [(Shell, &str); 2] = [
    (Shell::Fish, ".config/fish/completions"),
    (Shell::Bash, ".local/share/bash-completion/completions"),
];

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/args.rs");

    let home_dir = match env::var_os("HOME") {
        None => return Ok(()),
        Some(d) => d,
    };

    let mut cmd = Args::command();
    for (shell, dir) in COMPLETION_DIRS {
        let completions_dir = Path::new(&home_dir).join(dir);
        if !completions_dir.exists() {
            continue;
        }
        let path = generate_to(shell, &mut cmd, "antigen", completions_dir)?;
        println!("cargo:warning=completion file is generated for {shell}: {path:?}");
    }

    Ok(())
}
