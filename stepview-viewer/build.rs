use clap::{Arg, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("stepv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive terminal viewer for STEP exchange files")
        .arg(
            Arg::new("path")
                .help("Path to the exchange file to open")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .help("Write diagnostics to this file")
                .value_hint(ValueHint::FilePath),
        );

    generate_to(Bash, &mut cmd, "stepv", &outdir)?;
    generate_to(Zsh, &mut cmd, "stepv", &outdir)?;
    generate_to(Fish, &mut cmd, "stepv", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
