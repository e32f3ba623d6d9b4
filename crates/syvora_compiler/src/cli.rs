use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The source file to compile.
    pub input: Option<PathBuf>,

    /// Also write the object file here.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
