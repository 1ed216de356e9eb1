use clap::Parser;
use cli::Cli;
use logging::*;
use std::process;

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    let cli = Cli::parse();

    if let Err(err) = cli::run(cli).await {
        error!(log, "command failed"; "error" => %err);
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
