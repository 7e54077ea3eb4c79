use clap::Parser;
use log::error;

mod commands;
mod provider;

/// Generates intentionally malformed Bitcoin transactions for protocol-conformance testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log each step and every corrupted field to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: commands::Command,
}

fn main() {
    let args: Args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match args.command.handler().run() {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{} failed: {}", args.command.name(), e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
