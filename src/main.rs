use clap::{Parser, Subcommand};
use serial_switch_agent::config::{Config, ConfigLoader};
use serial_switch_agent::protocol::{CommandScript, InteractiveExit, StdinConsole};
use serial_switch_agent::{
    logging, AppResult, ExitCodes, Operation, Outcome, Provisioner, SystemPortOpener,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Manage a network switch over its serial console.",
    long_about = "Finds the serial port a switch is attached to, skips its initial configuration \
                  dialog, and then resets it, brings up a management address, replays a \
                  configuration file, or relays your own commands."
)]
struct Args {
    /// Configuration file to use instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Probe only this port instead of enumerating the host.
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive mode: relay your commands to the switch.
    Inter,
    /// Reset the switch to its default configuration.
    Reset,
    /// Load a configuration file of line-by-line commands.
    ///
    /// A line that is exactly `!` sends ENTER; lines starting with `#` are comments.
    Config {
        /// Path to the configuration file.
        file: PathBuf,
    },
    /// Set the enable secret and bring up the management interface.
    Bringup,
    /// List the serial ports that would be probed.
    Ports,
}

fn load_config(path: Option<&PathBuf>) -> AppResult<Config> {
    let loader = match path {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    Ok(loader.into_config())
}

fn run(args: Args) -> AppResult<()> {
    let config = load_config(args.config.as_ref())?;
    logging::init(&config.logging, args.verbose)?;

    // Read the script before touching the device so a bad path fails fast.
    let operation = match args.command {
        Command::Inter => Operation::Interactive,
        Command::Reset => Operation::FactoryReset,
        Command::Bringup => Operation::StaticBringup,
        Command::Config { file } => Operation::Script(CommandScript::from_file(file)?),
        Command::Ports => {
            let mut opener = SystemPortOpener;
            let candidates = Provisioner::new(&config, &mut opener).candidates(None)?;
            for name in candidates {
                println!("{name}");
            }
            return Ok(());
        }
    };

    let mut opener = SystemPortOpener;
    let mut provisioner = Provisioner::new(&config, &mut opener);
    let candidates = provisioner.candidates(args.port.as_deref())?;
    let outcome = provisioner.run(&candidates, &operation, &mut StdinConsole)?;

    match outcome {
        Outcome::Playback(report) => {
            println!();
            println!(
                "Configuration completed: {} command(s), {} blank enter(s).",
                report.commands_sent, report.blank_enters
            );
        }
        Outcome::Recipe(report) => {
            println!();
            println!("Done: {} command(s) sent.", report.commands_sent);
        }
        Outcome::Interactive { exit, .. } => {
            if exit == InteractiveExit::EndOfInput {
                println!();
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    println!("Welcome to the serial switch manager");
    println!();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
