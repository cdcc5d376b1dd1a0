use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use soli::cli::{handle_decrypt_command, handle_encrypt_command, handle_key_command, KeyArgs, USAGE};
use soli::{Session, SoliError};

#[derive(Parser)]
#[command(
    name = "soli",
    version,
    about = "Encrypt, decrypt and inspect data with a single persisted age key",
    long_about = "soli keeps one age X25519 keypair under $HOME/config/soli, \
                  generating it on first use. It encrypts standard input to that \
                  key, decrypts standard input with it, and prints the key \
                  material in bases 2 through 32."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt stdin to your key, writing armored ciphertext to stdout
    Encrypt,

    /// Decrypt stdin with your key, writing plaintext to stdout
    Decrypt,

    /// Show your key in several bases, or the bytes of an integer literal
    Key(KeyArgs),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(err),
    };

    if let Err(e) = soli::telemetry::init_tracing() {
        eprintln!("soli: {:#}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("soli: {:#}", err);
            let code = err
                .downcast_ref::<SoliError>()
                .map(SoliError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("{}", USAGE);
        return Err(SoliError::Usage("missing command".into()).into());
    };

    let session = Session::open()?;

    match command {
        Commands::Encrypt => handle_encrypt_command(&session)?,
        Commands::Decrypt => handle_decrypt_command(&session)?,
        Commands::Key(args) => handle_key_command(&session, &args)?,
    }

    Ok(())
}

/// Help and version exit cleanly; anything else is a usage error
fn report_parse_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            println!("{}", USAGE);
            let _ = err.print();
            ExitCode::from(SoliError::Usage(String::new()).exit_code())
        }
    }
}
