use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::debug;
use pdfunlock::{Confirm, Error, Outcome, OverwritePolicy, resolve_destination, unlock_with_policy};

/// Remove password protection from a PDF document.
#[derive(Parser, Debug)]
#[command(name = "unlockutil", version)]
struct Args {
    /// Locked PDF file
    #[arg(value_name = "input file")]
    input: PathBuf,

    /// Where to save the unlocked PDF [default: <input>_unlocked.pdf]
    #[arg(short, long, value_name = "output file")]
    output: Option<PathBuf>,

    /// Password of the document; prompted for when omitted
    #[arg(short, long)]
    password: Option<String>,

    /// Overwrite the output file without asking
    #[arg(short, long, conflicts_with = "no_clobber")]
    force: bool,

    /// Never overwrite an existing output file
    #[arg(short, long)]
    no_clobber: bool,
}

impl Args {
    fn policy(&self) -> OverwritePolicy {
        if self.force {
            OverwritePolicy::Always
        } else if self.no_clobber {
            OverwritePolicy::Never
        } else {
            OverwritePolicy::Ask
        }
    }
}

/// Asks on stderr and reads the answer from stdin.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm_overwrite(&mut self, path: &Path) -> io::Result<bool> {
        eprint!("'{}' already exists. Overwrite? [y/N] ", path.display());
        io::stderr().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init()
}

fn run(args: Args) -> pdfunlock::Result<Outcome> {
    let policy = args.policy();
    let destination = resolve_destination(&args.input, args.output.as_deref()).unwrap_or_default();
    debug!("Unlock {} into {}", args.input.display(), destination.display());

    let password = match args.password {
        Some(password) => password,
        None => {
            // Don't ask for a password that could not be used.
            if !args.input.is_file() {
                return Err(Error::InputNotFound(args.input));
            }
            if destination.as_os_str().is_empty() {
                return Err(Error::MissingDestination);
            }
            rpassword::prompt_password("Password: ")
                .map_err(|e| Error::OperationFailed(format!("password prompt: {}", e)))?
        }
    };

    unlock_with_policy(&args.input, &password, &destination, policy, &mut TerminalConfirm)
}

fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::IncorrectPassword => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    logging();
    let args = Args::parse();

    match run(args) {
        Ok(Outcome::Unlocked(report)) => {
            if !report.was_encrypted {
                eprintln!("Note: the input was not password protected.");
            }
            println!("Password removed!");
            println!("Saved as: {}", report.destination.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Declined(path)) => {
            eprintln!("Left '{}' untouched.", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            exit_code(&err)
        }
    }
}
