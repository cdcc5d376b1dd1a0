//! Key inspection CLI command
//!
//! Prints the session key in several numeric bases, or the raw bytes of an
//! integer literal given on the command line.

use std::io::Write;

use clap::Args;

use crate::display::base::{parse_int_literal, render};
use crate::display::key::{format_key_report, KeyReport};
use crate::error::SoliResult;
use crate::session::Session;

/// Arguments for `soli key`
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Integer literal to show as bytes (0x, 0o, 0b or a leading 0 select the base)
    #[arg(allow_hyphen_values = true)]
    pub literal: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Handle the key command, printing to stdout
pub fn handle_key_command(session: &Session, args: &KeyArgs) -> SoliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_key_report(session, args, &mut out)
}

/// Write the key report for `args` to `out`
pub fn write_key_report<W: Write>(session: &Session, args: &KeyArgs, out: &mut W) -> SoliResult<()> {
    let output = match &args.literal {
        Some(literal) => {
            let bytes = parse_int_literal(literal)?;
            let report = KeyReport::for_literal(&bytes);
            if args.json {
                report.to_json()? + "\n"
            } else {
                format_key_report(&report)
            }
        }
        None => {
            let private = session.key().private()?;
            let rendered = render(&private);
            let report = KeyReport::for_key(session.id(), &rendered);
            if args.json {
                report.to_json()? + "\n"
            } else {
                format_key_report(&report)
            }
        }
    };

    out.write_all(output.as_bytes())?;
    out.flush()?;
    Ok(())
}
