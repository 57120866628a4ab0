use std::io::{self, BufRead};

use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use ulid::Ulid;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "ulid", version, about = "Create or inspect ULIDs", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a ULID from the current time or from a given source value
    Build {
        #[command(flatten)]
        source: BuildSource,
    },
    /// Show the properties of a ULID
    Show {
        /// The ULID to inspect; the special value `-` reads one line from stdin
        #[arg(value_name = "ulid")]
        ulid: String,
        #[command(flatten)]
        projection: Projection,
    },
}

/// Where the identifier value comes from.  At most one may be given;
/// without any, the current time is used.
#[derive(Args)]
#[group(multiple = false)]
struct BuildSource {
    /// Create from a 128-bit integer
    #[arg(long, value_name = "int")]
    from_int: Option<u128>,
    /// Create from a 32 character hex value
    #[arg(long, value_name = "str")]
    from_hex: Option<String>,
    /// Create from a base32 encoded string of length 26
    #[arg(long, value_name = "str")]
    from_str: Option<String>,
    /// Create from a timestamp, either as float in secs or int in millis
    #[arg(long, value_name = "int|float")]
    from_timestamp: Option<String>,
    /// Create from an ISO 8601 datetime; the offset is required
    #[arg(long, value_name = "iso8601")]
    from_datetime: Option<String>,
    /// Create from a given UUID; the bytes are taken over unchanged
    #[arg(long, value_name = "uuid")]
    from_uuid: Option<Uuid>,
}

/// Single projection to print instead of the full dump.
#[derive(Args)]
#[group(multiple = false)]
struct Projection {
    /// Convert to UUID
    #[arg(long)]
    uuid: bool,
    /// Convert to hex
    #[arg(long)]
    hex: bool,
    /// Convert to int
    #[arg(long)]
    int: bool,
    /// Show the timestamp in epoch seconds
    #[arg(long, visible_alias = "ts")]
    timestamp: bool,
    /// Show the datetime of the timestamp part
    #[arg(long, visible_alias = "dt")]
    datetime: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {

        // ── Build ────────────────────────────────────────────────────────────
        Commands::Build { source } => {
            let ulid = build_ulid(&source)?;
            println!("{ulid}");
        }

        // ── Show ─────────────────────────────────────────────────────────────
        Commands::Show { ulid, projection } => {
            let value = if ulid == "-" { read_stdin_line()? } else { ulid };
            let ulid: Ulid = value.parse()?;
            if projection.uuid {
                println!("{}", ulid.to_uuid());
            } else if projection.hex {
                println!("{}", ulid.hex());
            } else if projection.int {
                println!("{}", ulid.to_u128());
            } else if projection.timestamp {
                println!("{}", ulid.timestamp());
            } else if projection.datetime {
                println!("{}", ulid.datetime());
            } else {
                println!("ULID:      {ulid}");
                println!("Hex:       {}", ulid.hex());
                println!("Int:       {}", ulid.to_u128());
                println!("Timestamp: {}", ulid.timestamp());
                println!("Datetime:  {}", ulid.datetime());
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn build_ulid(source: &BuildSource) -> Result<Ulid, Box<dyn std::error::Error>> {
    let ulid = if let Some(value) = source.from_int {
        Ulid::from(value)
    } else if let Some(value) = &source.from_hex {
        Ulid::from_hex(value)?
    } else if let Some(value) = &source.from_str {
        value.parse()?
    } else if let Some(value) = &source.from_timestamp {
        parse_timestamp(value)?
    } else if let Some(value) = &source.from_datetime {
        Ulid::from_datetime(DateTime::parse_from_rfc3339(value)?)?
    } else if let Some(value) = source.from_uuid {
        Ulid::from_uuid(value)
    } else {
        Ulid::new()
    };
    Ok(ulid)
}

/// An integer is read as epoch milliseconds, anything else as float seconds.
fn parse_timestamp(value: &str) -> Result<Ulid, Box<dyn std::error::Error>> {
    let ulid = match value.parse::<u64>() {
        Ok(millis) => Ulid::from_timestamp_ms(millis)?,
        Err(_) => Ulid::from_timestamp(value.parse::<f64>()?)?,
    };
    Ok(ulid)
}

fn read_stdin_line() -> Result<String, Box<dyn std::error::Error>> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
