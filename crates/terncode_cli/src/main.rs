use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use terncode_core::rule::{expand_rules, PortEncoder};
use terncode_io::{split_rules, write_tcam_table, DefaultRuleLoader, RuleLoader};

#[derive(Parser, Debug)]
#[command(name = "terncode", about = "Compile ACL port ranges into TCAM ternary patterns")]
struct Cli {
    /// Rule file in classbench filter format.
    rules: PathBuf,
    /// Range encoding scheme.
    #[arg(long, value_enum, default_value = "cgfe")]
    scheme: Scheme,
    /// Chunk bit width for the chunked schemes (must divide 16).
    #[arg(long, default_value_t = 2)]
    chunk: u8,
    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scheme {
    /// Naive binary prefix expansion.
    Prefix,
    /// Symmetric range Gray encoding.
    Srge,
    /// Directed range prefix encoding.
    Dirpe,
    /// Chunked Gray fence encoding.
    Cgfe,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !matches!(cli.chunk, 1 | 2 | 4 | 8) {
        return Err(format!("--chunk must be one of 1, 2, 4, 8; got {}", cli.chunk).into());
    }
    let coder = match cli.scheme {
        Scheme::Prefix => PortEncoder::Prefix,
        Scheme::Srge => PortEncoder::Srge,
        Scheme::Dirpe => PortEncoder::dirpe(cli.chunk),
        Scheme::Cgfe => PortEncoder::cgfe(cli.chunk),
    };

    let content = fs::read_to_string(&cli.rules)?;
    let rules = DefaultRuleLoader::default()
        .load(&content)
        .map_err(|e| format!("cannot parse {}: {e}", cli.rules.display()))?;
    let (ip_table, port_table) = split_rules(&rules);

    let entries = expand_rules(&port_table, &coder);

    let emitted = match &cli.out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let mut file = fs::File::create(path)?;
            write_tcam_table(&mut file, &ip_table, &entries)?
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            let n = write_tcam_table(&mut lock, &ip_table, &entries)?;
            lock.flush()?;
            n
        }
    };

    eprintln!("rules: {}", rules.len());
    eprintln!("tcam entries: {emitted}");
    if !rules.is_empty() {
        eprintln!(
            "expansion factor: {:.2}x",
            emitted as f64 / rules.len() as f64
        );
    }
    Ok(())
}
