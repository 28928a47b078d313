use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use huffpack::{CodeTable, CompressedData, HuffmanCodec, HuffmanError, HuffmanTree};

const EXTENSION: &str = "huff";

/// Compress and decompress files with static Huffman coding.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into a .huff container.
    Compress(Io),
    /// Restore the original bytes from a .huff container.
    Decompress(Io),
    /// Print container metadata without writing anything.
    Inspect {
        input: PathBuf,
        /// Also print the code assigned to each symbol.
        #[arg(long)]
        codes: bool,
        /// Also print the rebuilt Huffman tree.
        #[arg(long)]
        tree: bool,
    },
}

#[derive(Args, Debug)]
struct Io {
    input: PathBuf,
    /// Output path. Defaults to INPUT.huff when compressing and to INPUT
    /// without its .huff suffix when decompressing.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".out");
        PathBuf::from(name)
    }
}

/// Wrap a container error, telling a damaged file apart from other failures.
fn container_error(err: HuffmanError, path: &Path) -> anyhow::Error {
    let message = if err.is_corrupt_input() {
        format!("{} is not a valid or complete .{EXTENSION} container", path.display())
    } else {
        format!("failed to read container {}", path.display())
    };
    anyhow::Error::new(err).context(message)
}

fn compress(io: &Io) -> Result<()> {
    let output = io.output.clone().unwrap_or_else(|| compressed_path(&io.input));
    let data = fs::read(&io.input).with_context(|| format!("reading {}", io.input.display()))?;

    let container = HuffmanCodec::compress(&data)
        .with_context(|| format!("compressing {}", io.input.display()))?;
    let bytes = container.serialize()?;
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    info!(
        input = %io.input.display(),
        output = %output.display(),
        original = data.len(),
        compressed = bytes.len(),
        "compressed"
    );
    Ok(())
}

fn decompress(io: &Io) -> Result<()> {
    let output = io.output.clone().unwrap_or_else(|| decompressed_path(&io.input));
    let bytes = fs::read(&io.input).with_context(|| format!("reading {}", io.input.display()))?;

    let data = HuffmanCodec::decompress_from_slice(&bytes)
        .map_err(|err| container_error(err, &io.input))?;
    fs::write(&output, &data).with_context(|| format!("writing {}", output.display()))?;

    info!(
        input = %io.input.display(),
        output = %output.display(),
        restored = data.len(),
        "decompressed"
    );
    Ok(())
}

fn inspect(input: &Path, codes: bool, tree: bool) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let container =
        CompressedData::deserialize(&bytes).map_err(|err| container_error(err, input))?;
    print!("{}", container.summary());

    let CompressedData::Packed { frequencies, .. } = &container else {
        debug!("empty container has no code table");
        return Ok(());
    };
    if !(codes || tree) {
        return Ok(());
    }

    let huffman_tree = HuffmanTree::build(frequencies)?;
    if codes {
        println!();
        println!("symbol  count       code");
        let table = CodeTable::generate(&huffman_tree);
        for (byte, code) in table.iter() {
            println!(
                "{:>4}    {:<10}  {}",
                byte,
                frequencies.get(byte),
                code
            );
        }
    }
    if tree {
        println!();
        print!("{huffman_tree}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Command::Compress(io) => compress(io),
        Command::Decompress(io) => decompress(io),
        Command::Inspect { input, codes, tree } => inspect(input, *codes, *tree),
    }
}
