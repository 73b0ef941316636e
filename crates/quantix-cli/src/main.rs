//! CLI for quantix — query, control and stream a Quantis PCI quantum RNG.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "quantix")]
#[command(about = "quantix — query, control and stream a Quantis PCI quantum RNG")]
#[command(version = quantix_core::VERSION)]
struct Cli {
    /// Device node prefix (default: $QUANTIX_DEVICE_PREFIX or /dev/qrandom)
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Device index
    #[arg(long, short = 'd', global = true, default_value = "0")]
    device: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count Quantis devices and list their nodes
    Scan,

    /// Show driver, board, module and PCI information
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read random bytes and print them
    Read {
        /// Number of bytes
        #[arg(long, short = 'n', default_value = "16")]
        bytes: usize,

        /// Output format
        #[arg(long, default_value = "hex", value_parser = ["hex", "list", "raw"])]
        format: String,
    },

    /// Print a sample of every value type the device can produce
    Sample {
        /// Values per type
        #[arg(long, default_value = "5")]
        count: usize,
    },

    /// Stream random bytes to stdout (pipe-friendly)
    Stream {
        /// Output format
        #[arg(long, default_value = "raw", value_parser = ["raw", "hex", "base64"])]
        format: String,

        /// Total bytes (0 = until the pipe closes)
        #[arg(long, default_value = "0")]
        bytes: usize,

        /// Bytes per device read
        #[arg(long, default_value = "4096")]
        chunk: usize,
    },

    /// Measure throughput per block size and per typed reader
    Bench {
        /// Iterations per measurement
        #[arg(long, default_value = "1000")]
        iterations: usize,
    },

    /// Reset the board
    Reset,

    /// Enable or disable one quantum module
    Module {
        action: ModuleAction,

        /// Module number (0-3)
        module: u8,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModuleAction {
    Enable,
    Disable,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let prefix = commands::resolve_prefix(cli.prefix.as_deref());
    let device = cli.device;

    let result = match cli.command {
        Commands::Scan => {
            commands::scan::run(&prefix);
            Ok(())
        }
        Commands::Info { json } => commands::info::run(&prefix, device, json),
        Commands::Read { bytes, format } => commands::read::run(&prefix, device, bytes, &format),
        Commands::Sample { count } => commands::sample::run(&prefix, device, count),
        Commands::Stream {
            format,
            bytes,
            chunk,
        } => commands::stream::run(&prefix, device, &format, bytes, chunk),
        Commands::Bench { iterations } => commands::bench::run(&prefix, device, iterations),
        Commands::Reset => commands::control::reset(&prefix, device),
        Commands::Module { action, module } => match action {
            ModuleAction::Enable => commands::control::module(&prefix, device, module, true),
            ModuleAction::Disable => commands::control::module(&prefix, device, module, false),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
