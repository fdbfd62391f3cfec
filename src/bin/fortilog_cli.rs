use std::path::PathBuf;
use structopt::StructOpt;

use fortilog::config::Config;
use fortilog::output::{check_extension, JobSummary, ResultWriter};
use fortilog::{AnalysisType, FormatDetector, LogParsingService};

/// Fortinet log parser command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "fortilog", about = "Fortinet VPN and firewall log parser")]
pub struct Cli {
    /// Path to configuration file (defaults are used if it does not exist)
    #[structopt(short, long, default_value = "fortilog.toml")]
    config: PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Extract successful VPN logins
    Vpn {
        /// Path to log file or CSV export
        #[structopt(short, long)]
        file: PathBuf,
        /// Write the CSV here instead of the results directory
        #[structopt(short, long)]
        output: Option<PathBuf>,
    },
    /// Aggregate sent bytes per public destination IP
    Firewall {
        /// Path to log file or CSV export
        #[structopt(short, long)]
        file: PathBuf,
        /// Write the CSV here instead of the results directory
        #[structopt(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract sent bytes of SSL tunnel shutdowns for one user
    VpnShutdown {
        /// Path to log file or CSV export
        #[structopt(short, long)]
        file: PathBuf,
        /// User to filter by (case-insensitive)
        #[structopt(short, long)]
        user: String,
        /// Write the CSV here instead of the results directory
        #[structopt(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the detected format of a file
    Detect {
        /// Path to log file or CSV export
        #[structopt(short, long)]
        file: PathBuf,
    },
    /// Parse several files concurrently and print a summary for each
    Batch {
        /// Analysis to run: vpn, firewall or vpn_shutdown
        #[structopt(short, long)]
        analysis: AnalysisType,
        /// User to filter by (vpn_shutdown only)
        #[structopt(short, long)]
        user: Option<String>,
        /// Files to parse
        #[structopt(parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "fortilog.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::from_args();

    let config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };

    env_logger::Builder::from_default_env()
        .filter_level(config.logging.level_filter())
        .init();

    if !cli.config.exists() {
        log::debug!("Config file {:?} not found, using defaults", cli.config);
    }

    match cli.command {
        Command::Vpn { file, output } => run_single(&config, file, AnalysisType::Vpn, None, output)?,
        Command::Firewall { file, output } => {
            run_single(&config, file, AnalysisType::Firewall, None, output)?
        }
        Command::VpnShutdown { file, user, output } => {
            run_single(&config, file, AnalysisType::VpnShutdown, Some(user), output)?
        }
        Command::Detect { file } => {
            println!("{:?}", FormatDetector::detect(&file));
        }
        Command::Batch { analysis, user, files } => run_batch(&config, analysis, user, files)?,
        Command::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
    }

    Ok(())
}

/// Parse one file, write its CSV and print the job summary
fn run_single(
    config: &Config,
    file: PathBuf,
    analysis: AnalysisType,
    user: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        eprintln!("File not found: {:?}", file);
        std::process::exit(1);
    }
    check_extension(&file, &config.input.allowed_extensions)?;

    let dataset = LogParsingService::new().parse(&file, analysis, user.as_deref())?;

    let written = match output {
        Some(path) => {
            ResultWriter::write_to(&dataset, &path)?;
            path
        }
        None => ResultWriter::new(config.output.results_dir.clone()).write(&dataset, user.as_deref())?,
    };

    let summary = JobSummary::from_dataset(&dataset, Some(written.as_path()), config.output.preview_rows)?;
    println!("{}", summary.to_json()?);
    Ok(())
}

/// Parse every file as its own task; failures are reported per file
fn run_batch(
    config: &Config,
    analysis: AnalysisType,
    user: Option<String>,
    files: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let preview_rows = config.output.preview_rows;

    runtime.block_on(async {
        let service = LogParsingService::new();
        let mut tasks = Vec::new();

        for file in files {
            if let Err(e) = check_extension(&file, &config.input.allowed_extensions) {
                log::error!("Skipping {:?}: {}", file, e);
                continue;
            }
            let user = user.clone();
            let task = tokio::spawn(async move {
                let result = service.parse_async(file.clone(), analysis, user).await;
                (file, result)
            });
            tasks.push(task);
        }

        for task in tasks {
            match task.await {
                Ok((file, Ok(dataset))) => match JobSummary::from_dataset(&dataset, None, preview_rows) {
                    Ok(summary) => println!(
                        "{}: {} record(s){}",
                        file.display(),
                        summary.records,
                        summary
                            .total_mb
                            .map(|mb| format!(", {:.2} MB", mb))
                            .unwrap_or_default()
                    ),
                    Err(e) => log::error!("Failed to summarise {:?}: {}", file, e),
                },
                Ok((file, Err(e))) => log::error!("Failed to parse {:?}: {}", file, e),
                Err(e) => log::error!("Parse task failed: {}", e),
            }
        }
    });

    Ok(())
}
