use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use document_converter::export;
use document_converter::logging::init_logging;
use document_converter::notify::Notifier;
use document_converter::remote::RemoteDocument;
use document_converter::{
    get_supported_formats, BatchRunner, Config, FileSource, IdentityProvider, Language,
    LocalFile, LocalIdentity, Message, ParseOptions, Record, Session,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "docjson")]
#[command(about = "Convert documents into normalized JSON")]
#[command(version)]
struct Cli {
    /// Message language (tr or en)
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and export them as JSON
    Convert {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write one <name>.json per record into this directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write all records into one ZIP archive (`--zip` or `--zip=PATH`)
        #[arg(long, num_args = 0..=1, require_equals = true, value_name = "PATH")]
        zip: Option<Option<PathBuf>>,

        /// Print only the last parsed record's payload
        #[arg(long)]
        stdout: bool,
    },
    /// Wrap a saved Google Docs API response as a record
    ImportRemote { response: PathBuf },
    /// List supported file extensions
    Formats,
    /// Print this installation's device id
    DeviceId,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    config.validate()?;
    init_logging(&config.log_level, config.log_format);

    let identity = Arc::new(LocalIdentity::new(config.data_dir.clone()));

    match cli.command {
        Commands::Convert {
            files,
            out,
            zip,
            stdout,
        } => convert(&config, identity, files, out, zip, stdout).await?,
        Commands::ImportRemote { response } => {
            let raw = std::fs::read_to_string(&response)
                .with_context(|| format!("Failed to read {}", response.display()))?;
            let document: RemoteDocument = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a document response", response.display()))?;
            let record = Record::from_remote(&*identity, document);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Formats => {
            for format in get_supported_formats() {
                println!("{}", format);
            }
        }
        Commands::DeviceId => println!("{}", identity.device_id()),
    }

    Ok(())
}

async fn convert(
    config: &Config,
    identity: Arc<LocalIdentity>,
    paths: Vec<PathBuf>,
    out: Option<PathBuf>,
    zip: Option<Option<PathBuf>>,
    stdout: bool,
) -> Result<()> {
    let print_all = out.is_none() && zip.is_none() && !stdout;
    let files: Vec<Box<dyn FileSource>> = paths
        .into_iter()
        .map(|path| Box::new(LocalFile::new(path)) as Box<dyn FileSource>)
        .collect();

    let runner = BatchRunner::new(identity)
        .with_max_files(config.max_batch)
        .with_options(ParseOptions::with_language(config.language));
    let outcome = runner.run(files).await?;

    let notifier = Notifier::new(config.notify_delay());
    if let Some(summary) = outcome.error_summary() {
        notifier.notify_transient(summary);
        show(&notifier);
    }
    if outcome.is_empty() {
        bail!("no file could be converted");
    }

    let mut session = Session::new(config.language);
    session.add_all(outcome.records);

    if let Some(dir) = out {
        write_records(&dir, session.records())?;
    }

    if let Some(target) = zip {
        let path = target.unwrap_or_else(|| PathBuf::from(&config.archive_name));
        if let Err(e) = write_archive(&path, session.records()) {
            notifier.notify_blocking(format!("{}: {:#}", Message::ZipError.text(config.language), e));
            show(&notifier);
            return Err(e);
        }
    }

    if stdout {
        if let Some(text) = session.clipboard_text()? {
            println!("{}", text);
        }
    } else if print_all {
        println!("{}", serde_json::to_string_pretty(session.records())?);
    }

    Ok(())
}

fn write_records(dir: &Path, records: &[Record]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for entry in export::archive_entries(records)? {
        let path = dir.join(&entry.file_name);
        std::fs::write(&path, entry.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Wrote record");
    }
    info!(count = records.len(), dir = %dir.display(), "Records written");
    Ok(())
}

fn write_archive(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create archive {}", path.display()))?;
    let mut writer = export::write_archive(records, BufWriter::new(file))
        .with_context(|| format!("Failed to write archive {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush archive {}", path.display()))?;
    info!(path = %path.display(), "Archive created");
    Ok(())
}

fn show(notifier: &Notifier) {
    if let Some(notification) = notifier.current() {
        eprintln!("{}", notification.message);
    }
}
