use anyhow::{Context, Result};
use clap::Parser;
use newsetl::{
    dataset::write_dataset,
    tokenize::Language,
    transform::{default_output_path, TransformConfig, Transformer},
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Transform stage: clean one raw newspaper CSV.
#[derive(Parser, Debug)]
struct Args {
    /// The path to the dirty data; the name before the first `_` is the newspaper uid
    filename: PathBuf,

    /// Text column to tokenize
    #[arg(long, env = "NEWSETL_COLUMN")]
    column: String,

    /// Where to write the cleaned data (`.parquet` for Parquet) [default: clean_<filename>]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding stopwords/<language>
    #[arg(long, env = "NEWSETL_RESOURCES", default_value = "resources")]
    resources: PathBuf,

    #[arg(long, value_enum, default_value_t = Language::Spanish)]
    language: Language,

    /// Also print the cleaned table to stdout
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.filename));

    let transformer = Transformer::new(TransformConfig {
        input: args.filename.clone(),
        column: args.column,
        resources_dir: args.resources,
        language: args.language,
    })
    .context("loading language resources")?;

    let dataset = transformer
        .run()
        .with_context(|| format!("cleaning {}", args.filename.display()))?;

    write_dataset(&dataset, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(rows = dataset.num_rows(), output = %output.display(), "done");

    if args.print {
        let table = dataset.to_output_batch()?;
        println!("{}", arrow::util::pretty::pretty_format_batches(&[table])?);
    }
    Ok(())
}
