use anyhow::{Context, Result};
use arrow::array::{Array, UInt64Array};
use newsetl::{
    dataset::{read_csv, write_dataset},
    normalize::{url_uid, BODY, HOST, NEWSPAPER_UID, TITLE, UID},
    tokenize::Language,
    transform::{TransformConfig, Transformer},
    EtlError,
};
use std::{collections::HashSet, fs, path::PathBuf};
use tempfile::tempdir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const RAW: &str = "url,title,body
https://elpais.com/politica/gobierno-anuncia-reforma,Gobierno anuncia reforma,\"El gobierno anunció
una reforma fiscal.\"
https://elpais.com/deportes/big-news-story,,Hola mundo 123 test
http://www.example.com/a/b,Otra nota,\"Primera línea
segunda línea\"
";

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,newsetl=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn config(input: PathBuf, column: &str) -> TransformConfig {
    TransformConfig {
        input,
        column: column.to_string(),
        resources_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources"),
        language: Language::Spanish,
    }
}

#[test]
fn test_transform_end_to_end() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = dir.path().join("elpais_2024_01_01_articles.csv");
    fs::write(&input, RAW)?;

    let ds = Transformer::new(config(input, BODY))?.run()?;

    assert_eq!(ds.num_rows(), 3);
    assert_eq!(ds.index_column(), Some(UID));

    let papers = ds.string_column(NEWSPAPER_UID)?;
    assert!(papers.iter().all(|p| p == Some("elpais")));

    let hosts = ds.string_column(HOST)?;
    assert_eq!(hosts.value(0), "elpais.com");
    assert_eq!(hosts.value(2), "www.example.com");

    let titles = ds.string_column(TITLE)?;
    assert_eq!(titles.null_count(), 0);
    assert_eq!(titles.value(1), "big news story");
    assert_eq!(titles.value(2), "Otra nota");

    let bodies = ds.string_column(BODY)?;
    assert!(bodies.iter().flatten().all(|b| !b.contains('\n')));
    assert_eq!(bodies.value(2), "Primera líneasegunda línea");

    let index: Vec<_> = ds.index_values()?.context("dataset has no index")?;
    let unique: HashSet<_> = index.iter().collect();
    assert_eq!(unique.len(), 3);
    assert_eq!(index[2], Some(url_uid("http://www.example.com/a/b").as_str()));

    let counts = ds
        .column("n_tokenize_body")?
        .as_any()
        .downcast_ref::<UInt64Array>()
        .context("count column is not UInt64")?;
    // "hola mundo 123 test": none are stopwords, digits dropped
    assert_eq!(counts.value(1), 3);
    assert_eq!(counts.null_count(), 0);

    Ok(())
}

#[test]
fn test_written_output_reloads() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = dir.path().join("eluniversal_.csv");
    fs::write(&input, RAW)?;
    let output = dir.path().join("clean_eluniversal_.csv");

    let ds = Transformer::new(config(input, TITLE))?.run()?;
    write_dataset(&ds, &output)?;

    let reloaded = read_csv(&output)?;
    assert_eq!(reloaded.num_rows(), 3);
    assert_eq!(
        reloaded.column_names(),
        vec![
            "uid",
            "url",
            "title",
            "body",
            "newspaper_uid",
            "host",
            "n_tokenize_title"
        ]
    );
    Ok(())
}

#[test]
fn test_unknown_column_fails_run() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = dir.path().join("elpais_.csv");
    fs::write(&input, RAW)?;

    let err = Transformer::new(config(input, "summary"))?.run().unwrap_err();
    assert!(matches!(err, EtlError::MissingColumn(c) if c == "summary"));
    Ok(())
}

#[test]
fn test_missing_input_fails_run() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let err = Transformer::new(config(dir.path().join("elpais_.csv"), BODY))?
        .run()
        .unwrap_err();
    assert!(matches!(err, EtlError::Io(_)));
    Ok(())
}
