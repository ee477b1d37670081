use std::env;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookgroup_core::config::{expand_path, Config, Settings, VectorSourceKind};
use bookgroup_core::corpus::Corpus;
use bookgroup_core::traits::VectorSource;
use bookgroup_embed::{get_default_embedder, DenseSource, HashedEmbedder, DEFAULT_MAX_LEN};
use bookgroup_engine::{GroupingEngine, Manifest, RunControl, RunSummary, ScanProgress};
use bookgroup_text::{KeyphraseExtractor, TfidfVectorizer};

const USAGE: &str = "Usage: bookgroup [--input PATH] [--output PATH] [--threshold T] [--source tfidf|embedding|hashed] [--themes N | --no-themes] [--sequential]";

fn usage_error(msg: &str) -> ! {
    eprintln!("Error: {}\n{}", msg, USAGE);
    std::process::exit(2);
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i + 1).map(String::as_str).unwrap_or_else(|| usage_error(&format!("{} requires a value", flag)))
}

/// Apply command-line overrides on top of the loaded settings.
fn apply_args(settings: &mut Settings, args: &[String]) {
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--input" | "-i" => { settings.data.input = value(args, i, "--input").to_string(); i += 1; }
        "--output" | "-o" => { settings.data.output = value(args, i, "--output").to_string(); i += 1; }
        "--threshold" | "-t" => {
            settings.engine.threshold = value(args, i, "--threshold").parse().unwrap_or_else(|_| usage_error("--threshold requires a number")); i += 1;
        }
        "--source" | "-s" => {
            settings.engine.vector_source = value(args, i, "--source").parse().unwrap_or_else(|e| usage_error(&format!("{}", e))); i += 1;
        }
        "--themes" => {
            settings.engine.theme_count = value(args, i, "--themes").parse().unwrap_or_else(|_| usage_error("--themes requires a count")); i += 1;
        }
        "--no-themes" => settings.engine.theme_count = 0,
        "--sequential" => settings.scan.parallel = false,
        "--help" | "-h" => { println!("{}", USAGE); std::process::exit(0); }
        other => usage_error(&format!("unknown argument '{}'", other)),
    } i += 1; }
}

fn build_source(settings: &Settings) -> anyhow::Result<Box<dyn VectorSource>> {
    Ok(match settings.engine.vector_source {
        VectorSourceKind::Tfidf => Box::new(TfidfVectorizer::new((&settings.tfidf).into())),
        VectorSourceKind::Embedding => {
            let model_dir = settings.embedding.model_dir.as_deref().map(expand_path);
            let max_len = settings.embedding.max_len.unwrap_or(DEFAULT_MAX_LEN);
            let embedder = get_default_embedder(model_dir.as_deref(), max_len).context("loading sentence encoder")?;
            Box::new(DenseSource::from_embedder(embedder))
        }
        VectorSourceKind::Hashed => Box::new(DenseSource::from_embedder(Box::new(HashedEmbedder::default()))),
    })
}

fn progress_bar(rows: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(rows as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")?.progress_chars("#>-"));
    Ok(pb)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    apply_args(&mut settings, &args);
    settings.validate()?;

    let input = expand_path(&settings.data.input);
    let output = expand_path(&settings.data.output);
    println!("Book Similarity Grouping\n========================");
    println!("Input: {}", input.display());
    let corpus = Corpus::load(&input)?;
    let source = build_source(&settings)?;
    println!("Source: {}  threshold: {}", source.name(), settings.engine.threshold);
    let mut engine = GroupingEngine::new(source, settings.engine.clone())?.with_scan(settings.scan.clone());
    if settings.engine.theme_count > 0 {
        engine = engine.with_themes(Box::new(KeyphraseExtractor::new()));
    }

    let pb = progress_bar(corpus.len())?;
    let sink = |p: ScanProgress| {
        pb.set_position(p.rows_done as u64);
        pb.set_message(format!("{} edges", p.edges_found));
    };
    let report = engine.run(corpus.items(), &RunControl::default().with_progress(&sink))?;
    pb.finish_and_clear();

    let manifest = Manifest::build(&report, corpus.items(), settings.report.description_preview_chars)?;
    save_manifest(&manifest, &output)?;
    info!(groups = manifest.len(), output = %output.display(), "done");

    let summary = RunSummary::new(&report, corpus.items(), settings.report.sample_groups)?;
    println!("\n{}", summary);
    println!("Groups written to {}", output.display());
    Ok(())
}

fn save_manifest(manifest: &Manifest, output: &Path) -> anyhow::Result<()> {
    manifest.save(output).with_context(|| format!("writing {}", output.display()))
}
