mod cli;
mod config;
mod embeddings;
mod logging;
mod paths;
mod report;

use std::io::{stdin, stdout, BufRead, Write};
use std::time::Instant;

use anyhow::Context;

use crate::cli::{Command, EmbedArgs, FetchArgs, InspectArgs, ModelArgs};
use crate::embeddings::download;
use crate::embeddings::engine::SentenceEmbedder;
use crate::embeddings::source::{InMemoryVectors, TokenVectorSource};
use crate::embeddings::text_prep;
use crate::embeddings::vec_file;
use crate::report::{ModelReport, SentenceReport};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("[amharic-embed] fatal error: {e:?}");
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;

    // Help/version must work without a writable home directory.
    match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Command::Version => {
            println!("amharic-embed {}", config::VERSION);
            return Ok(());
        }
        _ => {}
    }

    let _logger = logging::init_logging()?;

    let result = match command {
        Command::Embed(a) => run_embed(&a),
        Command::Inspect(a) => run_inspect(&a),
        Command::Fetch(a) => run_fetch(&a),
        Command::Help | Command::Version => Ok(()),
    };
    // Logged here while the logger handle is still alive.
    result.inspect_err(|e| log::error!("Fatal error: {:?}", e))
}

fn load_model(args: &ModelArgs) -> anyhow::Result<(std::path::PathBuf, InMemoryVectors)> {
    let path = paths::resolve_model_path(args.path.as_deref())?;
    if let Some(expected) = &args.sha256 {
        download::verify_file_sha256(&path, expected)?;
    }
    let vectors = vec_file::load_vec_file(&path, &args.load)?;
    Ok((path, vectors))
}

fn run_embed(args: &EmbedArgs) -> anyhow::Result<()> {
    let (_, vectors) = load_model(&args.model)?;
    let embedder: SentenceEmbedder = SentenceEmbedder::default();

    let inputs = if args.texts.is_empty() {
        read_stdin_lines()?
    } else {
        args.texts.clone()
    };

    let sentences: Vec<String> = if args.split {
        inputs.iter().flat_map(|t| text_prep::split_sentences(t)).collect()
    } else {
        inputs
    };

    let started = Instant::now();
    let mut out = stdout().lock();
    let mut embedded: usize = 0;

    for (i, sentence) in sentences.iter().enumerate() {
        let embedding = embedder.embed(sentence, &vectors, &args.options);
        if embedding.is_some() {
            embedded += 1;
        } else {
            log::info!("Sentence #{} not embedded", i + 1);
        }

        let report = SentenceReport::new(sentence, embedding.as_deref());
        if args.json {
            let line = serde_json::to_string(&report).context("failed serializing report")?;
            writeln!(out, "{line}")?;
        } else {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", report.render_text())?;
        }
    }
    out.flush().context("failed flushing stdout")?;

    log::info!(
        "Embedded {}/{} sentences in {:.1}ms",
        embedded,
        sentences.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let (path, vectors) = load_model(&args.model)?;
    let vector = vectors.lookup(&args.word);

    let report = ModelReport {
        model_path: path.to_string_lossy().into_owned(),
        dimension: vectors.dimension(),
        vocabulary_size: vectors.len(),
        word: &args.word,
        in_vocabulary: vectors.contains(&args.word),
        vector: vector.as_deref(),
    };

    if args.json {
        println!("{}", serde_json::to_string(&report).context("failed serializing report")?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}

fn run_fetch(args: &FetchArgs) -> anyhow::Result<()> {
    let path = download::fetch_model(&args.url, &args.name, &args.sha256)?;
    println!("{}", path.display());
    Ok(())
}

fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in stdin().lock().lines() {
        lines.push(line.context("failed reading stdin")?);
    }
    Ok(lines)
}
