use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::config;
use crate::embeddings::engine::EmbedOptions;
use crate::embeddings::vec_file::VecFileOptions;

pub const USAGE: &str = "\
Usage:
  amharic-embed embed   [--model PATH] [--text TEXT]... [--split] [--no-normalize]
                        [--min-words N] [--max-words N] [--sha256 HEX] [--json]
  amharic-embed inspect [--model PATH] [--word WORD] [--max-words N] [--sha256 HEX] [--json]
  amharic-embed fetch   --url URL --sha256 HEX [--name FILE]
  amharic-embed --version | help

embed reads one sentence per stdin line when no --text is given.
Model path: --model, else $AMHARIC_EMBED_MODEL, else ~/.amharic-embed/models/cc.am.300.vec";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelArgs {
    pub path: Option<PathBuf>,
    pub sha256: Option<String>,
    pub load: VecFileOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedArgs {
    pub model: ModelArgs,
    pub texts: Vec<String>,
    pub split: bool,
    pub options: EmbedOptions,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectArgs {
    pub model: ModelArgs,
    pub word: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    pub url: String,
    pub sha256: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Embed(EmbedArgs),
    Inspect(InspectArgs),
    Fetch(FetchArgs),
    Version,
    Help,
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let Some((sub, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match sub.as_str() {
        "embed" => parse_embed(rest).map(Command::Embed),
        "inspect" => parse_inspect(rest).map(Command::Inspect),
        "fetch" => parse_fetch(rest).map(Command::Fetch),
        "--version" | "-V" | "version" => Ok(Command::Version),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn parse_embed(args: &[String]) -> anyhow::Result<EmbedArgs> {
    let mut out = EmbedArgs {
        model: ModelArgs::default(),
        texts: Vec::new(),
        split: false,
        options: EmbedOptions::default(),
        json: false,
    };

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        if parse_model_flag(arg, &mut it, &mut out.model)? {
            continue;
        }
        match arg.as_str() {
            "--text" => out.texts.push(flag_value(arg, &mut it)?),
            "--split" => out.split = true,
            "--no-normalize" => out.options.normalize = false,
            "--min-words" => out.options.min_words = parse_usize(arg, &mut it)?,
            "--json" => out.json = true,
            other => bail!("unknown option for embed: {other:?}"),
        }
    }
    Ok(out)
}

fn parse_inspect(args: &[String]) -> anyhow::Result<InspectArgs> {
    let mut out = InspectArgs {
        model: ModelArgs::default(),
        word: config::embedding::DEFAULT_INSPECT_WORD.to_string(),
        json: false,
    };

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        if parse_model_flag(arg, &mut it, &mut out.model)? {
            continue;
        }
        match arg.as_str() {
            "--word" => out.word = flag_value(arg, &mut it)?,
            "--json" => out.json = true,
            other => bail!("unknown option for inspect: {other:?}"),
        }
    }
    Ok(out)
}

fn parse_fetch(args: &[String]) -> anyhow::Result<FetchArgs> {
    let mut url = None;
    let mut sha256 = None;
    let mut name = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--url" => url = Some(flag_value(arg, &mut it)?),
            "--sha256" => sha256 = Some(flag_value(arg, &mut it)?),
            "--name" => name = Some(flag_value(arg, &mut it)?),
            other => bail!("unknown option for fetch: {other:?}"),
        }
    }

    let url = url.context("missing --url")?;
    let sha256 = sha256.context("missing --sha256 (downloads are always verified)")?;
    let name = match name {
        Some(n) => n,
        None => file_name_from_url(&url),
    };
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        bail!("--name must be a plain file name, got {name:?}");
    }

    Ok(FetchArgs { url, sha256, name })
}

/// Shared model flags. Returns `true` if `arg` was consumed.
fn parse_model_flag<'a>(
    arg: &str,
    it: &mut impl Iterator<Item = &'a String>,
    model: &mut ModelArgs,
) -> anyhow::Result<bool> {
    match arg {
        "--model" => model.path = Some(PathBuf::from(flag_value(arg, it)?)),
        "--sha256" => model.sha256 = Some(flag_value(arg, it)?),
        "--max-words" => {
            let max = parse_usize(arg, it)?;
            if max == 0 {
                bail!("--max-words must be at least 1");
            }
            model.load.max_words = Some(max);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn flag_value<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> anyhow::Result<String> {
    it.next().cloned().with_context(|| format!("missing value for {flag}"))
}

fn parse_usize<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> anyhow::Result<usize> {
    let raw = flag_value(flag, it)?;
    raw.parse::<usize>()
        .with_context(|| format!("{flag} expects a non-negative integer, got {raw:?}"))
}

fn file_name_from_url(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(config::embedding::DEFAULT_MODEL_FILE)
        .to_string()
}
