//! Command handlers.
//!
//! Every handler writes its result to the supplied writer so the binary can
//! pass stdout and tests can pass a buffer.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use cyberkit_crypto::cipher::CRYPTO_LAB_TOOL;
use cyberkit_crypto::crack::{CRACKER_TOOL, wordlist};
use cyberkit_crypto::{
    CipherRequest, CrackEngine, CrackEvent, CrackOutcome, CrackRequest, CryptoLab, HashAlgorithm,
    Mode, UsageStats,
};
use tracing::{debug, info, warn};

use crate::config::{CipherArgs, Cli, Command, CrackArgs};
use crate::error::CliError;

/// Run a parsed command line
///
/// Usage counters are loaded from and saved to `--usage-file` when one is
/// given; otherwise they live for this invocation only.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let usage = match &cli.usage_file {
        Some(path) => UsageStats::load(path).map_err(CliError::from)?,
        None => UsageStats::new(),
    };

    let tracked = match cli.command {
        Command::Encrypt(args) => {
            cipher(Mode::Encrypt, &args, out)?;
            Some(CRYPTO_LAB_TOOL)
        }
        Command::Decrypt(args) => {
            cipher(Mode::Decrypt, &args, out)?;
            Some(CRYPTO_LAB_TOOL)
        }
        Command::Keygen { size } => {
            keygen(size, out)?;
            None
        }
        Command::Hash { algorithm, word } => {
            hash(&algorithm, &word, out)?;
            None
        }
        Command::Crack(args) => {
            crack_until_interrupted(&args, out).await?;
            Some(CRACKER_TOOL)
        }
        Command::Usage => {
            show_usage(&usage, out)?;
            None
        }
    };

    if let (Some(tool), Some(path)) = (tracked, &cli.usage_file) {
        let count = usage.track(tool);
        debug!(tool, count, "usage recorded");
        usage.save(path).map_err(CliError::from)?;
    }

    Ok(())
}

/// Encrypt or decrypt with the chosen cipher
pub fn cipher<W: Write>(mode: Mode, args: &CipherArgs, out: &mut W) -> Result<()> {
    let request = CipherRequest::new(
        args.algorithm.into(),
        mode,
        args.key.as_str(),
        args.text.as_str(),
    );
    let text = CryptoLab::default()
        .transform(&request)
        .map_err(CliError::from)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Print a freshly generated printable key
pub fn keygen<W: Write>(size: usize, out: &mut W) -> Result<()> {
    let key = cyberkit_crypto::generate_key(size).map_err(CliError::from)?;
    writeln!(out, "{key}")?;
    Ok(())
}

/// Print the hex digest of `word`
pub fn hash<W: Write>(algorithm: &str, word: &str, out: &mut W) -> Result<()> {
    let algorithm = parse_hash_algorithm(algorithm)?;
    writeln!(out, "{}", algorithm.hex_digest(word.as_bytes()))?;
    Ok(())
}

/// Print usage counters ordered by tool name
pub fn show_usage<W: Write>(usage: &UsageStats, out: &mut W) -> Result<()> {
    let counts = usage.snapshot();
    if counts.is_empty() {
        writeln!(out, "No usage recorded")?;
    }
    for (tool, count) in counts {
        writeln!(out, "{tool}: {count}")?;
    }
    Ok(())
}

/// Run `crack` and stop the session on Ctrl-C
async fn crack_until_interrupted<W: Write>(args: &CrackArgs, out: &mut W) -> Result<CrackOutcome> {
    let engine = CrackEngine::new();
    let stopper = engine.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping crack session");
            stopper.stop();
        }
    });

    let outcome = crack(&engine, args, out).await;
    interrupt.abort();
    outcome
}

/// Run a dictionary attack on `engine` and report the outcome
pub async fn crack<W: Write>(
    engine: &CrackEngine,
    args: &CrackArgs,
    out: &mut W,
) -> Result<CrackOutcome> {
    let algorithm = parse_hash_algorithm(&args.algorithm)?;
    let words = load_wordlist(args.wordlist.as_deref())?;
    writeln!(
        out,
        "Cracking {algorithm} hash with {} candidate(s)...",
        words.len()
    )?;

    let request = CrackRequest::new(args.target_hash.as_str(), algorithm, words);
    let show_attempts = args.show_attempts;
    let mut write_error: Option<io::Error> = None;
    let mut observer = |event: &CrackEvent| {
        let CrackEvent::Attempt(attempt) = event else {
            return;
        };
        if !show_attempts || write_error.is_some() {
            return;
        }
        if let Err(e) = writeln!(
            out,
            "[{}] {} -> {}...",
            attempt.index, attempt.word, attempt.hash_prefix
        ) {
            write_error = Some(e);
        }
    };

    let outcome = engine
        .crack(request, &mut observer)
        .await
        .ok_or(CliError::EngineBusy)?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    match &outcome {
        CrackOutcome::Completed(result) => match &result.password {
            Some(password) => writeln!(
                out,
                "Password found: \"{password}\" after {} attempt(s) in {:.3}s",
                result.attempts,
                result.elapsed_seconds()
            )?,
            None => writeln!(
                out,
                "Password not found in dictionary after {} attempt(s) in {:.3}s",
                result.attempts,
                result.elapsed_seconds()
            )?,
        },
        CrackOutcome::Cancelled { attempts } => writeln!(
            out,
            "[STOPPED] Cracking process aborted by user after {attempts} attempt(s)."
        )?,
    }

    Ok(outcome)
}

/// Read a wordlist file, or the built-in dictionary when no path is given
///
/// A file with no candidates also falls back to the built-in dictionary.
pub fn load_wordlist(path: Option<&Path>) -> Result<Vec<String>, CliError> {
    let Some(path) = path else {
        return Ok(wordlist::default_wordlist());
    };

    let text = fs::read_to_string(path).map_err(|source| CliError::WordlistRead {
        path: path.to_path_buf(),
        source,
    })?;
    let words = wordlist::parse_wordlist(&text);
    if words.is_empty() {
        warn!(path = %path.display(), "wordlist is empty, using built-in dictionary");
    } else {
        debug!(path = %path.display(), words = words.len(), "loaded wordlist");
    }

    Ok(wordlist::or_default(words))
}

fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, CliError> {
    label
        .parse()
        .map_err(|_| CliError::UnknownHashAlgorithm(label.to_string()))
}
