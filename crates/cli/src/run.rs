use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use fieldguard_core::Config;
use fieldguard_ingest::{decode_as, BodyFormat};
use fieldguard_rules::{load_rule_set, ErrorMap, LoadStatus, RuleSet, RuleSetLoader, Validator};
use tracing::{info, warn};

use crate::cli::CliArgs;

/// What a finished run found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

pub fn run(args: &CliArgs, mut config: Config, out: &mut impl Write) -> Result<Outcome> {
    if let Some(path) = &args.messages {
        config.messages_path = Some(path.clone());
    }
    let validator = Validator::from_config(&config).context("failed to load message templates")?;

    if args.list_rules {
        for name in validator.registry().names() {
            writeln!(out, "{name}")?;
        }
        return Ok(Outcome::Valid);
    }

    let (Some(rules_path), Some(input_path)) = (&args.rules, &args.input) else {
        bail!("--rules and --input are required");
    };

    let rules = select_rule_set(rules_path, args.set.as_deref())?;
    let format = input_format(input_path, args.content_type.as_deref())?;
    let body = read_input(input_path)?;
    let root = decode_as(format, &body)
        .with_context(|| format!("failed to decode {} as {format}", input_path.display()))?;

    let errors = validator.validate_tree(&root, &rules)?;
    info!(
        profile = config.profile_label(),
        rules = rules.len(),
        errors = errors.len(),
        "validated {}",
        input_path.display()
    );

    write_errors(out, &errors, args.pretty)?;
    Ok(if errors.is_empty() {
        Outcome::Valid
    } else {
        Outcome::Invalid
    })
}

/// Load the rule set named by `--rules`: a single file, or one set out of a
/// directory scanned by [`RuleSetLoader`].
fn select_rule_set(rules_path: &Path, set: Option<&str>) -> Result<RuleSet> {
    if !rules_path.is_dir() {
        if set.is_some() {
            bail!("--set needs --rules to point at a directory");
        }
        return load_rule_set(rules_path)
            .with_context(|| format!("failed to load rules from {}", rules_path.display()));
    }

    let Some(name) = set else {
        bail!(
            "{} is a directory; pick a rule set with --set",
            rules_path.display()
        );
    };
    let mut loader = RuleSetLoader::new(rules_path.to_path_buf());
    let results = loader
        .load_all()
        .with_context(|| format!("failed to scan {}", rules_path.display()))?;
    for result in &results {
        if let LoadStatus::Failed { error } = &result.status {
            warn!(path = %result.path.display(), error = %error, "skipping broken rule set");
        }
    }
    match loader.get(name) {
        Some(rules) => Ok(rules.clone()),
        None => bail!(
            "no rule set named '{name}' in {} (available: {})",
            rules_path.display(),
            loader.names().join(", ")
        ),
    }
}

fn input_format(input: &Path, content_type: Option<&str>) -> Result<BodyFormat> {
    if let Some(ct) = content_type {
        return Ok(BodyFormat::from_content_type(ct)?);
    }
    if input == Path::new("-") {
        return Ok(BodyFormat::Json);
    }
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
    match BodyFormat::from_extension(ext) {
        Some(format) => Ok(format),
        None => bail!(
            "cannot infer the format of {}; pass --content-type",
            input.display()
        ),
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input == Path::new("-") {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("failed to read stdin")?;
        return Ok(body);
    }
    std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))
}

fn write_errors(out: &mut impl Write, errors: &ErrorMap, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, errors)?;
    } else {
        serde_json::to_writer(&mut *out, errors)?;
    }
    writeln!(out)?;
    Ok(())
}
