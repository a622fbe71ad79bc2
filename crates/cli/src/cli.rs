use std::path::PathBuf;

use clap::Parser;

/// Validate a JSON, YAML or form-encoded document against a rule set.
///
/// Prints the error map as JSON. Exits 0 when the input is valid, 1 when
/// any field fails, 2 when validation could not run at all.
#[derive(Parser, Debug)]
#[command(name = "fieldguard", version, about = "Validate documents against field rules")]
pub struct CliArgs {
    /// YAML rule set (field path to a rule list or `a|b:arg` string), or a
    /// directory of rule sets combined with --set
    #[arg(long, required_unless_present = "list_rules")]
    pub rules: Option<PathBuf>,

    /// Rule set to use when --rules is a directory (the file stem)
    #[arg(long)]
    pub set: Option<String>,

    /// Document to validate, or `-` for stdin
    #[arg(long, required_unless_present = "list_rules")]
    pub input: Option<PathBuf>,

    /// Media type of the input (inferred from the file extension if omitted)
    #[arg(long)]
    pub content_type: Option<String>,

    /// YAML file of message template overrides (falls back to FIELDGUARD_MESSAGES)
    #[arg(long)]
    pub messages: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print the registered rule names and exit
    #[arg(long)]
    pub list_rules: bool,
}
