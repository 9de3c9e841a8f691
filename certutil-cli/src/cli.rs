//! Argument parsing

use crate::settings::Overrides;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Operation names, including the hyphenated aliases
const OPERATIONS: &[&str] = &[
    "list",
    "list_exp",
    "list-exp",
    "verify",
    "delete",
    "delete_exp",
    "delete-exp",
    "count",
    "count_exp",
    "count-exp",
];

/// Command line utility for listing and cleaning certificates from a credential store
#[derive(Parser, Debug)]
#[command(name = "certutil", version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CERTUTIL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory of PEM certificates to use as the credential store
    #[arg(long, env = "CERTUTIL_STORE_DIR", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The settings layer contributed by the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            store_dir: self.store_dir.clone(),
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all certificates with <name> in CN
    #[command(name = "list")]
    List {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// List all expired certificates with <name> in CN
    #[command(name = "list_exp", visible_alias = "list-exp")]
    ListExp {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// List and verify all certificates with <name> in CN
    #[command(name = "verify")]
    Verify {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// Delete all certificates except the most recent one with <name> in CN
    #[command(name = "delete")]
    Delete {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// Delete all expired certificates with <name> in CN
    #[command(name = "delete_exp", visible_alias = "delete-exp")]
    DeleteExp {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// Count all certificates with <name> in CN
    #[command(name = "count")]
    Count {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// Count all expired certificates with <name> in CN
    #[command(name = "count_exp", visible_alias = "count-exp")]
    CountExp {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },
}

impl Command {
    /// The subject substring the operation works on
    pub fn name(&self) -> &str {
        match self {
            Self::List { name }
            | Self::ListExp { name }
            | Self::Verify { name }
            | Self::Delete { name }
            | Self::DeleteExp { name }
            | Self::Count { name }
            | Self::CountExp { name } => name,
        }
    }
}

/// Rewrite the single-dash operation spelling (`-list`) into a subcommand.
///
/// Only the first operation token is rewritten, so a name that happens to
/// look like `-count` still reaches the operation untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut rewritten = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || rewritten {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if OPERATIONS.contains(&text) {
                rewritten = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(op) if OPERATIONS.contains(&op) => {
                    rewritten = true;
                    OsString::from(op)
                }
                _ => arg,
            }
        })
        .collect()
}
