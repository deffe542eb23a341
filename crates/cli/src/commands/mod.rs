use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod config;
pub mod policy;
pub mod sign;

/// Text encoding for a printed signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    #[default]
    Base64,
    Hex,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign a message the way a client would
    Sign {
        /// Signature algorithm, e.g. HmacSHA256
        #[arg(short, long, default_value = "HmacSHA256")]
        algorithm: String,

        /// Shared secret of the principal
        #[arg(short, long)]
        secret: String,

        /// Canonical representation to sign
        #[arg(short, long)]
        message: String,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = Encoding::Base64)]
        encoding: Encoding,
    },

    /// Validate a cache policy string and print its normalised form
    Policy {
        /// Policy such as "maxEntries=10000, ttl=10m"
        policy: String,
    },

    /// Print the effective authentication configuration
    Config {
        /// JSON configuration file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Ignore MERCHANT_AUTH_* environment variables
        #[arg(long)]
        no_env: bool,
    },
}
