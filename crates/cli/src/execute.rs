use crate::commands::{config, policy, sign, Commands};
use anyhow::Result;
use tracing::debug;

impl Commands {
    /// Run the command and return what should be printed on stdout
    pub fn execute(self) -> Result<String> {
        match self {
            Commands::Sign {
                algorithm,
                secret,
                message,
                encoding,
            } => {
                debug!(%algorithm, ?encoding, "signing message");
                sign::execute(&algorithm, &secret, &message, encoding)
            }
            Commands::Policy { policy } => policy::execute(&policy),
            Commands::Config { file, no_env } => config::execute(file.as_deref(), !no_env),
        }
    }
}
