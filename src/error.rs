use thiserror::Error;

use crate::bind::errors::AccessError;
use crate::compile::errors::CompileError;
use crate::config::errors::ConfigError;
use crate::types::errors::CoercionError;
use crate::validator::errors::ValidationError;

#[derive(Debug, Error)]
pub enum ArgError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("While binding '{attr}': {source}")]
    InArgument {
        attr: String,
        #[source]
        source: CoercionError,
    },
}

impl ArgError {
    /// Whether the error was caused by the command line rather than the declaration.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ArgError::Validation(_) | ArgError::InArgument { .. } | ArgError::Cli(_)
        )
    }

    /// Process exit status, following the engine's convention.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgError::Cli(e) => e.exit_code(),
            _ if self.is_user_error() => 2,
            _ => 1,
        }
    }

    /// Prints the error and exits. Help and version requests exit with 0.
    pub fn exit(&self) -> ! {
        if let ArgError::Cli(e) = self {
            e.exit();
        }
        eprintln!("error: {self}");
        std::process::exit(self.exit_code())
    }
}
