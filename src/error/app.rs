use thiserror::Error;

use super::{ConfigError, HttpError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_tasks_surface_as_join_errors() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        let result: AppResult<()> = runtime.block_on(async {
            let handle = tokio::spawn(tokio::time::sleep(std::time::Duration::from_secs(60)));
            handle.abort();
            handle.await?;
            Ok(())
        });
        match result {
            Err(AppError::Join { .. }) => Ok(()),
            other => Err(format!("Expected a join error, got {:?}", other)),
        }
    }

    #[test]
    fn helpers_wrap_domain_errors() -> Result<(), String> {
        match AppError::http(HttpError::NoRuntime) {
            AppError::Http(HttpError::NoRuntime) => {}
            other => return Err(format!("Unexpected http error: {:?}", other)),
        }
        match AppError::config(ConfigError::MissingRequestSpec) {
            AppError::Config(ConfigError::MissingRequestSpec) => {}
            other => return Err(format!("Unexpected config error: {:?}", other)),
        }
        match AppError::validation(ValidationError::TickIntervalZero) {
            AppError::Validation(ValidationError::TickIntervalZero) => Ok(()),
            other => Err(format!("Unexpected validation error: {:?}", other)),
        }
    }
}
