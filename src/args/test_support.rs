use clap::{CommandFactory, FromArgMatches};

use crate::error::{AppError, AppResult};

use super::BlitzArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<BlitzArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(parse_test_matches(args)?.0)
}

pub(crate) fn parse_test_matches<I, T>(args: I) -> AppResult<(BlitzArgs, clap::ArgMatches)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = BlitzArgs::command()
        .try_get_matches_from(args)
        .map_err(AppError::from)?;
    let args = BlitzArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
