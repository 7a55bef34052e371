//! Command-line argument parsing for the nexttrack CLI.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream recommendations for the given tracks
    Recommend(RecommendArgs),
}

/// Options for a recommendation run. Unset values fall back to config and
/// preference defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendArgs {
    pub tracks: Vec<String>,
    pub endpoint: Option<String>,
    pub energy: Option<f64>,
    pub obscurity: Option<f64>,
    pub mood: Option<f64>,
    /// Cancel the session after this long
    pub deadline: Option<Duration>,
    pub config: Option<PathBuf>,
    /// Print the final state as JSON instead of a listing
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown option: {0}")]
    UnknownFlag(String),

    #[error("no tracks given")]
    NoTracks,
}

pub const USAGE: &str = "\
Usage: nexttrack [OPTIONS] TRACK...

Stream track recommendations for one or more \"Title - Artist\" entries.

Options:
      --endpoint URL     Recommendation stream endpoint
      --energy X         Energy preference, 0 to 1 (default 0.5)
      --obscurity X      Obscurity preference, 0 to 1 (default 0.5)
      --mood X           Mood preference, 0 to 1 (default 0.5)
      --deadline SECS    Give up after SECS seconds
      --config PATH      Read configuration from PATH
      --json             Print the final state as JSON
  -h, --help             Show this message
  -V, --version          Show version";

/// Parse command-line arguments and return the command to execute.
///
/// # Examples
///
/// ```
/// use nexttrack::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["nexttrack".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut parsed = RecommendArgs::default();
    // Skip the program name
    let mut args = args.skip(1);
    let mut positional_only = false;

    while let Some(arg) = args.next() {
        if positional_only {
            parsed.tracks.push(arg);
            continue;
        }
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--json" => parsed.json = true,
            "--endpoint" => parsed.endpoint = Some(value_for(&arg, &mut args)?),
            "--energy" => parsed.energy = Some(number_for(&arg, &mut args)?),
            "--obscurity" => parsed.obscurity = Some(number_for(&arg, &mut args)?),
            "--mood" => parsed.mood = Some(number_for(&arg, &mut args)?),
            "--deadline" => {
                let secs = number_for(&arg, &mut args)?;
                match Duration::try_from_secs_f64(secs) {
                    Ok(deadline) if secs > 0.0 => parsed.deadline = Some(deadline),
                    _ => {
                        return Err(ArgsError::InvalidValue {
                            flag: arg,
                            value: secs.to_string(),
                        })
                    }
                }
            }
            "--config" => parsed.config = Some(PathBuf::from(value_for(&arg, &mut args)?)),
            "--" => positional_only = true,
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownFlag(arg)),
            _ => parsed.tracks.push(arg),
        }
    }

    if parsed.tracks.is_empty() {
        return Err(ArgsError::NoTracks);
    }
    Ok(CliCommand::Recommend(parsed))
}

fn value_for<I>(flag: &str, args: &mut I) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}

fn number_for<I>(flag: &str, args: &mut I) -> Result<f64, ArgsError>
where
    I: Iterator<Item = String>,
{
    let raw = value_for(flag, args)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ArgsError::InvalidValue {
            flag: flag.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let args: Vec<String> = std::iter::once("nexttrack")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    fn recommend(args: &[&str]) -> RecommendArgs {
        match parse(args) {
            Ok(CliCommand::Recommend(parsed)) => parsed,
            other => panic!("Expected Recommend, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["Yesterday - Beatles", "-h"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_tracks_only() {
        let parsed = recommend(&["Yesterday - Beatles", "Help! - Beatles"]);
        assert_eq!(parsed.tracks, vec!["Yesterday - Beatles", "Help! - Beatles"]);
        assert!(parsed.endpoint.is_none());
        assert!(parsed.energy.is_none());
        assert!(!parsed.json);
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = recommend(&[
            "--endpoint",
            "http://remote/stream",
            "--energy",
            "0.8",
            "--obscurity",
            "0.1",
            "--mood",
            "1",
            "--deadline",
            "2.5",
            "--config",
            "/tmp/nexttrack.json",
            "--json",
            "Yesterday - Beatles",
        ]);
        assert_eq!(parsed.endpoint.as_deref(), Some("http://remote/stream"));
        assert_eq!(parsed.energy, Some(0.8));
        assert_eq!(parsed.obscurity, Some(0.1));
        assert_eq!(parsed.mood, Some(1.0));
        assert_eq!(parsed.deadline, Some(Duration::from_millis(2500)));
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/nexttrack.json")));
        assert!(parsed.json);
        assert_eq!(parsed.tracks, vec!["Yesterday - Beatles"]);
    }

    #[test]
    fn test_parse_no_tracks() {
        assert_eq!(parse(&[]), Err(ArgsError::NoTracks));
        assert_eq!(parse(&["--energy", "0.3"]), Err(ArgsError::NoTracks));
    }

    #[test]
    fn test_parse_missing_value() {
        assert_eq!(
            parse(&["Yesterday - Beatles", "--mood"]),
            Err(ArgsError::MissingValue("--mood".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        assert!(matches!(
            parse(&["--energy", "loud", "x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--deadline", "0", "x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--deadline", "1e30", "x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--deadline", "-5", "x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--mood", "NaN", "x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(
            parse(&["--unknown", "x"]),
            Err(ArgsError::UnknownFlag("--unknown".to_string()))
        );
    }

    #[test]
    fn test_double_dash_ends_options() {
        let parsed = recommend(&["--", "--weird title - Band"]);
        assert_eq!(parsed.tracks, vec!["--weird title - Band"]);
    }
}
