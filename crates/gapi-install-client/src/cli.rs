//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
#[cfg(test)]
use clap::{CommandFactory, FromArgMatches};

/// gapi-install - bootstrap OAuth credentials for Gmail and Google Calendar
///
/// Run without arguments to print the authorization URL. After granting
/// access, paste the code into the auth-code file and run again with
/// --save-token.
#[derive(Debug, Parser)]
#[command(name = "gapi-install")]
#[command(author, version, about)]
pub struct Cli {
    /// Exchange the code in the auth-code file for a refresh token
    #[arg(long)]
    pub save_token: bool,

    /// Path to configuration file
    #[arg(long, short, env = "GAPI_INSTALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the OAuth client secret downloaded from Google Cloud Console
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Where to write the refresh token
    #[arg(long, env = "GAPI_INSTALL_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// File the authorization code is pasted into
    #[arg(long, env = "GAPI_INSTALL_AUTH_CODE_FILE")]
    pub auth_code_file: Option<PathBuf>,

    /// Also open the authorization URL in the default browser
    #[arg(long)]
    pub open: bool,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

/// Which phase of the bootstrap to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the consent URL, or report that a token already exists.
    Authorize,
    /// Exchange the pasted code and persist the token.
    SaveToken,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.save_token {
            Mode::SaveToken
        } else {
            Mode::Authorize
        }
    }

    /// The command line that runs the second phase with the same files.
    ///
    /// Path options given on this run (by flag or environment) are repeated
    /// so the operator does not have to remember them.
    pub fn save_token_command(&self) -> String {
        let mut command = String::from("gapi-install --save-token");
        let options = [
            ("--config", &self.config),
            ("--credentials-file", &self.credentials_file),
            ("--token-file", &self.token_file),
            ("--auth-code-file", &self.auth_code_file),
        ];
        for (flag, value) in options {
            if let Some(path) = value {
                command.push(' ');
                command.push_str(flag);
                command.push(' ');
                command.push_str(&shell_quote(&path.display().to_string()));
            }
        }
        command
    }

    /// Parses `args` with every environment fallback disabled.
    #[cfg(test)]
    pub(crate) fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }
}

/// Single-quotes `word` when a POSIX shell would split or expand it.
fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+=:,@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
