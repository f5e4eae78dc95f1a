//! CLI for bootstrapping Google API OAuth credentials.
//!
//! This crate provides the `gapi-install` binary. The flow itself lives in
//! `gapi-install-auth`; this crate adds argument parsing, the config file,
//! logging setup and operator-facing output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod tracing;

use std::io::Write;
use std::process::ExitCode;

use gapi_install_auth::{Authorizer, GoogleTokenEndpoint};

pub use cli::{Cli, Mode};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

/// Loads the config file named on the command line, or the default one.
pub fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
}

/// Runs the phase selected by `cli`, writing operator output to `out`.
pub async fn run<W: Write>(cli: &Cli, config: &ClientConfig, out: &mut W) -> ClientResult<()> {
    let paths = config.auth_paths(cli);
    ::tracing::debug!(?paths, mode = ?cli.mode(), "resolved settings");

    let endpoint = GoogleTokenEndpoint::new(config.oauth.timeout())?;
    let authorizer = Authorizer::new(paths, endpoint).with_scopes(config.oauth.scopes.clone());

    match cli.mode() {
        Mode::Authorize => commands::authorize::authorize(
            &authorizer,
            cli.open || config.oauth.open_browser,
            &cli.save_token_command(),
            out,
        ),
        Mode::SaveToken => commands::save_token::save_token(&authorizer, out).await,
    }
}

/// Prints `err` and its hint to `err_out` and returns the failure exit code.
pub fn report<W: Write>(err: &ClientError, err_out: &mut W) -> ExitCode {
    let _ = writeln!(err_out, "error: {}", err);
    if let Some(hint) = err.hint() {
        let _ = writeln!(err_out, "{}", hint);
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapi_install_auth::{AuthError, AuthErrorCode};

    const CREDENTIALS: &str = r#"{"installed": {"client_id": "5.apps.googleusercontent.com", "client_secret": "s", "redirect_uris": ["http://localhost"]}}"#;

    fn cli_for(dir: &std::path::Path, extra: &[&str]) -> Cli {
        let credentials = dir.join("credentials.json");
        let token = dir.join("token.json");
        let code = dir.join("auth-code.txt");
        let mut args = vec![
            "gapi-install".to_string(),
            "--credentials-file".to_string(),
            credentials.display().to_string(),
            "--token-file".to_string(),
            token.display().to_string(),
            "--auth-code-file".to_string(),
            code.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::parse_args(args).unwrap()
    }

    fn auth_code(err: &ClientError) -> AuthErrorCode {
        match err {
            ClientError::Auth(auth) => auth.code(),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn authorize_without_credentials_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = cli_for(tmp.path(), &[]);
        let mut out = Vec::new();

        let err = run(&cli, &ClientConfig::default(), &mut out).await.unwrap_err();
        assert_eq!(auth_code(&err), AuthErrorCode::MissingCredentials);
        assert!(err.hint().is_some());
    }

    #[tokio::test]
    async fn authorize_prints_url() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("credentials.json"), CREDENTIALS).unwrap();
        let cli = cli_for(tmp.path(), &[]);
        let mut out = Vec::new();

        run(&cli, &ClientConfig::default(), &mut out).await.unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("client_id=5.apps.googleusercontent.com"));
        assert!(output.contains("gmail.send"));
        assert!(output.contains(&format!(
            "Then run: gapi-install --save-token --credentials-file {}",
            tmp.path().join("credentials.json").display()
        )));
    }

    #[tokio::test]
    async fn configured_scopes_reach_the_url() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("credentials.json"), CREDENTIALS).unwrap();
        let cli = cli_for(tmp.path(), &[]);
        let config = ClientConfig::parse("[oauth]\nscopes = [\"openid\", \"email\"]\n").unwrap();
        let mut out = Vec::new();

        run(&cli, &config, &mut out).await.unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("scope=openid%20email"));
        assert!(!output.contains("gmail"));
    }

    #[tokio::test]
    async fn save_token_without_code_fails() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("credentials.json"), CREDENTIALS).unwrap();
        let cli = cli_for(tmp.path(), &["--save-token"]);
        let mut out = Vec::new();

        let err = run(&cli, &ClientConfig::default(), &mut out).await.unwrap_err();
        assert_eq!(auth_code(&err), AuthErrorCode::MissingAuthCode);
        assert!(!tmp.path().join("token.json").exists());
    }

    #[test]
    fn explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");
        let cli = Cli::parse_args([
            "gapi-install".to_string(),
            "--config".to_string(),
            missing.display().to_string(),
        ])
        .unwrap();
        assert!(matches!(load_config(&cli), Err(ClientError::Config(_))));
    }

    #[test]
    fn report_missing_credentials() {
        let err = ClientError::from(AuthError::missing_credentials("credentials.json"));
        let mut stderr = Vec::new();

        assert_eq!(report(&err, &mut stderr), ExitCode::FAILURE);
        let text = String::from_utf8(stderr).unwrap();
        assert!(text.starts_with("error: credentials file not found (credentials.json)\n"));
        assert!(text.contains("6. Download the credentials and save them as credentials.json"));
    }

    #[test]
    fn report_missing_auth_code() {
        let err = ClientError::from(AuthError::missing_auth_code("auth-code.txt"));
        let mut stderr = Vec::new();

        assert_eq!(report(&err, &mut stderr), ExitCode::FAILURE);
        insta::assert_snapshot!(String::from_utf8(stderr).unwrap(), @r"
        error: authorization code file not found (auth-code.txt)
        Please save the authorization code in auth-code.txt.
        ");
    }

    #[test]
    fn report_propagated_failure() {
        let err = ClientError::from(AuthError::network("connection refused"));
        let mut stderr = Vec::new();

        assert_eq!(report(&err, &mut stderr), ExitCode::FAILURE);
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "error: connection refused\n"
        );
    }
}
