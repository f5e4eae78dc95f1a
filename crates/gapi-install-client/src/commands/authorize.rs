//! First phase: print the authorization URL.

use std::io::Write;

use gapi_install_auth::{Authorizer, Obtained, TokenExchange};
use tracing::{info, warn};

use crate::error::ClientResult;

/// Reports existing credentials, or prints the consent URL and the
/// instructions for the second phase.
///
/// Returns immediately in both cases; the operator runs `save_command`
/// once the code has been pasted.
pub fn authorize<E, W>(
    authorizer: &Authorizer<E>,
    open_browser: bool,
    save_command: &str,
    out: &mut W,
) -> ClientResult<()>
where
    E: TokenExchange,
    W: Write,
{
    match authorizer.obtain()? {
        Obtained::Authorized(client) => {
            info!("stored credentials found");
            writeln!(out, "Already authorized (client {}).", client.client_id())?;
            let token_path = authorizer.paths().token.display();
            writeln!(out, "Delete {} to authorize again.", token_path)?;
        }
        Obtained::AwaitingCode {
            auth_url,
            auth_code_path,
        } => {
            writeln!(out, "Authorize this app by visiting this url: {}", auth_url)?;
            writeln!(out)?;
            writeln!(
                out,
                "After authorization, copy the code from the redirect URL and save it in a file named \"{}\".",
                auth_code_path.display()
            )?;
            writeln!(out, "Then run: {}", save_command)?;

            if open_browser && let Err(e) = open::that(&auth_url) {
                warn!("failed to open browser: {}", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapi_install_auth::{
        AuthErrorCode, AuthPaths, AuthResult, BoxFuture, ClientSecret, StoredToken, TokenGrant,
        TokenStore, default_scopes,
    };

    use crate::error::ClientError;

    /// Fails the test if the network is ever consulted.
    struct NoNetwork;

    impl TokenExchange for NoNetwork {
        fn exchange<'a>(
            &'a self,
            _secret: &'a ClientSecret,
            _code: &'a str,
        ) -> BoxFuture<'a, AuthResult<TokenGrant>> {
            panic!("authorize must not exchange tokens")
        }
    }

    fn run(paths: AuthPaths) -> (ClientResult<()>, String) {
        run_with(paths, "gapi-install --save-token")
    }

    fn run_with(paths: AuthPaths, save_command: &str) -> (ClientResult<()>, String) {
        let mut out = Vec::new();
        let authorizer = Authorizer::new(paths, NoNetwork);
        let result = authorize(&authorizer, false, save_command, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn write_credentials(paths: &AuthPaths) {
        std::fs::write(
            &paths.credentials,
            r#"{"web": {"client_id": "42.apps.googleusercontent.com", "client_secret": "s", "redirect_uris": ["http://localhost:3000/cb"]}}"#,
        )
        .unwrap();
    }

    #[test]
    fn prints_consent_url_and_instructions() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AuthPaths::in_dir(tmp.path());
        write_credentials(&paths);

        let (result, output) = run(paths.clone());
        result.unwrap();

        let first = output.lines().next().unwrap();
        assert!(first.starts_with(
            "Authorize this app by visiting this url: https://accounts.google.com/"
        ));
        assert!(first.contains("client_id=42.apps.googleusercontent.com"));
        for scope in default_scopes() {
            assert!(first.contains(&*urlencoding::encode(&scope)));
        }
        assert!(output.contains(&paths.auth_code.display().to_string()));
        assert!(output.ends_with("Then run: gapi-install --save-token\n"));
    }

    #[test]
    fn instructions_repeat_the_given_command() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AuthPaths::in_dir(tmp.path());
        write_credentials(&paths);

        let command = "gapi-install --save-token --token-file /srv/app/token.json";
        let (result, output) = run_with(paths, command);
        result.unwrap();
        assert_eq!(output.lines().last(), Some(&*format!("Then run: {}", command)));
    }

    #[test]
    fn reports_existing_token() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AuthPaths::in_dir(tmp.path());
        let secret = ClientSecret::new("7.apps.googleusercontent.com", "s", "http://localhost");
        TokenStore::new(&paths.token)
            .save(&StoredToken::new(&secret, "1//r"))
            .unwrap();

        let (result, output) = run(paths);
        result.unwrap();
        assert!(output.starts_with("Already authorized (client 7.apps.googleusercontent.com)."));
    }

    #[test]
    fn missing_credentials_prints_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, output) = run(AuthPaths::in_dir(tmp.path()));

        let err = result.unwrap_err();
        let ClientError::Auth(ref auth) = err else {
            panic!("expected auth error, got {:?}", err);
        };
        assert_eq!(auth.code(), AuthErrorCode::MissingCredentials);
        assert!(err.hint().unwrap().contains("Google Cloud Console"));
        assert!(output.is_empty());
    }
}
