//! Second phase: exchange the pasted code and store the token.

use std::io::Write;

use gapi_install_auth::{Authorizer, TokenExchange};

use crate::error::ClientResult;

pub async fn save_token<E, W>(authorizer: &Authorizer<E>, out: &mut W) -> ClientResult<()>
where
    E: TokenExchange,
    W: Write,
{
    authorizer.save_token().await?;
    writeln!(out, "Token stored successfully!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapi_install_auth::{
        AuthErrorCode, AuthPaths, AuthResult, BoxFuture, ClientSecret, TokenGrant, TokenStore,
    };

    use crate::error::ClientError;

    struct FixedGrant(&'static str);

    impl TokenExchange for FixedGrant {
        fn exchange<'a>(
            &'a self,
            _secret: &'a ClientSecret,
            _code: &'a str,
        ) -> BoxFuture<'a, AuthResult<TokenGrant>> {
            Box::pin(async move {
                Ok(TokenGrant {
                    access_token: "ya29.x".to_string(),
                    refresh_token: Some(self.0.to_string()),
                    ..Default::default()
                })
            })
        }
    }

    fn write_credentials(paths: &AuthPaths) {
        std::fs::write(
            &paths.credentials,
            r#"{"installed": {"client_id": "9.apps.googleusercontent.com", "client_secret": "s", "redirect_uris": ["http://localhost"]}}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn stores_token_and_removes_code() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AuthPaths::in_dir(tmp.path());
        write_credentials(&paths);
        std::fs::write(&paths.auth_code, "4/0code\n").unwrap();

        let mut out = Vec::new();
        let authorizer = Authorizer::new(paths.clone(), FixedGrant("1//granted"));
        save_token(&authorizer, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Token stored successfully!\n");
        assert!(!paths.auth_code.exists());
        let token = TokenStore::new(&paths.token).load().unwrap().unwrap();
        assert_eq!(token.refresh_token, "1//granted");
    }

    #[tokio::test]
    async fn missing_code_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AuthPaths::in_dir(tmp.path());
        write_credentials(&paths);

        let mut out = Vec::new();
        let authorizer = Authorizer::new(paths.clone(), FixedGrant("unused"));
        let err = save_token(&authorizer, &mut out).await.unwrap_err();

        let ClientError::Auth(ref auth) = err else {
            panic!("expected auth error, got {:?}", err);
        };
        assert_eq!(auth.code(), AuthErrorCode::MissingAuthCode);
        assert!(out.is_empty());
        assert!(!paths.token.exists());
    }
}
