//! Password login: exchanges credentials for an access/refresh token pair.

use std::sync::LazyLock;

use crate::db::{User, UserRepository};
use crate::jwt::{ACCESS_TOKEN_TTL, AccessTokenResult, JwtConfig};
use crate::password::{hash_password, verify_password};
use crate::refresh::RefreshTokenService;

use super::errors::AuthError;

/// Verified in place of a stored digest when the email is unknown, so both
/// failure paths run Argon2.
static DUMMY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("chirpy-unknown-account").ok());

/// Everything a client needs after a successful login.
#[derive(Debug)]
pub struct LoginSession {
    pub user: User,
    pub access_token: AccessTokenResult,
    pub refresh_token: String,
}

/// Verify `email`/`password` and start a session.
///
/// Unknown email and wrong password both fail with
/// [`AuthError::InvalidCredentials`].
pub async fn login(
    users: &dyn UserRepository,
    jwt: &JwtConfig,
    refresh: &RefreshTokenService,
    email: &str,
    password: &str,
) -> Result<LoginSession, AuthError> {
    let user = users.find_by_email(email).await?;

    let digest = user.as_ref().map(|u| u.hashed_password.clone());
    let password = password.to_string();
    let matches = tokio::task::spawn_blocking(move || {
        match digest.as_deref().or_else(|| DUMMY_DIGEST.as_deref()) {
            Some(digest) => verify_password(&password, digest),
            None => Ok(false),
        }
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))??;

    let Some(user) = user.filter(|_| matches) else {
        return Err(AuthError::InvalidCredentials);
    };

    let access_token = jwt.issue_access_token(user.id, ACCESS_TOKEN_TTL)?;
    let refresh_token = refresh.issue(user.id).await?.token;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginSession {
        user,
        access_token,
        refresh_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::db::Database;
    use crate::password::hash_password;
    use std::sync::Arc;

    const START: u64 = 1_700_000_000;

    async fn setup() -> (Database, JwtConfig, RefreshTokenService) {
        let db = Database::open(":memory:").await.unwrap();
        db.users()
            .create("alice@example.com", &hash_password("04234").unwrap())
            .await
            .unwrap();
        let clock = Arc::new(ManualClock::new(START));
        let jwt = JwtConfig::with_clock(b"login-secret", clock.clone());
        let refresh = RefreshTokenService::new(Arc::new(db.tokens()), clock);
        (db, jwt, refresh)
    }

    #[tokio::test]
    async fn test_login_issues_token_pair() {
        let (db, jwt, refresh) = setup().await;
        let users = db.users();

        let session = login(&users, &jwt, &refresh, "alice@example.com", "04234")
            .await
            .unwrap();

        assert_eq!(session.user.email, "alice@example.com");
        assert_eq!(session.access_token.expires_at, START + 3600);
        assert_eq!(
            jwt.validate_access_token(&session.access_token.token).unwrap(),
            session.user.id
        );

        let record = db
            .tokens()
            .find_by_token(&session.refresh_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.user_id, session.user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let (db, jwt, refresh) = setup().await;
        let users = db.users();

        let wrong = login(&users, &jwt, &refresh, "alice@example.com", "nope").await;
        let unknown = login(&users, &jwt, &refresh, "bob@example.com", "04234").await;

        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_checked_against_dummy_digest() {
        let digest = DUMMY_DIGEST.as_deref().unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("chirpy-unknown-account", digest).unwrap());

        // Even the dummy password never logs in an account that does not exist.
        let (db, jwt, refresh) = setup().await;
        let users = db.users();
        let res = login(
            &users,
            &jwt,
            &refresh,
            "ghost@example.com",
            "chirpy-unknown-account",
        )
        .await;
        assert!(matches!(res, Err(AuthError::InvalidCredentials)));
    }
}
