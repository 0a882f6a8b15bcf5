use std::env;

use std::time::Duration;

use agronomy_core::accounts::{
    authenticate, hash_password_with, register, verify_password, verify_password_blocking,
    AccountError, LoginForm, SignupForm,
};
use agronomy_core::validation::{EmailError, MAX_EMAIL_LEN};
use agronomy_core::db;
use anyhow::Result;
use uuid::Uuid;

fn signup(email: &str, password: &str, confirm: &str) -> SignupForm {
    SignupForm {
        email: email.into(),
        password: password.into(),
        confirm_password: confirm.into(),
    }
}

#[test]
fn password_hash_round_trips_and_salts() {
    let first = hash_password_with("hunter2", 1_000);
    let second = hash_password_with("hunter2", 1_000);

    assert!(first.starts_with("pbkdf2_sha256$1000$"));
    assert_ne!(first, second, "each hash gets a fresh salt");
    assert!(verify_password("hunter2", &first));
    assert!(verify_password("hunter2", &second));
    assert!(!verify_password("hunter3", &first));
}

#[test]
fn foreign_or_corrupt_hashes_never_verify() {
    let good = hash_password_with("secret", 1_000);
    let truncated = &good[..good.len() - 4];

    for encoded in [
        "",
        "plaintext",
        "pbkdf2:sha256:600000$abc$def",
        "pbkdf2_sha256$0$c2FsdA$aGFzaA",
        "pbkdf2_sha256$many$c2FsdA$aGFzaA",
        truncated,
    ] {
        assert!(!verify_password("secret", encoded), "accepted {encoded:?}");
    }
}

#[test]
fn signup_form_validation_order() {
    assert!(matches!(
        signup("not-an-email", "pw", "pw").validate(),
        Err(AccountError::InvalidEmail(EmailError::AtSign))
    ));
    assert!(matches!(
        signup("grower@example.com", "", "").validate(),
        Err(AccountError::EmptyPassword)
    ));
    assert!(matches!(
        signup("grower@example.com", "pw", "wp").validate(),
        Err(AccountError::PasswordMismatch)
    ));
    assert_eq!(
        signup("Grower@Example.com", "pw", "pw").validate().unwrap(),
        "Grower@example.com"
    );
}

#[test]
fn account_error_messages_match_form_feedback() {
    assert_eq!(AccountError::PasswordMismatch.to_string(), "Passwords do not match.");
    assert_eq!(AccountError::EmailInUse.to_string(), "Email already in use.");
}

#[tokio::test(flavor = "current_thread")]
async fn password_checks_leave_the_runtime_free() {
    let encoded = hash_password_with("s3cret", 200_000);
    let verification = tokio::spawn(verify_password_blocking("s3cret".into(), encoded));
    let other_request = tokio::spawn(tokio::time::sleep(Duration::from_millis(1)));

    other_request.await.unwrap();
    assert!(
        !verification.is_finished(),
        "the key derivation held the only runtime thread"
    );
    assert!(verification.await.unwrap().unwrap());
}

#[test]
fn register_and_authenticate_roundtrip() -> Result<()> {
    let database_url = match env::var("AGRONOMY_TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping accounts integration test because AGRONOMY_TEST_DATABASE_URL is not set"
            );
            return Ok(());
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let pool = db::connect(&database_url).await?;
        db::run_migrations(&pool).await?;

        let email = format!("grower-{}@example.com", Uuid::new_v4().simple());
        let user = register(&pool, &signup(&email, "s3cret", "s3cret")).await?;
        assert_eq!(user.username, email);

        let duplicate = register(&pool, &signup(&email, "other", "other")).await;
        assert!(matches!(duplicate, Err(AccountError::EmailInUse)));

        let login = LoginForm {
            email: email.clone(),
            password: "s3cret".into(),
        };
        let found = authenticate(&pool, &login).await?;
        assert_eq!(found.map(|u| u.user_id), Some(user.user_id));

        let widest = format!(
            "{}{}@{}.{}.{}.com",
            Uuid::new_v4().simple(),
            "l".repeat(32),
            "a".repeat(63),
            "b".repeat(63),
            "c".repeat(57)
        );
        assert_eq!(widest.len(), MAX_EMAIL_LEN);
        let wide_user = register(&pool, &signup(&widest, "s3cret", "s3cret")).await?;

        let wrong = LoginForm {
            email: email.clone(),
            password: "nope".into(),
        };
        assert!(authenticate(&pool, &wrong).await?.is_none());

        sqlx::query("DELETE FROM users WHERE user_id = ANY($1)")
            .bind(vec![user.user_id, wide_user.user_id])
            .execute(&pool)
            .await?;
        Ok(())
    })
}
