use agronomy_core::accounts::{self, SignupForm};
use agronomy_core::db::DbPool;
use anyhow::Result;

pub async fn create_user(pool: &DbPool, email: &str, password: &str) -> Result<()> {
    let form = SignupForm {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    };
    let user = accounts::register(pool, &form).await?;
    println!("Created user {} ({})", user.username, user.user_id);
    Ok(())
}
