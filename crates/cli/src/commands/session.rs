//! Session commands: register, login, logout, whoami, open.

use meal_planner_client::routes::login::LoginFlow;
use meal_planner_client::routes::{Access, Route};
use meal_planner_client::services::{AuthError, NewUser};
use meal_planner_client::{AppError, AppState};
use meal_planner_core::UserRole;
use secrecy::SecretString;

/// Create an account. The new user still has to log in.
pub async fn register(
    state: &AppState,
    username: &str,
    full_name: &str,
    email: &str,
    password: &SecretString,
    role: UserRole,
) -> Result<(), AppError> {
    let user = NewUser::new(username, full_name, email, password, role)?;
    state.accounts().register(&user).await?;

    tracing::info!("Account created for {}", user.email);
    tracing::info!("Log in with: mealplan login -e {}", user.email);
    Ok(())
}

/// Log in through the login page flow.
pub async fn login(state: &AppState, email: &str, password: &SecretString) -> Result<(), AppError> {
    let mut flow = LoginFlow::new(state.session());
    if !flow.can_submit() {
        tracing::info!("Already logged in. Run `mealplan logout` first to switch accounts.");
        return Ok(());
    }

    let next = flow.submit(state.session(), email, password).await;
    if next == Route::Home {
        state.start().await;
        tracing::info!("Logged in as {email}");
        if state.premium().is_premium() {
            tracing::info!("Premium subscription active");
        }
        return Ok(());
    }

    if next == Route::Register {
        tracing::info!("No account uses this email. Create one with `mealplan register`.");
    }

    Err(flow
        .into_error()
        .unwrap_or(AuthError::Failed)
        .into())
}

pub fn logout(state: &AppState) -> Result<(), AppError> {
    state.logout()?;
    tracing::info!("Logged out");
    Ok(())
}

/// Show the identity carried by the stored token.
pub async fn whoami(state: &AppState) -> Result<(), AppError> {
    let Some(session) = state.session().session()? else {
        tracing::info!("Not logged in");
        return Ok(());
    };

    let Some(claims) = session.claims() else {
        tracing::info!("Logged in (token carries no readable claims)");
        return Ok(());
    };

    tracing::info!(
        "Logged in as {}",
        claims.email.as_deref().unwrap_or("unknown email")
    );
    if let Some(role) = state.session().role().await? {
        tracing::info!("Role: {role}");
    }
    if let Some(expires_at) = claims.expires_at() {
        tracing::info!("Token expires: {}", expires_at.to_rfc3339());
    }
    Ok(())
}

/// Evaluate the guards of a page without opening it.
pub async fn open(state: &AppState, path: &str) -> Result<(), AppError> {
    let route: Route = path.parse()?;

    match state.navigate(route).await {
        Access::Allow => tracing::info!("{route}: allowed"),
        Access::Redirect(destination) => {
            tracing::info!("{route}: redirected to {destination}");
        }
    }
    Ok(())
}
