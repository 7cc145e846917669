//! Profile, settings and theme commands.

use meal_planner_client::api::types::{ProfileUpdate, SettingsUpdate};
use meal_planner_client::routes::Route;
use meal_planner_client::{AppError, AppState};
use meal_planner_core::{SettingsTheme, ThemePreference};

use super::require;

/// Show the profile, updating it first if any field is given.
pub async fn profile(
    state: &AppState,
    username: Option<String>,
    full_name: Option<String>,
    email: Option<String>,
) -> Result<(), AppError> {
    require(state, Route::Profile).await?;

    let update = ProfileUpdate {
        username,
        email,
        full_name,
        rol: None,
    };
    let profile = if update.is_empty() {
        state.accounts().profile().await?
    } else {
        let profile = state.accounts().update_profile(&update).await?;
        tracing::info!("Profile updated");
        profile
    };

    tracing::info!("User ID: {}", profile.user_id);
    tracing::info!("Username: {}", profile.username);
    tracing::info!("Name: {}", profile.full_name);
    tracing::info!("Email: {}", profile.email);
    if let Some(rol) = &profile.rol {
        tracing::info!("Role: {rol}");
    }
    Ok(())
}

/// Show the settings, updating them first if any field is given.
pub async fn settings(
    state: &AppState,
    theme: Option<SettingsTheme>,
    language: Option<String>,
    notifications: Option<bool>,
) -> Result<(), AppError> {
    require(state, Route::Settings).await?;

    let settings = if theme.is_none() && language.is_none() && notifications.is_none() {
        state.accounts().settings().await?
    } else {
        let update = SettingsUpdate {
            theme,
            language,
            model: None,
            notifications,
        };
        let settings = state.accounts().update_settings(&update).await?;
        tracing::info!("Settings saved");
        settings
    };

    tracing::info!("Theme: {:?}", settings.theme);
    tracing::info!("Language: {}", settings.language);
    if !settings.model.is_empty() {
        tracing::info!("Model: {}", settings.model);
    }
    tracing::info!(
        "Notifications: {}",
        if settings.notifications { "on" } else { "off" }
    );
    Ok(())
}

/// A requested change to the local theme.
#[derive(Debug, Clone, Copy)]
pub enum ThemeChange {
    Toggle,
    Set(ThemePreference),
}

/// Show the local theme, or change it. Works without a session.
pub fn theme(state: &AppState, change: Option<ThemeChange>) -> Result<(), AppError> {
    let theme = match change {
        None => state.theme().load()?,
        Some(ThemeChange::Toggle) => state.theme().toggle()?,
        Some(ThemeChange::Set(theme)) => {
            state.theme().set(theme)?;
            theme
        }
    };

    tracing::info!("Theme: {theme}");
    Ok(())
}
