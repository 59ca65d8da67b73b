use agora::ClientState;
use agora_auth::{AuthUiState, FlowEvent, LoginFlow};
use agora_models::OTP_LENGTH;
use chrono::Utc;
use dialoguer::{Input, Password};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What the user typed at the code prompt.
enum CodeCommand {
    Resend,
    Back,
    Backspace,
    Submit,
    Digits(String),
}

impl CodeCommand {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "resend" | "r" => Self::Resend,
            "back" | "b" => Self::Back,
            "-" => Self::Backspace,
            "" => Self::Submit,
            other => Self::Digits(other.to_string()),
        }
    }
}

pub async fn handle_login(
    state: &ClientState,
    identifier: Option<String>,
    password: Option<String>,
    print_metrics: bool,
) -> anyhow::Result<()> {
    let metrics = if print_metrics {
        agora_observability::init_metrics()
    } else {
        None
    };

    let flow = state.flow.clone();
    let mut identifier = identifier;
    let mut password = password;

    let redirect = loop {
        let id = match identifier.take() {
            Some(id) => id,
            None => prompt_identifier(flow.snapshot().identifier).await?,
        };
        let secret = match password.take() {
            Some(secret) => secret,
            None => prompt_password().await?,
        };

        info!(identifier = %id.trim(), "Signing in");
        let redirect = match flow.submit_credentials(&id, secret.into()).await {
            FlowEvent::Authenticated { redirect, .. } => redirect,
            FlowEvent::OtpRequired { email } => {
                println!(
                    "\nA {}-digit code has been sent to your email, {}.",
                    OTP_LENGTH, email
                );
                println!("   Type the digits (or paste the code), 'resend', 'back', '-' to erase.");
                match collect_code(&flow).await? {
                    Some(redirect) => redirect,
                    None => {
                        debug!("Returned to credential entry");
                        continue;
                    }
                }
            }
            FlowEvent::Failed(message) => {
                warn!(error = %message, "Sign-in failed");
                eprintln!("\n❌ {}", message);
                continue;
            }
            _ => continue,
        };

        // A token that is already past its expiry is not a usable session.
        if flow.check_expiry(Utc::now()) == FlowEvent::Expired {
            let message = flow.error().unwrap_or_default();
            warn!("Issued session had already expired");
            eprintln!("\n❌ {}", message);
            continue;
        }
        break redirect;
    };

    info!(redirect, "Signed in");
    println!("\n✅ Signed in. Continue at {}", redirect);
    if let Some(handle) = metrics {
        println!("\n{}", handle.render());
    }
    Ok(())
}

/// Runs the code step. Returns the redirect once signed in, or `None` when
/// the user goes back to credential entry.
async fn collect_code(flow: &Arc<LoginFlow>) -> anyhow::Result<Option<&'static str>> {
    let ticker = spawn_cooldown_ticker(flow.clone());
    let result = code_loop(flow).await;
    ticker.abort();
    result
}

async fn code_loop(flow: &Arc<LoginFlow>) -> anyhow::Result<Option<&'static str>> {
    loop {
        let snapshot = flow.snapshot();
        if !matches!(snapshot.ui, AuthUiState::AwaitingOtp(_)) {
            return Ok(None);
        }
        let resend_hint = if snapshot.cooldown > 0 {
            format!("resend in {}s", snapshot.cooldown)
        } else {
            "resend available".to_string()
        };
        let line = prompt_line(format!("Code [{}] ({})", snapshot.display, resend_hint)).await?;

        let event = match CodeCommand::parse(&line) {
            CodeCommand::Resend => flow.resend().await,
            CodeCommand::Back => {
                flow.back_to_login();
                return Ok(None);
            }
            CodeCommand::Backspace => flow.backspace(),
            CodeCommand::Submit => flow.submit_code().await,
            CodeCommand::Digits(text) => enter_digits(flow, &text).await,
        };

        match event {
            FlowEvent::Authenticated { redirect, .. } => return Ok(Some(redirect)),
            FlowEvent::Resent => {
                info!("New code requested");
                println!("📨 A new code is on its way.")
            }
            FlowEvent::Failed(message) => {
                debug!(error = %message, "Code step failed");
                eprintln!("❌ {}", message)
            }
            FlowEvent::Ignored if line.trim() == "resend" || line.trim() == "r" => {
                println!("⏳ Please wait {}s before requesting a new code.", flow.snapshot().cooldown)
            }
            _ => {}
        }
    }
}

/// A full code is pasted in one go; shorter input is typed digit by digit.
async fn enter_digits(flow: &LoginFlow, text: &str) -> FlowEvent {
    let digit_count = text.chars().filter(char::is_ascii_digit).count();
    if digit_count >= OTP_LENGTH {
        return flow.paste(text).await;
    }

    let mut last = FlowEvent::Ignored;
    for ch in text.chars() {
        last = flow.enter_digit(ch).await;
        if matches!(
            last,
            FlowEvent::Authenticated { .. } | FlowEvent::Failed(_)
        ) {
            break;
        }
    }
    last
}

fn spawn_cooldown_ticker(flow: Arc<LoginFlow>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            flow.tick();
        }
    })
}

async fn prompt_identifier(hint: String) -> anyhow::Result<String> {
    let id = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt("Email or public ID")
            .with_initial_text(hint)
            .interact_text()
    })
    .await??;
    Ok(id)
}

async fn prompt_password() -> anyhow::Result<String> {
    let password =
        tokio::task::spawn_blocking(|| Password::new().with_prompt("Password").interact())
            .await??;
    Ok(password)
}

async fn prompt_line(prompt: String) -> anyhow::Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await??;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_command_parsing() {
        assert!(matches!(CodeCommand::parse(" resend "), CodeCommand::Resend));
        assert!(matches!(CodeCommand::parse("b"), CodeCommand::Back));
        assert!(matches!(CodeCommand::parse("-"), CodeCommand::Backspace));
        assert!(matches!(CodeCommand::parse(""), CodeCommand::Submit));
        assert!(matches!(
            CodeCommand::parse("482 913"),
            CodeCommand::Digits(text) if text == "482 913"
        ));
    }
}
