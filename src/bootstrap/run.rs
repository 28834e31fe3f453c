//! Headless kiosk runner.
//!
//! Stdin stands in for the touch screen and stdout for the display.

use anyhow::Context;
use kc_app::KioskOrchestrator;
use kc_core::{KioskState, Screen};
use kc_infra::SocketIoRemote;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::wiring::{KioskDeps, RemoteInput};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    CheckIn(String),
    TapWelcome,
    Reset,
    Quit,
    Blank,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Command::Blank,
        "welcome" => Command::TapWelcome,
        "reset" => Command::Reset,
        "quit" | "exit" => Command::Quit,
        _ => {
            let phone: String = line
                .chars()
                .filter(|c| !matches!(c, ' ' | '-'))
                .collect();
            if !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit()) {
                Command::CheckIn(phone)
            } else {
                Command::Unknown(line.to_string())
            }
        }
    }
}

fn render_screen(state: &KioskState) -> String {
    match state.screen {
        Screen::Welcome => "[welcome] Tap to check in".to_string(),
        Screen::Checkin => match (&state.checkin_error, state.checkin_in_flight) {
            (_, true) => format!("[checkin] Checking in {}...", state.phone_number),
            (Some(error), false) => format!("[checkin] {error}"),
            (None, false) => "[checkin] Enter your phone number".to_string(),
        },
        Screen::Success => format!(
            "[success] Your order is ready, {}! You have {} reward points.",
            state.customer_name, state.reward_points
        ),
    }
}

/// Returns `false` once the runner should stop.
async fn handle_command(kiosk: &KioskOrchestrator, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::CheckIn(phone) => {
            kiosk.set_phone_number(phone.clone()).await?;
            // The check-in runs in the background so the display keeps updating.
            let kiosk = kiosk.clone();
            tokio::spawn(async move {
                if let Err(err) = kiosk.request_checkin(phone).await {
                    warn!(error = %err, "check-in request did not complete");
                }
            });
        }
        Command::TapWelcome => {
            kiosk.tap_welcome().await?;
        }
        Command::Reset => {
            kiosk.force_reset().await?;
        }
        Command::Quit => return Ok(false),
        Command::Blank => {}
        Command::Unknown(input) => debug!(%input, "ignoring unrecognised input"),
    }
    Ok(true)
}

async fn connect_remote(remote: Option<RemoteInput>) -> Option<SocketIoRemote> {
    let RemoteInput { url, handler } = remote?;
    match SocketIoRemote::connect(&url, handler).await {
        Ok(listener) => {
            info!(%url, "listening for remote input");
            Some(listener)
        }
        Err(err) => {
            // The kiosk still works from stdin and the poller.
            warn!(error = %err, "remote input unavailable");
            None
        }
    }
}

/// Start the kiosk and run until stdin closes, `quit`, or Ctrl-C.
pub async fn run_kiosk(deps: KioskDeps) -> anyhow::Result<()> {
    let KioskDeps {
        orchestrator,
        fired,
        mut states,
        remote,
    } = deps;

    let runtime = orchestrator
        .start(fired)
        .await
        .context("Failed to start kiosk")?;
    info!("kiosk running; enter a phone number, 'welcome', 'reset' or 'quit'");
    println!("{}", render_screen(&runtime.orchestrator().state().await));
    let remote = connect_remote(remote).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                println!("{}", render_screen(&state));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_command(runtime.orchestrator(), parse_command(&line)).await? {
                    break;
                }
            }
        }
    }

    if let Some(listener) = remote {
        if let Err(err) = listener.disconnect().await {
            warn!(error = %err, "remote input did not close cleanly");
        }
    }
    runtime.shutdown().await.context("Failed to shut kiosk down")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("555-123 4567"),
            Command::CheckIn("5551234567".to_string())
        );
        assert_eq!(parse_command(" Welcome "), Command::TapWelcome);
        assert_eq!(parse_command("reset"), Command::Reset);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("   "), Command::Blank);
        assert_eq!(parse_command("--"), Command::Unknown("--".to_string()));
        assert_eq!(parse_command("abc"), Command::Unknown("abc".to_string()));
    }

    #[test]
    fn test_render_screen() {
        let mut state = KioskState::default();
        assert_eq!(render_screen(&state), "[checkin] Enter your phone number");

        state.checkin_error = Some("You have no order".to_string());
        assert_eq!(render_screen(&state), "[checkin] You have no order");

        state.screen = Screen::Success;
        state.customer_name = "Jane".to_string();
        state.reward_points = 10;
        assert_eq!(
            render_screen(&state),
            "[success] Your order is ready, Jane! You have 10 reward points."
        );
    }
}
