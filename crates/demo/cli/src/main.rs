//! Push Demo - register for, schedule, and broadcast notifications.

mod config;
mod prompt;

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr as _;
use push_core::{NotificationCategory, NotificationData};
use push_platform::{NotificationProvider, PlatformKind, SelectedProvider};
use push_remote::HttpPushService;
use push_workflow::NotificationClient;

use crate::config::Config;
use crate::prompt::CliPrompt;

type Client = NotificationClient<SelectedProvider<CliPrompt>, HttpPushService>;

#[derive(Parser)]
#[command(name = "push-demo")]
#[command(about = "Register for, schedule, and broadcast notifications", long_about = None)]
struct Cli {
    /// Push relay base URL (overrides config and PUSH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Notification platform: native or browser
    #[arg(long, global = true)]
    platform: Option<PlatformKind>,

    /// Behave like a simulator that cannot receive push
    #[arg(long, global = true)]
    simulator: bool,

    /// Answer the permission prompt with yes
    #[arg(long, global = true, conflicts_with = "deny")]
    grant: bool,

    /// Answer the permission prompt with no
    #[arg(long, global = true)]
    deny: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register this device with the push relay
    Register,

    /// Ask for notification permission without registering
    Permission,

    /// Schedule a local notification and wait for it to show
    Schedule {
        #[arg(long, default_value = "Local Notification")]
        title: String,
        #[arg(long, default_value = "This is a local notification!")]
        body: String,
        /// Payload entry as key=value (repeatable)
        #[arg(long = "data", value_parser = parse_data_entry)]
        data: Vec<(String, serde_json::Value)>,
        /// Seconds until the notification fires
        #[arg(long, default_value_t = 1)]
        delay: u64,
        /// Respond to the notification with this action once it shows
        #[arg(long)]
        action: Option<String>,
    },

    /// Broadcast a push notification to every subscribed device
    Send {
        #[arg(long, default_value = "Test Notification")]
        title: String,
        #[arg(long, default_value = "This is a test notification!")]
        body: String,
        /// Payload entry as key=value (repeatable)
        #[arg(long = "data", value_parser = parse_data_entry)]
        data: Vec<(String, serde_json::Value)>,
    },

    /// Print the relay's VAPID public key
    VapidKey,
}

/// Parse `key=value`. Values that read as JSON keep their type.
fn parse_data_entry(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load()
        .wrap_err("failed to load config")?
        .with_api_url(std::env::var("PUSH_API_URL").ok())
        .with_api_url(cli.api_url.clone());

    let mut native = config.native();
    if cli.simulator {
        native.is_device = false;
    }

    let provider = SelectedProvider::select(
        cli.platform.unwrap_or(config.platform),
        native,
        CliPrompt::from_flags(cli.grant, cli.deny),
    );

    // Process-wide presentation setup, done once before anything is shown.
    provider
        .set_foreground_policy(config.foreground)
        .wrap_err("failed to set foreground policy")?;
    provider
        .set_category(NotificationCategory::default_category())
        .await
        .wrap_err("failed to register default category")?;

    tracing::info!(api_url = %config.api_url, "push-demo starting");

    let client = NotificationClient::new(provider, HttpPushService::new(&config.api_url))
        .with_channel(config.channel.clone())
        .with_category("default");

    match cli.command {
        Commands::Register => cmd_register(&client).await,
        Commands::Permission => cmd_permission(&client).await,
        Commands::Schedule {
            title,
            body,
            data,
            delay,
            action,
        } => {
            cmd_schedule(
                &client,
                title,
                body,
                data.into_iter().collect(),
                delay,
                action.as_deref(),
            )
            .await
        }
        Commands::Send { title, body, data } => {
            cmd_send(&client, title, body, data.into_iter().collect()).await
        }
        Commands::VapidKey => cmd_vapid_key(&client).await,
    }
}

async fn cmd_register(client: &Client) -> color_eyre::eyre::Result<()> {
    match client.try_register().await {
        Ok(token) => println!("Push token: {token}"),
        Err(e) if e.is_expected() => println!("No push token: {e}"),
        Err(e) => println!("Registration failed: {e}"),
    }

    Ok(())
}

async fn cmd_permission(client: &Client) -> color_eyre::eyre::Result<()> {
    let state = client
        .provider()
        .request_permission()
        .await
        .wrap_err("failed to request permission")?;

    println!("Notification permission: {state}");
    Ok(())
}

/// How long to wait for a notification due in `delay` seconds.
fn receive_window(delay: u64) -> Duration {
    Duration::from_secs(delay.saturating_add(5))
}

async fn cmd_schedule(
    client: &Client,
    title: String,
    body: String,
    data: NotificationData,
    delay: u64,
    action: Option<&str>,
) -> color_eyre::eyre::Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    // Both dropped when this command returns.
    let _received = client.provider().add_received_listener(move |notification| {
        let _ = tx.send(notification.clone());
    });
    let _responses = client.provider().add_response_listener(|response| {
        println!(
            "Notification response: {} on {}",
            response.action_identifier, response.notification.request.title
        );
    });

    client
        .provider()
        .request_permission()
        .await
        .wrap_err("failed to request permission")?;

    let id = client
        .schedule_local(title, body, data, delay)
        .await
        .wrap_err("failed to schedule notification")?;

    println!("Notification scheduled: {id}");

    match tokio::time::timeout(receive_window(delay), rx.recv()).await {
        Ok(Some(notification)) => {
            println!(
                "Notification received: {} - {}",
                notification.request.title, notification.request.body
            );
            if !notification.request.data.is_empty() {
                println!(
                    "Data: {}",
                    serde_json::Value::Object(notification.request.data.clone())
                );
            }

            if let Some(action) = action {
                client
                    .provider()
                    .center()
                    .respond(notification.id, action)
                    .wrap_err("failed to respond to notification")?;
            }
        }
        _ => println!("Notification did not arrive in time"),
    }

    Ok(())
}

async fn cmd_send(
    client: &Client,
    title: String,
    body: String,
    data: NotificationData,
) -> color_eyre::eyre::Result<()> {
    let response = client
        .send_push(title, body, data)
        .await
        .wrap_err("failed to send push notification")?;

    println!(
        "Push notification sent: {}",
        serde_json::to_string_pretty(&response).wrap_err("failed to format response")?
    );

    Ok(())
}

async fn cmd_vapid_key(client: &Client) -> color_eyre::eyre::Result<()> {
    let key = client
        .public_vapid_key()
        .await
        .wrap_err("failed to fetch VAPID public key")?;

    println!("{key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use push_core::PermissionState;
    use push_platform::NativeConfig;

    use super::*;

    fn client(prompt: CliPrompt) -> Client {
        let provider =
            SelectedProvider::select(PlatformKind::Native, NativeConfig::default(), prompt);
        NotificationClient::new(provider, HttpPushService::new("http://127.0.0.1:9"))
            .with_category("default")
    }

    #[test]
    fn test_receive_window_saturates() {
        assert_eq!(receive_window(1), Duration::from_secs(6));
        assert_eq!(receive_window(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_accepts_largest_delay() {
        let client = client(CliPrompt::from_flags(true, false));

        let data = NotificationData::new();
        cmd_schedule(&client, "T".into(), "B".into(), data, u64::MAX, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_schedule_responds_with_action() {
        let client = client(CliPrompt::from_flags(true, false));
        client
            .provider()
            .set_category(NotificationCategory::default_category())
            .await
            .unwrap();

        let data = NotificationData::new();
        cmd_schedule(&client, "T".into(), "B".into(), data.clone(), 0, Some("default"))
            .await
            .unwrap();

        let unknown = cmd_schedule(&client, "T".into(), "B".into(), data, 0, Some("archive")).await;
        assert!(unknown.is_err());
        assert_eq!(client.provider().center().response_listener_count(), 0);
    }

    #[tokio::test]
    async fn test_permission_command_settles_state() {
        let client = client(CliPrompt::from_flags(false, true));

        cmd_permission(&client).await.unwrap();

        assert_eq!(
            client.provider().permission_status().await.unwrap(),
            PermissionState::Denied
        );
    }

    #[test]
    fn test_parse_data_entry() {
        assert_eq!(
            parse_data_entry("k=v").unwrap(),
            ("k".to_string(), serde_json::json!("v"))
        );
        assert_eq!(
            parse_data_entry("count=3").unwrap(),
            ("count".to_string(), serde_json::json!(3))
        );
        assert!(parse_data_entry("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_schedule() {
        let cli = Cli::try_parse_from([
            "push-demo",
            "--grant",
            "schedule",
            "--data",
            "k=v",
            "--delay",
            "2",
        ])
        .unwrap();

        assert!(cli.grant);
        match cli.command {
            Commands::Schedule { data, delay, .. } => {
                assert_eq!(delay, 2);
                assert_eq!(data.len(), 1);
            }
            _ => panic!("expected schedule"),
        }
    }

    #[test]
    fn test_grant_conflicts_with_deny() {
        assert!(Cli::try_parse_from(["push-demo", "--grant", "--deny", "register"]).is_err());
    }
}
