use std::{env, sync::Arc};

use dotenvy::dotenv;
use log::*;
use riskified_notifications::{
    cli::handle_command_line_args,
    config::ReceiverConfig,
    Notification,
    NotificationServer,
    NotificationStatus,
};
use riskified_tools::{GatewayConfig, WebhookRegistrar};
use rsk_common::helpers::env_flag;
use url::Url;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let webhook = webhook_url();
    if env_flag("RISKIFIED_UNREGISTER_WEBHOOK", false) {
        if let Some(registrar) = registrar() {
            if let Err(e) = registrar.unregister().await {
                error!("🔔️ Could not unregister the notification webhook. {e}");
            }
        }
        return;
    }
    let config = receiver_config(webhook.as_ref());
    if env_flag("RISKIFIED_REGISTER_WEBHOOK", false) {
        register_webhook(&config, webhook).await;
    }

    let server = Arc::new(NotificationServer::new(config, log_notification));
    let stopper = Arc::clone(&server);
    actix_web::rt::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => stopper.stop(),
            Err(e) => error!("🛑️ Could not listen for Ctrl-C. {e}"),
        }
    });
    match server.start().await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

fn webhook_url() -> Option<Url> {
    let s = env::var("RISKIFIED_NOTIFICATIONS_WEBHOOK_URL").ok()?;
    Url::parse(&s).map_err(|e| error!("🪛️ Invalid RISKIFIED_NOTIFICATIONS_WEBHOOK_URL '{s}'. {e}")).ok()
}

/// Without an explicit bind address, listen where the webhook says notifications will arrive.
fn receiver_config(webhook: Option<&Url>) -> ReceiverConfig {
    let config = ReceiverConfig::from_env_or_default();
    match webhook {
        Some(url) if env::var("RISKIFIED_NOTIFICATIONS_HOST").is_err() => {
            config.clone().listen_on(url).unwrap_or_else(|e| {
                warn!("🪛️ Cannot listen on the webhook URL. {e} Using the configured address instead.");
                config
            })
        },
        _ => config,
    }
}

fn log_notification(notification: Notification) {
    let Notification { order_id, status, description } = notification;
    match status {
        NotificationStatus::Approved => info!("✅️ Order {order_id} approved. {description}"),
        NotificationStatus::Declined => warn!("❌️ Order {order_id} declined. {description}"),
        NotificationStatus::Error => error!("🚨️ Riskified could not process order {order_id}. {description}"),
        _ => info!("🔔️ Order {order_id} is {status}. {description}"),
    }
}

async fn register_webhook(config: &ReceiverConfig, webhook: Option<Url>) {
    let webhook = match webhook {
        Some(url) => url,
        None => {
            let url = format!("http://{}:{}{}", config.host, config.port, config.path);
            warn!("🪛️ RISKIFIED_NOTIFICATIONS_WEBHOOK_URL is not set. Registering {url}, which is probably not public.");
            match Url::parse(&url) {
                Ok(url) => url,
                Err(e) => {
                    error!("🔔️ Invalid webhook URL. {e}. The webhook was not registered.");
                    return;
                },
            }
        },
    };
    let Some(registrar) = registrar() else { return };
    if let Err(e) = registrar.register(&webhook).await {
        error!("🔔️ Could not register webhook {webhook}. {e}");
    }
}

fn registrar() -> Option<WebhookRegistrar> {
    WebhookRegistrar::new(&GatewayConfig::new_from_env_or_default())
        .map_err(|e| error!("🔔️ Could not create the webhook registrar. {e}"))
        .ok()
}
