use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use log::*;
use tokio::sync::oneshot;

use crate::{
    config::ReceiverConfig,
    errors::ServerError,
    notification::{NotificationDispatcher, NotificationHandler},
    routes::configure_notifications,
};

enum ListenerState {
    Stopped,
    /// The sender is taken by `stop`, so `Listening(None)` means shutdown is under way.
    Listening(Option<oneshot::Sender<()>>),
}

/// A webhook receiver for Riskified decision notifications.
///
/// The state machine is `Stopped → Listening → Stopped`. [`start`](Self::start) runs the server and only returns once
/// [`stop`](Self::stop) has been called (from any thread or task) or the server fails. Handler invocations are
/// serialized; see [`NotificationDispatcher`].
pub struct NotificationServer {
    config: ReceiverConfig,
    dispatcher: web::Data<NotificationDispatcher>,
    state: Mutex<ListenerState>,
}

impl NotificationServer {
    pub fn new<H: NotificationHandler + 'static>(config: ReceiverConfig, handler: H) -> Self {
        let dispatcher = web::Data::new(NotificationDispatcher::new(handler));
        Self { config, dispatcher, state: Mutex::new(ListenerState::Stopped) }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        matches!(*self.state(), ListenerState::Listening(_))
    }

    /// Binds the configured address and serves notifications until [`stop`](Self::stop) is called.
    ///
    /// Must be awaited on an actix system, e.g. inside `#[actix_web::main]`. Returns
    /// [`ServerError::AlreadyListening`] if this instance is already running.
    pub async fn start(&self) -> Result<(), ServerError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state();
            if matches!(*state, ListenerState::Listening(_)) {
                return Err(ServerError::AlreadyListening);
            }
            *state = ListenerState::Listening(Some(tx));
        }
        let result = self.serve(rx).await;
        *self.state() = ListenerState::Stopped;
        result
    }

    /// Asks a running [`start`](Self::start) to shut down gracefully. In-flight requests are given up to the configured
    /// shutdown timeout to complete. Does nothing if the server is not listening.
    pub fn stop(&self) {
        let sender = match &mut *self.state() {
            ListenerState::Listening(sender) => sender.take(),
            ListenerState::Stopped => None,
        };
        match sender {
            Some(tx) => {
                info!("🛑️ Stopping notification server");
                // The receiver only disappears once `start` is already returning
                let _ = tx.send(());
            },
            None => debug!("🛑️ Notification server is not listening. Nothing to stop."),
        }
    }

    async fn serve(&self, shutdown: oneshot::Receiver<()>) -> Result<(), ServerError> {
        let server = create_server_instance(&self.config, self.dispatcher.clone())?;
        let handle = server.handle();
        info!("🚀️ Listening for notifications on {}:{}{}", self.config.host, self.config.port, self.config.path);
        tokio::pin!(server);
        tokio::select! {
            result = &mut server => {
                warn!("🛑️ Notification server exited on its own");
                result?;
            },
            _ = shutdown => {
                // The stop reply is sent by the server future, so it must be polled before the reply is awaited
                let stopped = handle.stop(true);
                server.await?;
                stopped.await;
                info!("🛑️ Notification server stopped");
            },
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, ListenerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn create_server_instance(
    config: &ReceiverConfig,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<Server, ServerError> {
    let path = config.path.clone();
    let auth_token = config.auth_token.clone();
    if auth_token.is_empty() {
        warn!("🔐️ No auth token is configured. Every notification will be rejected until one is set.");
    }
    let mut srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rsk::access_log"))
            .app_data(dispatcher.clone())
            .configure(configure_notifications(path.clone(), auth_token.clone()))
    })
    .disable_signals()
    .shutdown_timeout(config.shutdown_timeout.as_secs());
    if let Some(workers) = config.workers {
        srv = srv.workers(workers);
    }
    let srv = srv.bind((config.host.as_str(), config.port))?.run();
    Ok(srv)
}
