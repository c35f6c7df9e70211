//! The single notification route.
//!
//! The path is configurable, so the route is registered with [`configure_notifications`] rather than a fixed
//! `#[post(..)]` attribute.

use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use rsk_common::Secret;

use crate::{
    data_objects::JsonResponse,
    errors::NotificationError,
    middleware::HmacMiddlewareFactory,
    notification::{Notification, NotificationDispatcher},
};

/// Registers the notification route on `path`, guarded by the HMAC middleware keyed with `auth_token`.
pub fn configure_notifications(path: String, auth_token: Secret<String>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::resource(path)
                .wrap(HmacMiddlewareFactory::new(auth_token))
                .route(web::post().to(notification_webhook)),
        );
    }
}

/// Only authenticated requests reach this handler. A body that is not a notification is answered with
/// `400 Bad Request` and the handler is not called.
pub async fn notification_webhook(
    req: HttpRequest,
    body: web::Bytes,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<HttpResponse, NotificationError> {
    trace!("🔔️ Received notification request: {}", req.uri());
    let notification = serde_json::from_slice::<Notification>(&body).map_err(|e| {
        warn!("🔔️ Could not parse notification. {e}");
        NotificationError::InvalidNotification(e.to_string())
    })?;
    info!("🔔️ Order {} is {}. {}", notification.order_id, notification.status, notification.description);
    let order_id = notification.order_id.clone();
    dispatcher.dispatch(notification);
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Notification for order {order_id} received"))))
}
