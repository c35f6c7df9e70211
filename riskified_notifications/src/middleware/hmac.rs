//! HMAC middleware for Actix Web.
//!
//! Riskified signs every notification with the merchant's auth token, using the body of the request as the data to
//! sign. The signature is provided in the `X-Riskified-Hmac-Sha256` header.
//!
//! Requests without a valid signature are answered with `401 Unauthorized` here and never reach the wrapped service.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use rsk_common::{headers::HMAC_HEADER, verify_hmac, Secret};

use crate::errors::NotificationError;

pub struct HmacMiddlewareFactory {
    hmac_header: String,
    key: Secret<String>,
}

impl HmacMiddlewareFactory {
    pub fn new(key: Secret<String>) -> Self {
        Self::with_header(HMAC_HEADER, key)
    }

    pub fn with_header(hmac_header: &str, key: Secret<String>) -> Self {
        HmacMiddlewareFactory { hmac_header: hmac_header.into(), key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            hmac_header: self.hmac_header.clone(),
            key: self.key.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    hmac_header: String,
    key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.clone();
        let hmac_header = self.hmac_header.clone();
        Box::pin(async move {
            trace!("🔐️ Checking HMAC for request");
            let data = match req.extract::<web::Bytes>().await {
                Ok(data) => data,
                Err(e) => {
                    warn!("🔐️ Failed to extract request data: {e:?}");
                    let err = NotificationError::InvalidRequestBody(e.to_string());
                    return Ok(req.error_response(err).map_into_right_body());
                },
            };
            let signature = req.headers().get(&hmac_header).and_then(|v| v.to_str().ok()).map(str::to_string);
            let err = match signature {
                _ if secret.is_empty() => {
                    warn!("🔐️ No auth token is configured. denying access.");
                    NotificationError::Unauthenticated("The receiver has no auth token configured.".into())
                },
                None => {
                    warn!("🔐️ No HMAC signature found in request. denying access.");
                    NotificationError::Unauthenticated("No HMAC signature found.".into())
                },
                Some(sig) if verify_hmac(secret.reveal(), data.as_ref(), &sig) => {
                    trace!("🔐️ HMAC check for request ✅️");
                    req.set_payload(bytes_to_payload(data));
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                },
                Some(_) => {
                    warn!("🔐️ Invalid HMAC signature found in request. denying access.");
                    NotificationError::Unauthenticated("Invalid HMAC signature.".into())
                },
            };
            Ok(req.error_response(err).map_into_right_body())
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
