use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::ContentType;
use actix_web::middleware::Next;
use actix_web::{HttpResponse, web};
use std::net::IpAddr;

/// Peers allowed to talk to the API. Empty means everyone is.
#[derive(Debug, Clone, Default)]
pub struct AllowedHosts(Vec<IpAddr>);

impl AllowedHosts {
    pub fn new(addresses: Vec<IpAddr>) -> Self {
        Self(addresses)
    }

    pub fn permits(&self, peer: Option<IpAddr>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        match peer {
            Some(peer) => {
                let peer = peer.to_canonical();
                self.0.iter().any(|allowed| allowed.to_canonical() == peer)
            }
            None => false,
        }
    }
}

pub async fn reject_unlisted_hosts(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let peer = req.peer_addr().map(|address| address.ip());
    let permitted = req
        .app_data::<web::Data<AllowedHosts>>()
        .is_none_or(|hosts| hosts.permits(peer));

    if permitted {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    tracing::warn!(peer = ?peer, "Rejected request from a host outside the allow-list.");
    let response = HttpResponse::Forbidden()
        .content_type(ContentType::plaintext())
        .body("FORBIDDEN");
    let (request, _) = req.into_parts();
    Ok(ServiceResponse::new(request, response).map_into_right_body())
}
