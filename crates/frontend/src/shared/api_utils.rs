//! API utilities for frontend-backend communication
//!
//! Every request carries the stored bearer token. Failures come back as the
//! French message to display: the `detail` field of the error body, or a
//! generic text for server errors. A 401 ends the session.

use contracts::domain::common::ApiErrorBody;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::toast;
use crate::system::auth::{context, storage};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expirée, veuillez vous reconnecter";
pub const SERVER_ERROR_MESSAGE: &str = "Erreur serveur, veuillez réessayer plus tard";
pub const NETWORK_ERROR_MESSAGE: &str = "Impossible de contacter le serveur";

/// Get the base URL for API requests
///
/// The backend serves both the SPA and the API, so this is the origin the
/// page was loaded from, e.g. "http://localhost:3000".
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    format!("{}//{}", protocol, host)
}

/// Build a full API URL from a path relative to `/api`
///
/// ```rust,ignore
/// let url = api_url("/equipment/12");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}/api{}", api_base(), path)
}

/// `path?query` with the query serialized by serde_qs; empty queries add nothing
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", path, qs),
        Ok(_) => path.to_string(),
        Err(e) => {
            log::warn!("Query serialization failed for {}: {}", path, e);
            path.to_string()
        }
    }
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// What a failed response turns into, before any side effect
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    SessionExpired,
    Server,
    Client(String),
}

impl Failure {
    pub fn classify(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => Failure::SessionExpired,
            s if s >= 500 => Failure::Server,
            s => Failure::Client(detail.unwrap_or_else(|| format!("Erreur {}", s))),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Failure::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Failure::Server => SERVER_ERROR_MESSAGE.to_string(),
            Failure::Client(detail) => detail.clone(),
        }
    }
}

async fn failure(response: Response) -> String {
    let status = response.status();
    let detail = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .map(|body| body.detail);
    let failure = Failure::classify(status, detail);

    match &failure {
        Failure::SessionExpired => {
            log::warn!("{} returned 401, ending session", response.url());
            context::expire_session();
            toast::error(SESSION_EXPIRED_MESSAGE);
        }
        Failure::Server => {
            log::error!("{} returned {}", response.url(), status);
            toast::error(SERVER_ERROR_MESSAGE);
        }
        Failure::Client(_) => {}
    }
    failure.message()
}

async fn dispatch(request: Result<Request, gloo_net::Error>) -> Result<Response, String> {
    let request = request.map_err(|e| format!("Requête invalide : {}", e))?;
    request.send().await.map_err(|e| {
        log::error!("Request failed: {}", e);
        NETWORK_ERROR_MESSAGE.to_string()
    })
}

async fn send(request: Result<Request, gloo_net::Error>) -> Result<Response, String> {
    let response = dispatch(request).await?;
    if response.ok() {
        Ok(response)
    } else {
        Err(failure(response).await)
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Réponse invalide : {}", e))
}

pub async fn api_get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = send(authorized(Request::get(&api_url(path))).build()).await?;
    parse(response).await
}

pub async fn api_get_with_query<Q: Serialize, T: DeserializeOwned>(
    path: &str,
    query: &Q,
) -> Result<T, String> {
    api_get(&with_query(path, query)).await
}

pub async fn api_post<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let response = send(authorized(Request::post(&api_url(path))).json(body)).await?;
    parse(response).await
}

/// POST without a body, used by the action endpoints (`/activate`, `/start`, ...)
pub async fn api_post_empty<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = send(authorized(Request::post(&api_url(path))).build()).await?;
    parse(response).await
}

pub async fn api_put<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let response = send(authorized(Request::put(&api_url(path))).json(body)).await?;
    parse(response).await
}

pub async fn api_delete(path: &str) -> Result<(), String> {
    send(authorized(Request::delete(&api_url(path))).build()).await?;
    Ok(())
}

/// POST for the sign-in endpoints: no token, and a 401 is a plain error message
pub async fn api_post_anonymous<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, String> {
    let response = dispatch(Request::post(&api_url(path)).json(body)).await?;
    if !response.ok() {
        let status = response.status();
        let detail = response.json::<ApiErrorBody>().await.ok().map(|b| b.detail);
        return Err(match status {
            s if s >= 500 => SERVER_ERROR_MESSAGE.to_string(),
            s => detail.unwrap_or_else(|| format!("Erreur {}", s)),
        });
    }
    parse(response).await
}

/// Multipart POST; the browser sets the boundary header itself
pub async fn api_post_form<T: DeserializeOwned>(
    path: &str,
    form: web_sys::FormData,
) -> Result<T, String> {
    let response = send(authorized(Request::post(&api_url(path))).body(form)).await?;
    parse(response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_equipment::aggregate::EquipmentFilter;
    use contracts::enums::EquipmentStatus;

    #[test]
    fn failures_are_classified() {
        assert_eq!(Failure::classify(401, Some("x".into())), Failure::SessionExpired);
        assert_eq!(Failure::classify(502, None).message(), SERVER_ERROR_MESSAGE);
        assert_eq!(
            Failure::classify(400, Some("Nom obligatoire".into())).message(),
            "Nom obligatoire"
        );
        assert_eq!(Failure::classify(404, None).message(), "Erreur 404");
    }

    #[test]
    fn query_strings_skip_empty_filters() {
        let filter = EquipmentFilter {
            status: Some(EquipmentStatus::Broken),
            search: Some("presse".into()),
            ..Default::default()
        };
        let url = with_query("/equipment", &filter);
        assert!(url.starts_with("/equipment?"));
        assert!(url.contains("status=broken"));
        assert!(url.contains("search=presse"));
        assert!(!url.contains("site_id"));
    }
}
