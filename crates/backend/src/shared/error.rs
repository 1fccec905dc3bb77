use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a006_intervention::workflow::WorkflowError;
use contracts::domain::common::ApiErrorBody;

pub const INTERNAL_ERROR_MESSAGE: &str = "Erreur interne du serveur";

/// Error returned by services and handlers, rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("Permissions insuffisantes".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("Identifiants invalides".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client; internal causes stay in the logs.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidTransition { .. } => ApiError::BadRequest(err.to_string()),
            WorkflowError::NotAssignedTechnician | WorkflowError::NotAllowed => {
                ApiError::Forbidden(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!("Internal error: {:#}", cause);
        }

        let status = self.status();
        let body = Json(ApiErrorBody {
            detail: self.detail(),
        });

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::InterventionStatus;
    use contracts::domain::a006_intervention::workflow::InterventionAction;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid_credentials().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_cause_is_hidden() {
        let err = ApiError::from(anyhow::anyhow!("no such table: users"));
        assert_eq!(err.detail(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(ApiError::not_found("Site non trouvé").detail(), "Site non trouvé");
    }

    #[test]
    fn workflow_errors_map_to_client_errors() {
        let invalid = ApiError::from(WorkflowError::InvalidTransition {
            from: InterventionStatus::Pending,
            action: InterventionAction::Complete,
        });
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert!(invalid.detail().starts_with("Transition invalide"));
        assert_eq!(
            ApiError::from(WorkflowError::NotAllowed).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unauthorized_response_has_challenge() {
        let response = ApiError::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
