use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use contact_error::AppError;
use serde::de::DeserializeOwned;

/// JSON extractor that answers malformed bodies with the service's own
/// 400 envelope instead of axum's default rejection
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected malformed JSON body");
                Err(AppError::InvalidJson)
            }
        }
    }
}
