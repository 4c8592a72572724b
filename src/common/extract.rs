// src/common/extract.rs

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::common::error::AppError;

// ---
// JsonBody: Json + validator numa tacada só
// ---
// A rejeição padrão do Axum (422, texto puro) quebraria o envelope,
// então convertemos tudo para AppError.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Corpo rejeitado: {}", rejection.body_text());
            AppError::BadRequest("Invalid input".to_string())
        })?;

        value.validate()?;
        Ok(JsonBody(value))
    }
}

// ---
// IdParam: o `?id=` usado por detail/delete
// ---
#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdParam(pub i32);

pub(crate) fn parse_id(raw: Option<&str>) -> Result<i32, AppError> {
    raw.and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Valid id is required".to_string()))
}

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<IdQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Valid id is required".to_string()))?;

        parse_id(query.id.as_deref()).map(IdParam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!(parse_id(Some("8")).unwrap(), 8);
        assert_eq!(parse_id(Some(" 12 ")).unwrap(), 12);
    }

    #[test]
    fn rejects_missing_zero_negative_and_garbage() {
        for raw in [None, Some("0"), Some("-3"), Some("abc"), Some("")] {
            assert!(matches!(parse_id(raw), Err(AppError::BadRequest(_))), "{raw:?}");
        }
    }
}
