use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::types::dto::channel::{ChannelReply, ErrorPayload, SuccessPayload};

pub struct ResponseError(Response);

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        self.0
    }
}

impl<E> From<E> for ResponseError
where
    E: Into<color_eyre::eyre::Error>,
{
    fn from(value: E) -> Self {
        Self(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Into::<color_eyre::eyre::Error>::into(value).to_string(),
            )
                .into_response(),
        )
    }
}

pub type Result<T, E = ResponseError> = axum::response::Result<T, E>;

impl IntoResponse for ChannelReply {
    fn into_response(self) -> Response {
        match self {
            ChannelReply::Success(result) => Json(SuccessPayload { result }).into_response(),
            ChannelReply::Error(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorPayload {
                    code: err.code().to_owned(),
                    message: err.to_string(),
                    details: None,
                }),
            )
                .into_response(),
            ChannelReply::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                Json(ErrorPayload {
                    code: String::from("NOT_IMPLEMENTED"),
                    message: String::from("method not implemented"),
                    details: None,
                }),
            )
                .into_response(),
        }
    }
}
