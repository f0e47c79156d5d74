use axum::{
    body::{Body, HttpBody},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
pub struct ErrorMessage {
    pub error: String,
}

pub type ErrorResponse = (StatusCode, Json<ErrorMessage>);

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request body must contain an encoded image")]
    MissingBody,
    #[error("Upload of at least {size} bytes exceeds the limit of {limit} bytes")]
    UploadTooLarge { size: usize, limit: usize },
    #[error("Image has {pixels} pixels, which exceeds the limit of {limit}")]
    ImageTooLarge { pixels: u64, limit: usize },
    #[error("Cannot read request body: {0}")]
    ReadBody(String),

    #[error("Cannot decode image: {0}")]
    Decode(mstquant::Error),
    #[error("{0}")]
    Quantize(mstquant::Error),
    #[error("Cannot encode quantized image: {0}")]
    Encode(mstquant::Error),
    #[error("Cannot build response header")]
    InvalidHeader,

    #[error("Cannot send request to quantize service because it is offline (did the thread panic?)")]
    QuantizeServiceOffline,
    #[error("Internal quantization job failure (did not receive quantized image)")]
    QuantizeJobExited,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingBody | Self::Decode(_) | Self::ReadBody(_) => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge { .. }
            | Self::ImageTooLarge { .. }
            | Self::Quantize(mstquant::Error::TooManyColors { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Quantize(
                mstquant::Error::InvalidClusterCount { .. }
                | mstquant::Error::InvalidMaskSize
                | mstquant::Error::InvalidSigma,
            ) => StatusCode::BAD_REQUEST,
            Self::Quantize(_)
            | Self::Encode(_)
            | Self::InvalidHeader
            | Self::QuantizeServiceOffline
            | Self::QuantizeJobExited => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        (
            self.status_code(),
            Json(ErrorMessage {
                error: self.to_string(),
            }),
        )
    }
}

/// Buffers a request body, giving up as soon as more than `limit` bytes have arrived.
pub async fn read_body(mut body: Body, limit: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = vec![];
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|e| Error::ReadBody(e.to_string()))?;
        let size = buffer.len() + chunk.len();
        if size > limit {
            return Err(Error::UploadTooLarge { size, limit });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_mistakes_are_bad_requests() {
        let error = Error::Quantize(mstquant::Error::InvalidClusterCount {
            requested: 9,
            distinct: 2,
        });
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::MissingBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::UploadTooLarge { size: 2, limit: 1 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn internal_failures_are_server_errors() {
        let (status, Json(message)) = Error::QuantizeJobExited.to_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.error.contains("quantization job"));
    }

    #[test]
    fn oversized_uploads_are_payload_too_large() {
        let error = Error::Quantize(mstquant::Error::TooManyColors {
            distinct: 100,
            limit: 10,
        });
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            Error::ImageTooLarge {
                pixels: 400_000_000,
                limit: 16
            }
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn body_is_cut_off_past_the_limit() {
        let result = read_body(Body::from(vec![7u8; 10]), 4).await;
        assert!(matches!(
            result,
            Err(Error::UploadTooLarge { size: 10, limit: 4 })
        ));

        let body = read_body(Body::from(vec![7u8; 10]), 10).await.unwrap();
        assert_eq!(body, vec![7u8; 10]);
    }

    #[tokio::test]
    async fn streamed_chunks_count_towards_the_limit() {
        let (mut sender, body) = Body::channel();
        tokio::spawn(async move {
            for _ in 0..4 {
                if sender.send_data(vec![1u8; 3].into()).await.is_err() {
                    break;
                }
            }
        });
        let result = read_body(body, 8).await;
        assert!(matches!(
            result,
            Err(Error::UploadTooLarge { size: 9, limit: 8 })
        ));
    }
}
