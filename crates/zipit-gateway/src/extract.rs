use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with every rejection collapsed into [`AppError::InvalidJson`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
