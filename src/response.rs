//! Success envelope: `{"data": ...}`, and for collections `{"data": [...], "meta": {"count": n}}`.
//! Errors use the `{"error": ...}` body from `AppError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub enum Envelope<T> {
    /// 201 with the new resource.
    Created(T),
    /// 200 with a single item.
    Item(T),
    /// 200 with a collection and its size.
    Items(Vec<T>),
}

#[derive(Serialize)]
struct Data<D> {
    data: D,
}

#[derive(Serialize)]
struct Counted<T> {
    data: Vec<T>,
    meta: Count,
}

#[derive(Serialize)]
struct Count {
    count: usize,
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match self {
            Envelope::Created(data) => (StatusCode::CREATED, Json(Data { data })).into_response(),
            Envelope::Item(data) => Json(Data { data }).into_response(),
            Envelope::Items(data) => {
                let meta = Count { count: data.len() };
                Json(Counted { data, meta }).into_response()
            }
        }
    }
}
