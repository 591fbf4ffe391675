//! Typed projections of the backend's JSON documents and of the forms the
//! site posts back to itself.

pub mod auth;
pub mod dish;
pub mod reservation;

use serde::{Deserialize, Serialize};

/// List endpoints wrap their payload as `{ "data": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Write endpoints answer with either the bare document or an enveloped one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeEnveloped<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            MaybeEnveloped::Enveloped { data } => data,
            MaybeEnveloped::Bare(value) => value,
        }
    }
}
