//! Map markers stored by the backend.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{self, Backend};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
}

pub async fn list_markers<B: Backend>(client: &B) -> Result<Vec<Marker>> {
    let value = client.get_json(backend::MARKERS).await?;
    serde_json::from_value(value).context("failed to parse markers")
}

pub async fn add_marker<B: Backend>(client: &B, marker: Marker) -> Result<()> {
    let lat = marker.lat.to_string();
    let lng = marker.lng.to_string();
    client
        .post_form(backend::MARKERS, &[("lat", lat.as_str()), ("lng", lng.as_str())])
        .await
        .context("failed to store marker")
}
