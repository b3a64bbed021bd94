//! Testing utilities for photopick
//!
//! Fixture helpers shared by unit tests: deterministic assets (newest
//! first, like the default library sort) and a mock library pre-seeded
//! with one album.
//!
//! Only available when compiled with `cfg(test)`.

use chrono::{DateTime, TimeZone, Utc};

use crate::library::mock::MockLibrary;
use crate::library::types::{Asset, AssetId};

/// Fixed base timestamp so fixtures are reproducible
#[must_use]
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Image asset with a timestamp offset (larger `age` = older)
#[must_use]
pub fn aged_asset(id: &str, age: i64) -> Asset {
    Asset::image(AssetId::new(id), base_time() - chrono::Duration::seconds(age))
}

/// Assets in newest-first order matching their slice order
#[must_use]
pub fn assets(ids: &[&str]) -> Vec<Asset> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| aged_asset(id, i as i64))
        .collect()
}

/// Library with one "Camera Roll" album holding the given assets
#[must_use]
pub fn seeded_library(ids: &[&str]) -> MockLibrary {
    let library = MockLibrary::new();
    library.add_album("Camera Roll", assets(ids));
    library
}
