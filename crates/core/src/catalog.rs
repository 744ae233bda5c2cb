//! Decoding of amenity catalogs handed over by the catalog provider.

use tracing::warn;

use crate::domain::amenity::CandidateAmenity;
use crate::errors::CatalogError;

/// Decode a JSON array of amenities and validate every entry.
pub fn parse_catalog(raw: &str) -> Result<Vec<CandidateAmenity>, CatalogError> {
    let amenities: Vec<CandidateAmenity> = serde_json::from_str(raw).map_err(|error| {
        warn!(event_name = "catalog.decode.failed", error = %error, "catalog decoding failed");
        CatalogError::Malformed(error.to_string())
    })?;

    for (index, amenity) in amenities.iter().enumerate() {
        validate_entry(index, amenity)?;
    }

    Ok(amenities)
}

fn validate_entry(index: usize, amenity: &CandidateAmenity) -> Result<(), CatalogError> {
    if amenity.id.trim().is_empty() {
        return Err(CatalogError::InvalidEntry { index, reason: "id must not be empty".to_owned() });
    }
    if amenity.name.trim().is_empty() {
        return Err(CatalogError::InvalidEntry {
            index,
            reason: format!("amenity `{}` has an empty name", amenity.id),
        });
    }
    Ok(())
}
