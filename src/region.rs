//! eBird region codes and region selection.
//!
//! Region codes are hierarchical: a country (`AU`), a first-level subnational
//! region (`AU-VIC`) or a second-level subnational region (`AU-VIC-MEL`).

use crate::api::RegionClient;
use crate::error::{LifersError, Result};
use crate::reference::ReferenceData;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

fn region_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{2}(?:-[A-Z0-9]{1,4}(?:-[A-Z0-9]{1,6})?)?$")
            .expect("region code pattern is valid")
    })
}

/// Depth of a region code in the eBird hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionLevel {
    Country,
    Subnational1,
    Subnational2,
}

/// Subregion levels accepted by the region listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubregionLevel {
    One,
    Two,
}

impl SubregionLevel {
    pub fn from_number(level: u8) -> Result<Self> {
        match level {
            1 => Ok(SubregionLevel::One),
            2 => Ok(SubregionLevel::Two),
            other => Err(LifersError::configuration(format!(
                "Subregion level must be 1 or 2, got {}",
                other
            ))),
        }
    }

    pub fn as_number(&self) -> u8 {
        match self {
            SubregionLevel::One => 1,
            SubregionLevel::Two => 2,
        }
    }
}

impl fmt::Display for SubregionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// A validated eBird region code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionCode(String);

impl RegionCode {
    /// Parse and normalise a region code
    pub fn parse(code: &str) -> Result<Self> {
        let normalised = code.trim().to_uppercase();
        if !region_code_pattern().is_match(&normalised) {
            return Err(LifersError::InvalidRegionCode {
                code: code.to_string(),
            });
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn level(&self) -> RegionLevel {
        match self.0.matches('-').count() {
            0 => RegionLevel::Country,
            1 => RegionLevel::Subnational1,
            _ => RegionLevel::Subnational2,
        }
    }

    /// The country this region belongs to
    pub fn country(&self) -> &str {
        &self.0[..2]
    }

    /// The enclosing region, if any
    pub fn parent(&self) -> Option<RegionCode> {
        self.0
            .rsplit_once('-')
            .map(|(parent, _)| RegionCode(parent.to_string()))
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RegionCode {
    type Err = LifersError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A region chosen by name: a country, optionally narrowed twice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionSelection {
    pub country: String,
    pub subregion: Option<String>,
    pub sub_subregion: Option<String>,
}

impl RegionSelection {
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }

    pub fn with_subregion(mut self, name: impl Into<String>) -> Self {
        self.subregion = Some(name.into());
        self
    }

    pub fn with_sub_subregion(mut self, name: impl Into<String>) -> Self {
        self.sub_subregion = Some(name.into());
        self
    }
}

/// Resolve a named selection to the most specific region code
///
/// The country is looked up in the bundled country table; each further level
/// is looked up through the eBird region listing of its parent.
pub async fn resolve_region(
    selection: &RegionSelection,
    reference: &ReferenceData,
    client: &RegionClient,
) -> Result<RegionCode> {
    let countries = reference.country_lookup()?;
    let iso_code = countries
        .get(selection.country.trim())
        .ok_or_else(|| LifersError::UnknownRegion {
            name: selection.country.clone(),
            parent: "country list".to_string(),
        })?;

    let mut region = RegionCode::parse(iso_code)?;

    let Some(subregion) = selection.subregion.as_deref() else {
        if selection.sub_subregion.is_some() {
            return Err(LifersError::configuration(
                "A sub-region needs a region to be selected first",
            ));
        }
        return Ok(region);
    };

    region = lookup_child(client, &region, SubregionLevel::One, subregion).await?;

    if let Some(sub_subregion) = selection.sub_subregion.as_deref() {
        region = lookup_child(client, &region, SubregionLevel::Two, sub_subregion).await?;
    }

    debug!("Resolved {:?} to region {}", selection, region);
    Ok(region)
}

async fn lookup_child(
    client: &RegionClient,
    parent: &RegionCode,
    level: SubregionLevel,
    name: &str,
) -> Result<RegionCode> {
    let children = client.list_subregions(parent, level).await?;
    let code = children
        .get(name.trim())
        .ok_or_else(|| LifersError::UnknownRegion {
            name: name.to_string(),
            parent: parent.to_string(),
        })?;
    RegionCode::parse(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(RegionCode::parse("AU").unwrap().level(), RegionLevel::Country);
        assert_eq!(
            RegionCode::parse("AU-VIC").unwrap().level(),
            RegionLevel::Subnational1
        );
        assert_eq!(
            RegionCode::parse("AU-VIC-MEL").unwrap().level(),
            RegionLevel::Subnational2
        );
        assert_eq!(
            RegionCode::parse("US-NY-109").unwrap().level(),
            RegionLevel::Subnational2
        );
    }

    #[test]
    fn test_parse_normalises_case_and_whitespace() {
        let code = RegionCode::parse(" au-vic-mel ").unwrap();
        assert_eq!(code.as_str(), "AU-VIC-MEL");
        assert_eq!(code.country(), "AU");
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        for bad in ["", "A", "AUS", "AU-", "AU--VIC", "AU-VIC-MEL-X", "AU VIC", "12"] {
            assert!(
                matches!(
                    RegionCode::parse(bad),
                    Err(LifersError::InvalidRegionCode { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parent_chain() {
        let code = RegionCode::parse("AU-VIC-MEL").unwrap();
        let parent = code.parent().unwrap();
        assert_eq!(parent.as_str(), "AU-VIC");
        assert_eq!(parent.parent().unwrap().as_str(), "AU");
        assert!(parent.parent().unwrap().parent().is_none());
    }

    #[test]
    fn test_subregion_level_numbers() {
        assert_eq!(SubregionLevel::from_number(1).unwrap(), SubregionLevel::One);
        assert_eq!(SubregionLevel::Two.to_string(), "2");
        assert!(SubregionLevel::from_number(3).is_err());
    }
}
