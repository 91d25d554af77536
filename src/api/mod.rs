//! eBird API v2 access
//!
//! Three read-only endpoints are used: the subnational region listing, recent
//! observations in a region, and recent observations of one species in a
//! region. [`RecentObservationSource`] and [`SpeciesObservationSource`] are
//! the seams the needs finder is written against.

use crate::error::Result;
use crate::models::Observation;
use crate::region::RegionCode;
use std::future::Future;

pub mod client;

pub use client::{RegionClient, RegionEntry};

/// Anything that can supply recent observations of every species in a region
pub trait RecentObservationSource: Sync {
    fn region_observations(
        &self,
        region: &RegionCode,
        days_back: u32,
    ) -> impl Future<Output = Result<Vec<Observation>>> + Send;
}

/// Anything that can supply recent observations of a single species
pub trait SpeciesObservationSource: Sync {
    fn species_observations(
        &self,
        region: &RegionCode,
        species_code: &str,
        days_back: u32,
    ) -> impl Future<Output = Result<Vec<Observation>>> + Send;
}
