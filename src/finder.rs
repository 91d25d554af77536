//! Request/response handler for a needs search
//!
//! One call takes a region, an observation window and the raw bytes of a
//! life list, and produces a [`NeedsReport`] holding every table the front
//! end displays or writes out.

use crate::api::{RecentObservationSource, SpeciesObservationSource};
use crate::config::{LifersConfig, validate_days_back};
use crate::error::Result;
use crate::formatter::{
    format_location_details, format_needs_table, format_region_map, map_center,
    observations_frame, region_map_frame,
};
use crate::lifelist::{Lifelist, parse_lifelist};
use crate::models::{LocationDetail, MapCenter, Observation, RegionLocation, ReportWarning};
use crate::needs::{NeedsCalculator, exclude_seen_by_name, find_needs, unique_species_codes};
use crate::reference::ReferenceData;
use crate::region::RegionCode;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Inputs of one needs search
#[derive(Debug, Clone)]
pub struct NeedsRequest {
    pub region: RegionCode,
    pub days_back: u32,
    /// Raw life list CSV
    pub lifelist: Vec<u8>,
}

impl NeedsRequest {
    pub fn new(region: RegionCode, days_back: u32, lifelist: impl Into<Vec<u8>>) -> Self {
        Self {
            region,
            days_back,
            lifelist: lifelist.into(),
        }
    }
}

/// Everything produced by one needs search
#[derive(Debug, Clone, Default)]
pub struct NeedsReport {
    pub lifelist: Lifelist,
    /// Recent region observations of species missing from the life list
    pub needs: Vec<Observation>,
    /// Every recent observation of each needed species in the region
    pub region_observations: Vec<Observation>,
    pub region_map: Vec<RegionLocation>,
    pub location_details: Vec<LocationDetail>,
    pub map_center: Option<MapCenter>,
    pub warnings: Vec<ReportWarning>,
}

impl NeedsReport {
    pub fn needed_species_count(&self) -> usize {
        unique_species_codes(&self.needs).len()
    }

    pub fn needs_frame(&self, species_info_base_url: &str) -> PolarsResult<DataFrame> {
        format_needs_table(&self.needs, species_info_base_url)
    }

    pub fn region_map_frame(&self) -> PolarsResult<DataFrame> {
        region_map_frame(&self.region_map)
    }

    pub fn region_observations_frame(&self) -> PolarsResult<DataFrame> {
        observations_frame(&self.region_observations)
    }
}

/// Runs needs searches against an observation source
pub struct NeedsFinder<'a, S> {
    source: &'a S,
    reference: &'a ReferenceData,
    config: &'a LifersConfig,
    show_progress: bool,
}

impl<'a, S> NeedsFinder<'a, S>
where
    S: RecentObservationSource + SpeciesObservationSource,
{
    pub fn new(source: &'a S, reference: &'a ReferenceData, config: &'a LifersConfig) -> Self {
        Self {
            source,
            reference,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run one needs search
    ///
    /// An empty life list or a region with no unseen species is not an
    /// error: the report comes back with a warning and empty tables.
    pub async fn find_needs(&self, request: &NeedsRequest) -> Result<NeedsReport> {
        validate_days_back(request.days_back)?;

        // Parse before any remote call
        let lifelist = parse_lifelist(&request.lifelist, self.reference)?;
        let mut report = NeedsReport {
            warnings: lifelist.warnings.clone(),
            ..Default::default()
        };

        if lifelist.is_empty() {
            warn!("Life list has no species rows");
            report.warnings.push(ReportWarning::EmptyLifelist);
            report.lifelist = lifelist;
            return Ok(report);
        }

        // Every species seen recently in the region
        let recent = self
            .source
            .region_observations(&request.region, request.days_back)
            .await?;
        info!(
            "{} recent observations in {}",
            recent.len(),
            request.region
        );

        // Match on species code, then on scientific name for rows the
        // taxonomy could not map
        let by_code = find_needs(&lifelist.species_codes(), recent);
        let matched_by_code = by_code.len();
        let needs = exclude_seen_by_name(by_code, &lifelist.unmatched_scientific_names());
        if needs.len() < matched_by_code {
            debug!(
                "{} observations dropped by scientific name match",
                matched_by_code - needs.len()
            );
        }
        report.lifelist = lifelist;
        if needs.is_empty() {
            info!("No unseen species in {}", request.region);
            report.warnings.push(ReportWarning::NoRecentNeeds {
                days_back: request.days_back,
            });
            return Ok(report);
        }

        let species = unique_species_codes(&needs);
        info!("{} needed species in {}", species.len(), request.region);

        // All recent locations of each needed species
        let region_observations = NeedsCalculator::new(self.source)
            .with_max_concurrent(self.config.api.max_concurrent_requests)
            .with_progress(self.show_progress)
            .fetch_region_needs(&request.region, &species, request.days_back)
            .await?;

        // Shape for display
        report.region_map = format_region_map(&region_observations);
        report.location_details =
            format_location_details(&region_observations, &self.config.links);
        report.map_center = map_center(&report.region_map);
        report.needs = needs;
        report.region_observations = region_observations;

        Ok(report)
    }
}
