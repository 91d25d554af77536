//! Needs calculation
//!
//! A "need" is a recent observation of a species absent from the life list.
//! Needs are found by set difference, then every needed species is looked up
//! individually so that all of its recent locations in the region are known.

use crate::api::SpeciesObservationSource;
use crate::constants::default_concurrent_requests;
use crate::error::{LifersError, Result};
use crate::lifelist::scientific_name_key;
use crate::models::Observation;
use crate::region::RegionCode;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use tracing::{debug, info};

/// Observations whose species is not on the life list, in input order
///
/// Duplicate species are kept; each observation is a separate sighting.
pub fn find_needs(
    lifelist_codes: &HashSet<String>,
    observations: Vec<Observation>,
) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|obs| !lifelist_codes.contains(&obs.species_code))
        .collect()
}

/// Drop needs whose scientific name matches a life list row without a code
///
/// Covers species the taxonomy could not map to a code, which would
/// otherwise show up as needs although they are on the life list.
pub fn exclude_seen_by_name(
    needs: Vec<Observation>,
    seen_scientific_names: &HashSet<String>,
) -> Vec<Observation> {
    if seen_scientific_names.is_empty() {
        return needs;
    }
    needs
        .into_iter()
        .filter(|obs| !seen_scientific_names.contains(&scientific_name_key(&obs.sci_name)))
        .collect()
}

/// Distinct species codes in first-seen order
pub fn unique_species_codes(observations: &[Observation]) -> Vec<String> {
    let mut seen = HashSet::new();
    observations
        .iter()
        .filter(|obs| seen.insert(obs.species_code.as_str()))
        .map(|obs| obs.species_code.clone())
        .collect()
}

/// Bounded concurrent per-species fetches
pub struct NeedsCalculator<'a, S: SpeciesObservationSource> {
    source: &'a S,
    max_concurrent: usize,
    show_progress: bool,
}

impl<'a, S: SpeciesObservationSource> NeedsCalculator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_concurrent: default_concurrent_requests(),
            show_progress: false,
        }
    }

    /// Set the bound on concurrent requests (at least 1)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetch every recent observation of the given species in a region
    ///
    /// One request per species code, at most `max_concurrent` in flight. The
    /// first failure ends the batch: requests still in flight are dropped and
    /// the error names the species whose fetch failed. The merged rows are in
    /// completion order.
    pub async fn fetch_region_needs(
        &self,
        region: &RegionCode,
        species_codes: &[String],
        days_back: u32,
    ) -> Result<Vec<Observation>> {
        if species_codes.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.max_concurrent.min(species_codes.len());
        info!(
            "Fetching recent observations for {} species in {} ({} concurrent)",
            species_codes.len(),
            region,
            limit
        );

        let pb = self.progress_bar(species_codes.len());
        let source = self.source;

        let batches = stream::iter(species_codes)
            .map(|species_code| {
                let pb = pb.clone();
                async move {
                    let observations = source
                        .species_observations(region, species_code, days_back)
                        .await
                        .map_err(|e| LifersError::species_fetch_failed(species_code, e))?;
                    pb.inc(1);
                    debug!("{}: {} observations", species_code, observations.len());
                    Ok::<_, LifersError>(observations)
                }
            })
            .buffer_unordered(limit)
            .try_collect::<Vec<Vec<Observation>>>()
            .await
            .inspect_err(|_| pb.abandon())?;

        pb.finish_and_clear();

        let merged: Vec<Observation> = batches.into_iter().flatten().collect();
        info!("Collected {} needed-species observations", merged.len());
        Ok(merged)
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} species ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Fetching species observations");
        pb
    }
}
