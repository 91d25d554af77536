//! Display tables and map aggregates for needed species

use crate::config::LinkConfig;
use crate::constants::labels::{
    COMMON_NAME, COUNT, DATE, LAT, LNG, LOC_NAME, NUM_SPECIES, SCIENTIFIC_NAME,
    SPECIES_INFORMATION, TOOLTIP_SPECIES,
};
use crate::models::{LocationDetail, LocationSighting, MapCenter, Observation, RegionLocation};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Needs table: common name, scientific name and species information link
pub fn format_needs_table(
    needs: &[Observation],
    species_info_base_url: &str,
) -> PolarsResult<DataFrame> {
    let common: Vec<&str> = needs.iter().map(|o| o.com_name.as_str()).collect();
    let scientific: Vec<&str> = needs.iter().map(|o| o.sci_name.as_str()).collect();
    let links: Vec<String> = needs
        .iter()
        .map(|o| format!("{}{}", species_info_base_url, o.species_code))
        .collect();

    DataFrame::new(vec![
        Column::new(COMMON_NAME.into(), common),
        Column::new(SCIENTIFIC_NAME.into(), scientific),
        Column::new(SPECIES_INFORMATION.into(), links),
    ])
}

/// One map point per exact (location name, latitude, longitude)
///
/// Each point lists the sorted unique common names seen there. Points are
/// ordered by location name, then latitude, then longitude.
pub fn format_region_map(observations: &[Observation]) -> Vec<RegionLocation> {
    let mut groups: HashMap<(&str, u64, u64), (f64, f64, BTreeSet<&str>)> = HashMap::new();
    for obs in observations {
        // Adding 0.0 folds -0.0 into 0.0 so both land on the same point
        let key = (
            obs.loc_name.as_str(),
            (obs.lat + 0.0).to_bits(),
            (obs.lng + 0.0).to_bits(),
        );
        groups
            .entry(key)
            .or_insert_with(|| (obs.lat, obs.lng, BTreeSet::new()))
            .2
            .insert(obs.com_name.as_str());
    }

    let mut locations: Vec<RegionLocation> = groups
        .into_iter()
        .map(|((loc_name, _, _), (lat, lng, names))| {
            let species: Vec<String> = names.into_iter().map(str::to_string).collect();
            RegionLocation {
                loc_name: loc_name.to_string(),
                lng,
                lat,
                tooltip_species: numbered_list(&species),
                num_species: species.len(),
                species,
            }
        })
        .collect();

    locations.sort_by(|a, b| {
        a.loc_name
            .cmp(&b.loc_name)
            .then(a.lat.total_cmp(&b.lat))
            .then(a.lng.total_cmp(&b.lng))
    });
    locations
}

fn numbered_list(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map table: `locName, lng, lat, tooltip_species, num_species`
pub fn region_map_frame(locations: &[RegionLocation]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = locations.iter().map(|l| l.loc_name.as_str()).collect();
    let lngs: Vec<f64> = locations.iter().map(|l| l.lng).collect();
    let lats: Vec<f64> = locations.iter().map(|l| l.lat).collect();
    let tooltips: Vec<&str> = locations.iter().map(|l| l.tooltip_species.as_str()).collect();
    let counts: Vec<u32> = locations.iter().map(|l| l.num_species as u32).collect();

    DataFrame::new(vec![
        Column::new(LOC_NAME.into(), names),
        Column::new(LNG.into(), lngs),
        Column::new(LAT.into(), lats),
        Column::new(TOOLTIP_SPECIES.into(), tooltips),
        Column::new(NUM_SPECIES.into(), counts),
    ])
}

/// Raw observation table, using the eBird field names
pub fn observations_frame(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let codes: Vec<&str> = observations.iter().map(|o| o.species_code.as_str()).collect();
    let common: Vec<&str> = observations.iter().map(|o| o.com_name.as_str()).collect();
    let scientific: Vec<&str> = observations.iter().map(|o| o.sci_name.as_str()).collect();
    let loc_ids: Vec<&str> = observations.iter().map(|o| o.loc_id.as_str()).collect();
    let loc_names: Vec<&str> = observations.iter().map(|o| o.loc_name.as_str()).collect();
    let dates: Vec<&str> = observations.iter().map(|o| o.obs_dt.as_str()).collect();
    let counts: Vec<Option<u32>> = observations.iter().map(|o| o.how_many).collect();
    let lats: Vec<f64> = observations.iter().map(|o| o.lat).collect();
    let lngs: Vec<f64> = observations.iter().map(|o| o.lng).collect();
    let private: Vec<bool> = observations.iter().map(|o| o.location_private).collect();

    DataFrame::new(vec![
        Column::new("speciesCode".into(), codes),
        Column::new("comName".into(), common),
        Column::new("sciName".into(), scientific),
        Column::new("locId".into(), loc_ids),
        Column::new("locName".into(), loc_names),
        Column::new("obsDt".into(), dates),
        Column::new("howMany".into(), counts),
        Column::new("lat".into(), lats),
        Column::new("lng".into(), lngs),
        Column::new("locationPrivate".into(), private),
    ])
}

/// Sightings grouped by location name, ordered by name
///
/// Links come from the first sighting at each location. Private locations get
/// no hotspot link.
pub fn format_location_details(
    observations: &[Observation],
    links: &LinkConfig,
) -> Vec<LocationDetail> {
    let mut by_location: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        by_location.entry(obs.loc_name.as_str()).or_default().push(obs);
    }

    by_location
        .into_iter()
        .filter_map(|(loc_name, sightings)| {
            let first = *sightings.first()?;
            let hotspot_url = (!first.location_private)
                .then(|| format!("{}{}", links.hotspot_base_url, first.loc_id));
            Some(LocationDetail {
                loc_name: loc_name.to_string(),
                loc_id: first.loc_id.clone(),
                hotspot_url,
                directions_url: format!(
                    "{}{},{}",
                    links.directions_base_url, first.lat, first.lng
                ),
                sightings: sightings
                    .into_iter()
                    .map(|o| LocationSighting {
                        common_name: o.com_name.clone(),
                        scientific_name: o.sci_name.clone(),
                        date: o.obs_dt.clone(),
                        count: o.how_many,
                    })
                    .collect(),
            })
        })
        .collect()
}

/// Sightings table for one location: `Common Name, Scientific Name, Date, Count`
pub fn location_sightings_frame(detail: &LocationDetail) -> PolarsResult<DataFrame> {
    let sightings = &detail.sightings;
    DataFrame::new(vec![
        Column::new(
            COMMON_NAME.into(),
            sightings.iter().map(|s| s.common_name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            SCIENTIFIC_NAME.into(),
            sightings
                .iter()
                .map(|s| s.scientific_name.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            DATE.into(),
            sightings.iter().map(|s| s.date.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COUNT.into(),
            sightings.iter().map(|s| s.count).collect::<Vec<_>>(),
        ),
    ])
}

/// Mean position of the map points
pub fn map_center(locations: &[RegionLocation]) -> Option<MapCenter> {
    if locations.is_empty() {
        return None;
    }
    let n = locations.len() as f64;
    let lat = locations.iter().map(|l| l.lat).sum::<f64>() / n;
    let lng = locations.iter().map(|l| l.lng).sum::<f64>() / n;
    Some(MapCenter { lat, lng })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(loc_name: &str, lat: f64, lng: f64, com_name: &str) -> Observation {
        Observation {
            species_code: com_name.to_lowercase(),
            com_name: com_name.to_string(),
            sci_name: format!("{} sci", com_name),
            loc_id: format!("L{}", loc_name.len()),
            loc_name: loc_name.to_string(),
            obs_dt: "2023-08-12 09:00".to_string(),
            how_many: Some(2),
            lat,
            lng,
            obs_valid: true,
            obs_reviewed: false,
            location_private: false,
            sub_id: None,
        }
    }

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn test_needs_table_columns_and_links() {
        let needs = vec![
            Observation {
                species_code: "houspa".to_string(),
                com_name: "House Sparrow".to_string(),
                sci_name: "Passer domesticus".to_string(),
                ..sighting("x", 0.0, 0.0, "x")
            },
            Observation {
                species_code: "rocpig".to_string(),
                com_name: "Rock Pigeon".to_string(),
                sci_name: "Columba livia".to_string(),
                ..sighting("x", 0.0, 0.0, "x")
            },
        ];

        let df = format_needs_table(&needs, "https://ebird.org/species/").unwrap();
        assert_eq!(
            column_names(&df),
            vec!["Common Name", "Scientific Name", "Species Information"]
        );

        let links: Vec<Option<&str>> = df
            .column("Species Information")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            links,
            vec![
                Some("https://ebird.org/species/houspa"),
                Some("https://ebird.org/species/rocpig")
            ]
        );
    }

    #[test]
    fn test_needs_table_empty_keeps_columns() {
        let df = format_needs_table(&[], "https://ebird.org/species/").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_region_map_groups_and_numbers_species() {
        let observations = vec![
            sighting("Location1", 42.0, -71.0, "Sparrow"),
            sighting("Location1", 42.0, -71.0, "Pigeon"),
            sighting("Location1", 42.0, -71.0, "Pigeon"),
            sighting("Location2", 43.0, -72.0, "Pigeon"),
        ];

        let locations = format_region_map(&observations);
        assert_eq!(locations.len(), 2);

        assert_eq!(locations[0].loc_name, "Location1");
        assert_eq!(locations[0].lng, -71.0);
        assert_eq!(locations[0].lat, 42.0);
        assert_eq!(locations[0].tooltip_species, "1. Pigeon\n2. Sparrow");
        assert_eq!(locations[0].num_species, 2);

        assert_eq!(locations[1].loc_name, "Location2");
        assert_eq!(locations[1].tooltip_species, "1. Pigeon");
        assert_eq!(locations[1].num_species, 1);

        let df = region_map_frame(&locations).unwrap();
        assert_eq!(
            column_names(&df),
            vec!["locName", "lng", "lat", "tooltip_species", "num_species"]
        );
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_region_map_splits_same_name_at_different_coordinates() {
        let observations = vec![
            sighting("Royal Park", -37.79, 144.95, "Galah"),
            sighting("Royal Park", -37.78, 144.95, "Galah"),
        ];
        let locations = format_region_map(&observations);
        assert_eq!(locations.len(), 2);
        assert!(locations[0].lat < locations[1].lat);
    }

    #[test]
    fn test_region_map_treats_signed_zeros_as_one_point() {
        let observations = vec![
            sighting("Null Island", 0.0, -0.0, "Sparrow"),
            sighting("Null Island", -0.0, 0.0, "Pigeon"),
        ];
        let locations = format_region_map(&observations);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].num_species, 2);
        assert_eq!(locations[0].tooltip_species, "1. Pigeon\n2. Sparrow");
    }

    #[test]
    fn test_location_details_links() {
        let links = LinkConfig::default();
        let mut private = sighting("Backyard", -37.5, 145.0, "Noisy Miner");
        private.location_private = true;
        let observations = vec![
            sighting("Royal Park", -37.7855, 144.9513, "Galah"),
            private,
            sighting("Royal Park", -37.7855, 144.9513, "Australian Magpie"),
        ];

        let details = format_location_details(&observations, &links);
        assert_eq!(details.len(), 2);

        assert_eq!(details[0].loc_name, "Backyard");
        assert!(details[0].hotspot_url.is_none());
        assert_eq!(
            details[0].directions_url,
            "https://maps.google.com/?q=-37.5,145"
        );

        assert_eq!(details[1].loc_name, "Royal Park");
        assert_eq!(
            details[1].hotspot_url.as_deref(),
            Some("https://ebird.org/hotspot/L10")
        );
        assert_eq!(details[1].sightings.len(), 2);

        let df = location_sightings_frame(&details[1]).unwrap();
        assert_eq!(
            column_names(&df),
            vec!["Common Name", "Scientific Name", "Date", "Count"]
        );
    }

    #[test]
    fn test_map_center() {
        assert!(map_center(&[]).is_none());

        let locations = format_region_map(&[
            sighting("A", 10.0, 20.0, "Galah"),
            sighting("B", 20.0, 40.0, "Galah"),
        ]);
        let center = map_center(&locations).unwrap();
        assert_eq!(center.lat, 15.0);
        assert_eq!(center.lng, 30.0);
    }

    #[test]
    fn test_observations_frame_shape() {
        let df = observations_frame(&[sighting("A", 1.0, 2.0, "Galah")]).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 10);
    }
}
