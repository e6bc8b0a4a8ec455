// Unit tests for Lekk Resto

use lekk_resto::core::{
    apply_facets, calculate_bounding_box, haversine_distance, is_within_bounding_box,
    is_within_radius, matches_facets, matches_text, within_radius,
};
use lekk_resto::models::{
    Cuisine, District, Facet, FilterCriteria, GeoPoint, PriceTier, RadiusPreset, RestaurantRecord,
};

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

fn create_test_record(id: &str, name: &str, address: &str, lat: f64, lon: f64) -> RestaurantRecord {
    RestaurantRecord {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        coordinates: Some(point(lat, lon)),
        rating: 4.5,
        delivery_available: true,
        open_now: true,
        district: Some(District::Plateau),
        cuisine: Some(Cuisine::Traditionnelle),
        price_tier: Some(PriceTier::Medium),
        daily_specials: vec![],
        phone: None,
        image_url: None,
    }
}

fn sample_records() -> Vec<RestaurantRecord> {
    let mut records = vec![
        create_test_record("1", "Chez Fatou", "Plateau, Dakar", 14.6928, -17.4467),
        create_test_record("2", "Restaurant Teranga", "Almadies, Dakar", 14.7392, -17.5197),
        create_test_record("3", "Le Baobab Gourmand", "Medina, Dakar", 14.6892, -17.4568),
        create_test_record("4", "Saveurs du Sahel", "Point E, Dakar", 14.7155, -17.4631),
        create_test_record("5", "Chez Aminata", "Parcelles Assainies, Dakar", 14.7667, -17.4167),
    ];

    records[1].district = Some(District::Almadies);
    records[1].cuisine = Some(Cuisine::Moderne);
    records[1].price_tier = Some(PriceTier::High);
    records[2].district = Some(District::Medina);
    records[2].delivery_available = false;
    records[2].price_tier = Some(PriceTier::Low);
    records[3].district = Some(District::PointE);
    records[3].cuisine = Some(Cuisine::Fusion);
    records[3].open_now = false;
    records[4].district = Some(District::Parcelles);
    records[4].cuisine = Some(Cuisine::FastFood);
    records[4].price_tier = Some(PriceTier::Low);

    records
}

fn ids(records: &[RestaurantRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_haversine_distance_zero() {
    let dakar = GeoPoint::DAKAR;
    assert_eq!(haversine_distance(dakar, dakar), 0.0);
}

#[test]
fn test_haversine_distance_symmetric() {
    let pairs = [
        (point(14.6928, -17.4467), point(14.7392, -17.5197)),
        (point(-33.8688, 151.2093), point(51.5074, -0.1278)),
        (point(0.0, 179.9), point(0.0, -179.9)),
    ];

    for (a, b) in pairs {
        let ab = haversine_distance(a, b);
        let ba = haversine_distance(b, a);
        assert!((ab - ba).abs() < 1e-6, "distance should not depend on order");
        assert!(ab >= 0.0);
    }
}

#[test]
fn test_haversine_distance_dakar_plateau_to_almadies() {
    // Plateau to Almadies is roughly 9.4 km
    let distance = haversine_distance(GeoPoint::DAKAR, point(14.7392, -17.5197));
    assert!(distance > 9_300.0 && distance < 9_500.0, "got {}", distance);
}

#[test]
fn test_haversine_distance_antipodes() {
    // Half the circumference, pi * R
    let distance = haversine_distance(point(0.0, 0.0), point(0.0, 180.0));
    assert!((distance - std::f64::consts::PI * 6_371_000.0).abs() < 1.0);
}

#[test]
fn test_bounding_box_contains_circle() {
    let center = GeoPoint::DAKAR;
    let bbox = calculate_bounding_box(center, 5_000.0);

    assert!(bbox.min_lat < center.latitude());
    assert!(bbox.max_lat > center.latitude());
    assert!(bbox.min_lon < center.longitude());
    assert!(bbox.max_lon > center.longitude());

    // Points on the circle in each direction stay inside the box
    for bearing in 0..36 {
        let theta = f64::from(bearing * 10).to_radians();
        let dlat = (5_000.0 / 6_371_000.0) * theta.cos();
        let dlon = (5_000.0 / 6_371_000.0) * theta.sin() / center.latitude().to_radians().cos();
        let p = point(
            center.latitude() + dlat.to_degrees() * 0.999,
            center.longitude() + dlon.to_degrees() * 0.999,
        );
        assert!(is_within_bounding_box(p, &bbox), "bearing {}", bearing * 10);
    }
}

#[test]
fn test_radius_monotonic() {
    let records = sample_records();
    let mut previous = 0;

    for preset in RadiusPreset::ALL {
        let found = within_radius(GeoPoint::DAKAR, f64::from(preset.meters()), &records);
        assert!(
            found.len() >= previous,
            "{} returned fewer restaurants than a smaller radius",
            preset
        );
        previous = found.len();
    }
}

#[test]
fn test_radius_result_is_subsequence() {
    let records = sample_records();
    let found: Vec<RestaurantRecord> = within_radius(GeoPoint::DAKAR, 3_500.0, records);

    // Fatou, Baobab and Saveurs, in input order
    assert_eq!(ids(&found), vec!["1", "3", "4"]);
}

#[test]
fn test_radius_matches_predicate() {
    let records = sample_records();

    for preset in RadiusPreset::ALL {
        let radius = f64::from(preset.meters());
        let found: Vec<&RestaurantRecord> = within_radius(GeoPoint::DAKAR, radius, &records);

        for record in &records {
            let expected = is_within_radius(GeoPoint::DAKAR, radius, record);
            let included = found.iter().any(|r| r.id == record.id);
            assert_eq!(expected, included, "{} at {}", record.name, preset);
        }
    }
}

#[test]
fn test_radius_skips_records_without_coordinates() {
    let mut records = sample_records();
    records[0].coordinates = None;

    let found = within_radius(GeoPoint::DAKAR, 5_000.0, &records);
    assert!(found.iter().all(|r| r.id != "1"));
}

#[test]
fn test_text_match_case_insensitive() {
    let record = create_test_record("1", "Chez Fatou", "Plateau, Dakar", 14.6928, -17.4467);

    assert!(matches_text(&record, ""));
    assert!(matches_text(&record, "FATOU"));
    assert!(matches_text(&record, "plateau"));
    assert!(!matches_text(&record, "teranga"));
}

#[test]
fn test_default_criteria_admit_everything() {
    let records = sample_records();
    let criteria = FilterCriteria::default();

    assert!(records.iter().all(|r| matches_facets(r, &criteria)));
    assert_eq!(apply_facets(&criteria, &records).len(), records.len());
}

#[test]
fn test_facets_compose_with_and() {
    let records = sample_records();

    let delivery = FilterCriteria {
        delivery_only: true,
        ..FilterCriteria::default()
    };
    let open = FilterCriteria {
        open_now_only: true,
        ..FilterCriteria::default()
    };
    let both = FilterCriteria {
        delivery_only: true,
        open_now_only: true,
        ..FilterCriteria::default()
    };

    let combined: Vec<&str> = apply_facets(&both, &records)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    let intersection: Vec<&str> = records
        .iter()
        .filter(|r| matches_facets(r, &delivery) && matches_facets(r, &open))
        .map(|r| r.id.as_str())
        .collect();

    assert_eq!(combined, intersection);
    assert_eq!(combined, vec!["1", "2", "5"]);
}

#[test]
fn test_facets_idempotent() {
    let records = sample_records();
    let criteria = FilterCriteria {
        price_tier: Facet::Only(PriceTier::Low),
        ..FilterCriteria::default()
    };

    let once: Vec<RestaurantRecord> = apply_facets(&criteria, records);
    let twice: Vec<RestaurantRecord> = apply_facets(&criteria, once.clone());

    assert_eq!(once, twice);
    assert_eq!(ids(&once), vec!["3", "5"]);
}

#[test]
fn test_facet_without_value_excluded_by_concrete_selection() {
    let mut records = sample_records();
    records[0].cuisine = None;

    let criteria = FilterCriteria {
        cuisine: Facet::Only(Cuisine::Traditionnelle),
        ..FilterCriteria::default()
    };

    let found: Vec<RestaurantRecord> = apply_facets(&criteria, records);
    assert_eq!(ids(&found), vec!["3"]);
}

#[test]
fn test_facet_parse_sentinels() {
    assert_eq!(Facet::<District>::parse("Tous").unwrap(), Facet::Any);
    assert_eq!(Facet::<Cuisine>::parse("toutes").unwrap(), Facet::Any);
    assert_eq!(Facet::<PriceTier>::parse("").unwrap(), Facet::Any);
    assert_eq!(
        Facet::<District>::parse("point e").unwrap(),
        Facet::Only(District::PointE)
    );
    assert!(Facet::<District>::parse("Yoff").is_err());
}

#[test]
fn test_radius_presets() {
    let meters: Vec<u32> = RadiusPreset::ALL.iter().map(|p| p.meters()).collect();
    assert_eq!(meters, vec![500, 1000, 2000, 3000, 5000]);
    assert_eq!(RadiusPreset::default(), RadiusPreset::M500);
    assert!(RadiusPreset::try_from(750).is_err());
}
