use super::common::*;

use crate::workflows::enrollment::location::LocationCatalog;
use crate::workflows::enrollment::wizard::WizardStep;

#[tokio::test]
async fn open_populates_regions_once() {
    let (mut wizard, geography, _, _) = build_wizard();
    wizard.open().await;

    assert_eq!(wizard.catalog().regions(), ["Dhaka", "Khulna"]);
    assert_eq!(geography.region_calls(), 1);
}

#[tokio::test]
async fn open_degrades_to_empty_regions_on_lookup_failure() {
    let (mut wizard, _, _, _) = build_wizard_with(
        StubGeography::failing_regions(),
        MemoryMailer::default(),
        Default::default(),
    );
    wizard.open().await;

    assert!(wizard.catalog().regions().is_empty());

    // The wizard stays usable with a degraded selector.
    wizard.next();
    assert_eq!(wizard.current_step(), WizardStep::ProfessionalDetails);
}

#[tokio::test]
async fn selecting_a_region_loads_its_districts() {
    let (mut wizard, geography, _, _) = build_wizard();
    wizard.open().await;
    wizard.select_region("Dhaka").await;

    let names: Vec<&str> = wizard
        .catalog()
        .districts()
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, ["Gazipur", "Narayanganj"]);
    assert_eq!(geography.district_calls(), 1);
    assert!(!wizard.catalog().is_loading_districts());
}

#[tokio::test]
async fn district_lookup_failure_leaves_selector_empty() {
    let (mut wizard, _, _, _) = build_wizard_with(
        StubGeography::failing_districts(),
        MemoryMailer::default(),
        Default::default(),
    );
    wizard.open().await;
    wizard.select_region("Dhaka").await;

    assert_eq!(wizard.draft().location.region, "Dhaka");
    assert!(wizard.catalog().districts().is_empty());
}

#[tokio::test]
async fn region_change_resets_dependent_selections() {
    let (mut wizard, _, _, _) = build_wizard();
    wizard.open().await;
    wizard.select_region("Dhaka").await;
    wizard.select_district("Gazipur");
    wizard.select_subdistrict("Sreepur");

    wizard.select_region("Khulna").await;

    assert_eq!(wizard.draft().location.region, "Khulna");
    assert_eq!(wizard.draft().location.district, "");
    assert_eq!(wizard.draft().location.subdistrict, "");

    // The old district's subdistricts are gone until a district from the new
    // region's set is chosen.
    assert!(wizard.catalog().subdistricts_for("Gazipur").is_empty());
    assert!(wizard.subdistrict_options().is_empty());

    wizard.select_district("Jessore");
    assert_eq!(wizard.subdistrict_options(), ["Abhaynagar", "Bagherpara"]);
}

#[tokio::test]
async fn clearing_the_region_clears_districts_without_a_fetch() {
    let (mut wizard, geography, _, _) = build_wizard();
    wizard.open().await;
    wizard.select_region("Dhaka").await;
    assert_eq!(geography.district_calls(), 1);

    wizard.select_region("").await;

    assert_eq!(wizard.draft().location.region, "");
    assert!(wizard.catalog().districts().is_empty());
    assert_eq!(geography.district_calls(), 1);
}

#[tokio::test]
async fn subdistrict_resolution_never_reaches_the_gateway() {
    let (mut wizard, geography, _, _) = build_wizard();
    wizard.open().await;
    wizard.select_region("Dhaka").await;
    assert_eq!(geography.district_calls(), 1);

    wizard.select_district("Gazipur");
    assert_eq!(wizard.subdistrict_options(), ["Sreepur", "Kaliakair"]);
    assert_eq!(wizard.catalog().subdistricts_for("Narayanganj"), ["Rupganj"]);
    assert!(wizard.catalog().subdistricts_for("unknown").is_empty());

    assert_eq!(geography.district_calls(), 1);
    assert_eq!(geography.region_calls(), 1);
}

#[tokio::test]
async fn unknown_district_selection_clears_instead_of_sticking() {
    let (mut wizard, _, _, _) = build_wizard();
    wizard.open().await;
    wizard.select_region("Dhaka").await;

    wizard.select_district("Jessore");
    assert_eq!(wizard.draft().location.district, "");

    wizard.select_district("Gazipur");
    wizard.select_subdistrict("Rupganj");
    assert_eq!(wizard.draft().location.subdistrict, "");
}

#[test]
fn stale_district_listing_is_discarded() {
    let mut catalog = LocationCatalog::default();

    let first = catalog.begin_district_load();
    let second = catalog.begin_district_load();

    // The listing for the superseded selection arrives late and is dropped.
    let applied = catalog.complete_district_load(first, vec![district("Gazipur", &["Sreepur"])]);
    assert!(!applied);
    assert!(catalog.districts().is_empty());
    assert!(catalog.is_loading_districts());

    let applied = catalog.complete_district_load(second, vec![district("Jessore", &["Abhaynagar"])]);
    assert!(applied);
    assert_eq!(catalog.subdistricts_for("Jessore"), ["Abhaynagar"]);
    assert!(!catalog.is_loading_districts());
}

#[test]
fn reset_invalidates_an_in_flight_ticket() {
    let mut catalog = LocationCatalog::default();

    let ticket = catalog.begin_district_load();
    catalog.reset_districts();

    assert!(!catalog.complete_district_load(ticket, vec![district("Gazipur", &["Sreepur"])]));
    assert!(catalog.districts().is_empty());
}
