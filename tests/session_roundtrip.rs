use std::fs;

use video_rental_manager::logging::init_logging;
use video_rental_manager::{Availability, Catalog, DatabaseFile, ErrorKind, Settings};

#[test]
fn catalog_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::new(dir.path().join("database.txt"), dir.path().join("session.log"));
    init_logging(&settings.log_path).unwrap();

    let mut catalog = Catalog::new();
    catalog.add("The Thing", "9/10", "Horror").unwrap();
    catalog.add("Paddington", "0.8", "Family").unwrap();
    catalog.add("Arrival", "7.5", "Sci-Fi").unwrap();
    assert_eq!(
        catalog.add("Nope", "ten", "Horror").unwrap_err().kind(),
        ErrorKind::Format
    );
    let rented = catalog.rent(Some(0)).unwrap();
    assert_eq!(catalog.get(rented).unwrap().availability, Availability::Unavailable);

    let database = DatabaseFile::new(settings.database_path.clone());
    database.save(catalog.records()).unwrap();
    let reloaded = Catalog::from_records(database.load().unwrap());

    assert_eq!(reloaded, catalog);
    assert!(fs::metadata(&settings.log_path).unwrap().is_file());
}

#[test]
fn files_from_the_legacy_writer_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.txt");
    fs::write(
        &path,
        "Up;0.75;Animation;available;\nAlien;0.9;Horror;unavailable;\nAlien;0.4;Horror;available;\n",
    )
    .unwrap();

    let catalog = Catalog::from_records(DatabaseFile::new(path).load().unwrap());
    let order: Vec<_> = catalog
        .records()
        .iter()
        .map(|r| (r.name.as_str(), r.availability))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Alien", Availability::Available),
            ("Up", Availability::Available),
            ("Alien", Availability::Unavailable),
        ]
    );
    assert!((catalog.average_rating().unwrap() - 0.683_333).abs() < 1e-5);
}
