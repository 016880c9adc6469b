use price_tracker::error::AppError;
use price_tracker::models::*;
use price_tracker::services::{starter_products, starter_retailers, ManualPriceEntry};
use rust_decimal_macros::dec;

/// Unit tests for Models
#[test]
fn test_price_per_unit_for_multipack() {
    let point = ManualPriceEntry::create_price_point(
        "eucerin-eczema-5oz",
        "walmart",
        dec!(12.00),
        "https://www.walmart.com/ip/example",
        3,
        None,
    );
    assert_eq!(point.price_per_unit(), dec!(4.00));
}

#[test]
fn test_good_deal_thresholds() {
    let window = vec![
        ManualPriceEntry::create_price_point("p", "r", dec!(15.00), "u", 1, None),
    ];

    let cheaper = PricePoint { price: dec!(14.00), ..window[0].clone() };
    let stats = PriceStats::from_observations("p", "r", &window, Some(&cheaper)).unwrap();
    assert!(stats.is_good_deal(dec!(0.95)));

    let barely = PricePoint { price: dec!(14.30), ..window[0].clone() };
    let stats = PriceStats::from_observations("p", "r", &window, Some(&barely)).unwrap();
    assert!(!stats.is_good_deal(dec!(0.95)));

    let pricier = PricePoint { price: dec!(16.00), ..window[0].clone() };
    let stats = PriceStats::from_observations("p", "r", &window, Some(&pricier)).unwrap();
    assert_eq!(stats.savings_vs_average(), dec!(-1.00));
}

#[test]
fn test_starter_catalog() {
    let retailers = starter_retailers();
    let ids: Vec<&str> = retailers.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["walmart", "target"]);

    let products = starter_products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].brand_name(), "Pataday");
}

/// Unit tests for Error Handling
#[test]
fn test_error_types() {
    let db_error = AppError::Database(
        price_tracker::database::DatabaseError::PoolCreation(sqlx::Error::PoolClosed),
    );

    assert!(db_error.is_storage_unavailable());
    assert!(format!("{}", db_error).contains("Database"));
}
