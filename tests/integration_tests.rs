use chrono::{DateTime, Duration, TimeZone, Utc};
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use train_estimator::{
    DiscountCard, DiscountCards, EstimatorError, FixedPriceLookup, HttpPriceLookup,
    InvalidTripInput, Passenger, PriceEstimator, TripDetails, TripRequest,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 10, 12, 0, 0).unwrap()
}

fn departure() -> DateTime<Utc> {
    now() + Duration::days(31)
}

fn trip(passengers: Vec<Passenger>) -> TripRequest {
    TripRequest::new(TripDetails::new("Bordeaux", "Paris", departure()), passengers)
}

fn adult() -> Passenger {
    Passenger::new(28.0, DiscountCards::empty())
}

#[tokio::test]
async fn test_end_to_end_estimate_with_real_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/price")
            .query_param("from", "Bordeaux")
            .query_param("to", "Paris")
            .query_param("date", "2030-04-10T12:00:00Z");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"price": 20}));
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let total = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap();

    api_mock.assert();
    assert_eq!(total, dec!(20));
}

#[tokio::test]
async fn test_family_trip_over_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).json_body(json!({"price": 20}));
    });

    let passengers = vec![
        Passenger::new(73.0, [DiscountCard::Senior, DiscountCard::Family]).with_last_name("Dupont"),
        Passenger::new(70.0, [DiscountCard::Senior]).with_last_name("Dupont"),
    ];

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let quote = estimator.quote_at(&trip(passengers), now()).await.unwrap();

    api_mock.assert();
    assert_eq!(quote.subtotal(), dec!(16));
    assert_eq!(quote.group_adjustment, dec!(-4));
    assert_eq!(quote.total, dec!(12));
}

#[tokio::test]
async fn test_sentinel_price_is_lookup_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).json_body(json!({"price": -1}));
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
}

#[tokio::test]
async fn test_huge_price_is_lookup_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).json_body(json!({"price": 7e28}));
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
}

#[tokio::test]
async fn test_missing_price_field_is_lookup_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).json_body(json!({"status": "unknown route"}));
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
}

#[tokio::test]
async fn test_server_error_is_lookup_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/failed");
        then.status(500);
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/failed")));
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_non_json_body_is_lookup_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).body("<html>maintenance</html>");
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200)
            .delay(std::time::Duration::from_secs(3))
            .json_body(json!({"price": 20}));
    });

    let lookup =
        HttpPriceLookup::with_timeout(server.url("/slow"), std::time::Duration::from_millis(200))
            .unwrap();
    let estimator = PriceEstimator::new(lookup);
    let err = estimator.estimate_at(&trip(vec![adult()]), now()).await.unwrap_err();

    assert!(matches!(err, EstimatorError::PriceLookupFailed { .. }));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_service() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/price");
        then.status(200).json_body(json!({"price": 20}));
    });

    let estimator = PriceEstimator::new(HttpPriceLookup::new(server.url("/price")));

    let request = TripRequest::new(TripDetails::new("Bordeaux", "", departure()), vec![adult()]);
    let err = estimator.estimate_at(&request, now()).await.unwrap_err();
    assert!(matches!(
        err,
        EstimatorError::InvalidInput(InvalidTripInput::DestinationCity)
    ));

    let past = Utc.with_ymd_and_hms(2022, 6, 6, 0, 0, 0).unwrap();
    let request = TripRequest::new(TripDetails::new("Bordeaux", "Paris", past), vec![adult()]);
    let err = estimator.estimate_at(&request, now()).await.unwrap_err();
    assert_eq!(err.to_string(), "Date is invalid");

    let empty = trip(vec![]);
    assert_eq!(estimator.estimate_at(&empty, now()).await.unwrap(), dec!(0));

    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_concurrent_estimates_share_one_estimator() {
    let estimator = Arc::new(PriceEstimator::new(FixedPriceLookup::new(dec!(20))));

    let couple = {
        let estimator = Arc::clone(&estimator);
        tokio::spawn(async move {
            let request = trip(vec![adult(), Passenger::new(28.0, [DiscountCard::Couple])]);
            estimator.estimate_at(&request, now()).await
        })
    };
    let toddler = {
        let estimator = Arc::clone(&estimator);
        tokio::spawn(async move {
            let request = trip(vec![Passenger::new(3.0, DiscountCards::empty())]);
            estimator.estimate_at(&request, now()).await
        })
    };

    assert_eq!(couple.await.unwrap().unwrap(), dec!(32));
    assert_eq!(toddler.await.unwrap().unwrap(), dec!(9));
}
