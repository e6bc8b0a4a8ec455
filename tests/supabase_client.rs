// Supabase client tests against a mock PostgREST server

use lekk_resto::models::{District, GeoPoint, PriceTier};
use lekk_resto::services::{RecordsSource, SupabaseClient, SupabaseError, SupabaseTables};
use mockito::Matcher;

fn create_client(base_url: String) -> SupabaseClient {
    SupabaseClient::new(base_url, "test-anon-key".to_string(), SupabaseTables::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_restaurants() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/rest/v1/restaurants")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "select".into(),
                "*,daily_specials(name,price,is_available,available_date)".into(),
            ),
            Matcher::UrlEncoded("order".into(), "name.asc".into()),
            Matcher::Regex(r"daily_specials\.available_date=gte\.\d{4}-\d{2}-\d{2}".into()),
        ]))
        .match_header("apikey", "test-anon-key")
        .match_header("authorization", "Bearer test-anon-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {
                    "id": "b7f1",
                    "name": "Chez Fatou",
                    "address": "Plateau, Dakar",
                    "coordinates": {"type": "Point", "coordinates": [-17.4467, 14.6928]},
                    "cuisine_type": "Traditionnelle",
                    "delivery_available": true,
                    "price_range": "$$",
                    "rating": 4.8,
                    "daily_specials": [{"name": "Thiéboudienne", "price": 3500}]
                },
                {"id": "broken"},
                {
                    "id": "c9a2",
                    "name": "Nouveau Spot",
                    "address": "Ouakam, Dakar",
                    "coordinates": null,
                    "price_range": "$$$$",
                    "daily_specials": []
                }
            ]"#,
        )
        .create_async()
        .await;

    let client = create_client(server.url());
    let records = client.fetch_restaurants().await.unwrap();

    mock.assert_async().await;

    // The row without a name is skipped
    assert_eq!(records.len(), 2);

    let fatou = &records[0];
    assert_eq!(fatou.id, "b7f1");
    assert_eq!(fatou.district, Some(District::Plateau));
    assert_eq!(fatou.price_tier, Some(PriceTier::Medium));
    assert_eq!(fatou.coordinates, Some(GeoPoint::DAKAR));
    assert_eq!(fatou.daily_specials.len(), 1);

    let spot = &records[1];
    assert!(spot.district.is_none());
    assert!(spot.price_tier.is_none());
    assert!(spot.coordinates.is_none());
}

#[tokio::test]
async fn test_fetch_restaurants_api_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/rest/v1/restaurants")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "Invalid API key"}"#)
        .create_async()
        .await;

    let client = create_client(server.url());
    let result = client.fetch_restaurants().await;

    match result {
        Err(SupabaseError::ApiError { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.len())),
    }
}

#[tokio::test]
async fn test_fetch_restaurants_not_an_array() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/rest/v1/restaurants")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"rows": []}"#)
        .create_async()
        .await;

    let client = create_client(server.url());
    let result = client.fetch_restaurants().await;

    assert!(matches!(result, Err(SupabaseError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_supabase_records_source() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/rest/v1/restaurants")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": "1", "name": "Chez Fatou", "address": "Plateau, Dakar"}]"#)
        .create_async()
        .await;

    let source = RecordsSource::Supabase(create_client(server.url()));
    let records = source.load().await.unwrap();

    assert_eq!(source.name(), "supabase");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Chez Fatou");
}
