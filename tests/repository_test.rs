mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use stockhome_api::config::ClientOptions;
use stockhome_api::error::Error;
use stockhome_api::models::{CreateItem, CreateShoppingListItem, PageRequest};
use stockhome_api::repository::{ItemsRepository, ShoppingListRepository, UsersRepository};
use stockhome_api::Supabase;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{item_row, no_rows, shopping_row, supabase};

fn items_repository(server: &MockServer) -> ItemsRepository {
    ItemsRepository::new(Arc::new(supabase(server)))
}

#[tokio::test]
async fn created_item_reads_back_identically() {
    let server = MockServer::start().await;
    let row = item_row("i1", "u1", Some("Grãos"), 2.0, 1.0, Some(7.5), None);

    Mock::given(method("POST"))
        .and(path("/rest/v1/items"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "nome": "Item i1", "user_id": "u1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&row))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", "eq.i1"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&row))
        .expect(1)
        .mount(&server)
        .await;

    let repository = items_repository(&server);
    let payload = CreateItem {
        name: "Item i1".to_string(),
        brand: "Tio João".to_string(),
        category: "Grãos".to_string(),
        current_quantity: 2.0,
        minimum_quantity: 1.0,
        unit: "un".to_string(),
        unit_price: 7.5,
        expiration_date: None,
    };

    let created = repository.create("u1", &payload).await.unwrap();
    let fetched = repository.get("u1", &created.id).await.unwrap();

    assert_eq!(created, fetched, "item should read back as it was stored");
    assert_eq!(fetched.user_id, "u1");
}

#[tokio::test]
async fn invalid_item_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let payload = CreateItem {
        name: "Sabão".to_string(),
        brand: String::new(),
        category: "Limpeza".to_string(),
        current_quantity: -1.0,
        minimum_quantity: 1.0,
        unit: "un".to_string(),
        unit_price: 3.0,
        expiration_date: None,
    };

    let err = items_repository(&server).create("u1", &payload).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn missing_item_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .respond_with(ResponseTemplate::new(406).set_body_json(no_rows()))
        .mount(&server)
        .await;

    let err = items_repository(&server).get("u1", "nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn list_reports_total_from_content_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("offset", "10"))
        .and(query_param("limit", "10"))
        .and(header("Prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "10-10/11")
                .set_body_json(json!([item_row("i11", "u1", None, 1.0, 0.0, None, None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = items_repository(&server)
        .list("u1", PageRequest::new(2, 10))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total, 11);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn low_stock_falls_back_to_scan_when_filter_is_rejected() {
    let server = MockServer::start().await;

    // Mounted first so it wins over the broader scan mock below
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("quantidade_atual", "lte.quantidade_minima"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "22P02",
            "message": "invalid input syntax for type numeric: \"quantidade_minima\""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row("plenty", "u1", None, 5.0, 1.0, None, None),
            item_row("at-min", "u1", None, 2.0, 2.0, None, None),
            item_row("empty", "u1", None, 0.0, 1.0, None, None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = items_repository(&server).low_stock("u1").await.unwrap();
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();

    assert_eq!(ids, vec!["empty", "at-min"], "lowest stock first, minimum inclusive");
}

#[tokio::test]
async fn low_stock_uses_server_filter_when_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("quantidade_atual", "lte.quantidade_minima"))
        .and(query_param("order", "quantidade_atual.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item_row(
            "low", "u1", None, 0.0, 1.0, None, None
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let items = items_repository(&server).low_stock("u1").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "low");
}

#[tokio::test]
async fn expiring_filters_on_dated_items_up_to_cutoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("data_validade", "not.is.null"))
        .and(query_param("data_validade", "lte.2024-02-14"))
        .and(query_param("order", "data_validade.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row("milk", "u1", Some("Laticínios"), 1.0, 1.0, None, Some("2024-01-20")),
            item_row("yogurt", "u1", Some("Laticínios"), 1.0, 1.0, None, Some("2024-02-14")),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cutoff = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
    let items = items_repository(&server)
        .expiring_before("u1", cutoff)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|item| item.expiration_date.map_or(false, |date| date <= cutoff)));
}

#[tokio::test]
async fn queries_only_return_the_callers_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row("a", "u1", None, 1.0, 0.0, None, None),
            item_row("b", "u1", None, 1.0, 0.0, None, None),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("user_id", "eq.u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repository = items_repository(&server);
    let mine = repository.all("u1").await.unwrap();
    let theirs = repository.all("u2").await.unwrap();

    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|item| item.user_id == "u1"));
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn purchase_adds_quantity_and_sets_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", "eq.i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_row(
            "i1", "u1", None, 2.0, 1.0, Some(4.0), None,
        )))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", "eq.i1"))
        .and(query_param("user_id", "eq.u1"))
        .and(body_partial_json(json!({ "quantidade_atual": 5.0, "valor_unitario": 4.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_row(
            "i1", "u1", None, 5.0, 1.0, Some(4.5), None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let item = items_repository(&server)
        .register_purchase("u1", "i1", 3.0, Some(4.5))
        .await
        .unwrap();

    assert_eq!(item.current_quantity, 5.0);
    assert_eq!(item.unit_price, Some(4.5));
}

#[tokio::test]
async fn purchase_requires_positive_quantity() {
    let server = MockServer::start().await;
    let repository = items_repository(&server);

    for quantity in [0.0, -2.0, f64::NAN] {
        let err = repository
            .register_purchase("u1", "i1", quantity, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "quantity {quantity} should be rejected");
    }
}

#[tokio::test]
async fn purchase_that_overflows_stock_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", "eq.i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_row(
            "i1", "u1", None, f64::MAX, 1.0, None, None,
        )))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = items_repository(&server)
        .register_purchase("u1", "i1", f64::MAX, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn shopping_list_entries_start_incomplete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/shopping_list"))
        .and(body_partial_json(json!({
            "nome": "Leite",
            "quantidade": 2.0,
            "concluido": false,
            "user_id": "u1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(shopping_row("s1", "u1", false)))
        .expect(1)
        .mount(&server)
        .await;

    let repository = ShoppingListRepository::new(Arc::new(supabase(&server)));
    let entry = repository
        .add(
            "u1",
            &CreateShoppingListItem {
                name: "Leite".to_string(),
                quantity: 2.0,
                unit: None,
            },
        )
        .await
        .unwrap();

    assert!(!entry.completed);
}

#[tokio::test]
async fn toggling_and_clearing_completed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/shopping_list"))
        .and(query_param("id", "eq.s1"))
        .and(body_partial_json(json!({ "concluido": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(shopping_row("s1", "u1", true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/shopping_list"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("concluido", "eq.true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let repository = ShoppingListRepository::new(Arc::new(supabase(&server)));

    let entry = repository.set_completed("u1", "s1", true).await.unwrap();
    assert!(entry.completed);

    repository.clear_completed("u1").await.unwrap();
}

#[tokio::test]
async fn incomplete_entries_filter_on_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shopping_list"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("concluido", "eq.false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            shopping_row("s1", "u1", false),
            shopping_row("s2", "u1", false),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repository = ShoppingListRepository::new(Arc::new(supabase(&server)));
    let entries = repository.incomplete("u1").await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| !entry.completed));
}

#[tokio::test]
async fn missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.ghost"))
        .respond_with(ResponseTemplate::new(406).set_body_json(no_rows()))
        .mount(&server)
        .await;

    let users = UsersRepository::new(Arc::new(supabase(&server)));
    assert!(users.get("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_rows_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"users_pkey\""
        })))
        .mount(&server)
        .await;

    let users = UsersRepository::new(Arc::new(supabase(&server)));
    let err = users.create("u1", "ana@example.com", "ana").await.unwrap_err();

    assert_eq!(err.code(), "DUPLICATE");
}

#[tokio::test]
async fn client_options_and_service_key_reach_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(header("apikey", "service-key"))
        .and(header("Authorization", "Bearer service-key"))
        .and(header("Accept-Profile", "stock"))
        .and(header("X-Client-Info", "stockhome-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions::default()
        .with_db_schema("stock")
        .with_client_info("stockhome-tests");
    let supabase =
        Supabase::new_with_options(&server.uri(), common::ANON_KEY, options).with_db_key("service-key");

    let items = ItemsRepository::new(Arc::new(supabase)).all("u1").await.unwrap();
    assert!(items.is_empty());
}
