mod common;

use anyhow::{Context, Result};
use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::{json, Value};

use common::{get, login_admin, request, send, test_app};

async fn create(router: &Router, cookie: &str, uri: &str, body: Value) -> Result<Value> {
    let reply = send(router, request(Method::POST, uri, Some(cookie), Some(&body))).await?;
    anyhow::ensure!(reply.body["code"] == 1, "POST {} failed: {}", uri, reply.body);
    Ok(reply.body["data"].clone())
}

async fn create_category(
    router: &Router,
    cookie: &str,
    category_type: i32,
    name: &str,
    sort: i32,
) -> Result<Value> {
    let body = json!({ "type": category_type, "name": name, "sort": sort });
    create(router, cookie, "/category", body).await
}

async fn post(router: &Router, uri: &str, cookie: &str, body: &Value) -> Result<common::Reply> {
    send(router, request(Method::POST, uri, Some(cookie), Some(body))).await
}

async fn delete(router: &Router, uri: &str, cookie: &str) -> Result<common::Reply> {
    send(router, request(Method::DELETE, uri, Some(cookie), None)).await
}

fn id_of(record: &Value) -> Result<String> {
    record["id"].as_str().map(str::to_string).context("record without string id")
}

#[tokio::test]
async fn category_list_and_page_are_sorted() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    create_category(&router, &cookie, 1, "Sichuan", 2).await?;
    create_category(&router, &cookie, 1, "Cantonese", 1).await?;
    let combo = create_category(&router, &cookie, 2, "Business set", 0).await?;
    assert_eq!(combo["type"], 2);
    assert_eq!(combo["createUser"], app.admin_id.to_string());

    let reply = get(&router, "/category/page?page=1&pageSize=2", &cookie).await?;
    let page = &reply.body["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["size"], 2);
    assert_eq!(page["records"][0]["name"], "Business set");
    assert_eq!(page["records"][1]["name"], "Cantonese");

    let reply = get(&router, "/category/list?type=1", &cookie).await?;
    let names: Vec<&str> = reply.body["data"]
        .as_array()
        .context("list data")?
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, ["Cantonese", "Sichuan"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_category_name() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    create_category(&router, &cookie, 1, "Hunan", 1).await?;
    let body = json!({ "type": 1, "name": "Hunan", "sort": 3 });
    let reply = post(&router, "/category", &cookie, &body).await?;
    assert_eq!(reply.body["message"], "Hunan already exists");
    Ok(())
}

#[tokio::test]
async fn category_with_dishes_cannot_be_deleted() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    let category = create_category(&router, &cookie, 1, "Sichuan", 1).await?;
    let category_id = id_of(&category)?;
    let dish = create(
        &router,
        &cookie,
        "/dish",
        json!({ "name": "Mapo tofu", "categoryId": category_id, "price": 1800, "status": 0 }),
    )
    .await?;

    let uri = format!("/category?ids={}", category_id);
    let reply = delete(&router, &uri, &cookie).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["code"], 0);
    assert_eq!(reply.body["message"], "Category still has dishes and cannot be deleted");

    let reply = delete(&router, &format!("/dish?ids={}", id_of(&dish)?), &cookie).await?;
    assert_eq!(reply.body["code"], 1, "{}", reply.body);

    let reply = delete(&router, &uri, &cookie).await?;
    assert_eq!(reply.body["code"], 1, "{}", reply.body);
    let reply = get(&router, "/category/list", &cookie).await?;
    assert_eq!(reply.body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn dish_lifecycle() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    let category = create_category(&router, &cookie, 1, "Cantonese", 1).await?;
    let category_id = id_of(&category)?;

    let dish = create(
        &router,
        &cookie,
        "/dish",
        json!({ "name": "Char siu", "categoryId": category_id, "price": 3800, "code": "CS01" }),
    )
    .await?;
    let dish_id = id_of(&dish)?;
    assert_eq!(dish["status"], 1);
    assert_eq!(dish["categoryId"], category_id);

    let changes = json!({ "id": dish_id, "price": 4200, "description": "Honey glazed" });
    let reply = send(&router, request(Method::PUT, "/dish", Some(&cookie), Some(&changes))).await?;
    assert_eq!(reply.body["code"], 1, "{}", reply.body);

    let dish_uri = format!("/dish/{}", dish_id);
    let reply = get(&router, &dish_uri, &cookie).await?;
    assert_eq!(reply.body["data"]["price"], 4200);
    assert_eq!(reply.body["data"]["description"], "Honey glazed");
    assert_eq!(reply.body["data"]["name"], "Char siu");

    // on sale: refuse to delete
    let delete_uri = format!("/dish?ids={}", dish_id);
    let reply = delete(&router, &delete_uri, &cookie).await?;
    assert_eq!(reply.body["message"], "Dishes on sale cannot be deleted");

    let status_uri = format!("/dish/status/0?ids={}", dish_id);
    let reply = post(&router, &status_uri, &cookie, &Value::Null).await?;
    assert_eq!(reply.body["code"], 1, "{}", reply.body);

    let reply = delete(&router, &delete_uri, &cookie).await?;
    assert_eq!(reply.body["code"], 1, "{}", reply.body);

    let reply = get(&router, &dish_uri, &cookie).await?;
    assert_eq!(reply.body["message"], "Dish not found");
    Ok(())
}

#[tokio::test]
async fn dish_page_filters_by_name() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    let category = create_category(&router, &cookie, 1, "Sichuan", 1).await?;
    let category_id = id_of(&category)?;
    for name in ["Kung pao chicken", "Twice cooked pork", "Chicken with chillies"] {
        let body = json!({ "name": name, "categoryId": category_id, "price": 2000 });
        create(&router, &cookie, "/dish", body).await?;
    }

    let reply = get(&router, "/dish/page?page=1&pageSize=10&name=chicken", &cookie).await?;
    assert_eq!(reply.body["data"]["total"], 2);
    Ok(())
}

#[tokio::test]
async fn dish_input_is_validated() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    let body = json!({ "name": "Orphan", "categoryId": "424242", "price": 100 });
    let reply = post(&router, "/dish", &cookie, &body).await?;
    assert_eq!(reply.body["message"], "Category not found");

    let category = create_category(&router, &cookie, 1, "Hunan", 1).await?;
    let body = json!({ "name": "Free lunch", "categoryId": id_of(&category)?, "price": -1 });
    let reply = post(&router, "/dish", &cookie, &body).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = post(&router, "/dish/status/3?ids=1", &cookie, &Value::Null).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = delete(&router, "/dish?ids=abc", &cookie).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_dish_input_gets_the_envelope() -> Result<()> {
    let app = test_app().await;
    let router = app.router();
    let cookie = login_admin(&router).await?;

    // missing categoryId
    let body = json!({ "name": "Nameless", "price": 100 });
    let reply = post(&router, "/dish", &cookie, &body).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], 0);
    assert_eq!(reply.body["data"], Value::Null);

    let reply = post(&router, "/dish/status/on?ids=1", &cookie, &Value::Null).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], 0);
    assert!(reply.body["message"].is_string());

    let reply = get(&router, "/category/list?type=combo", &cookie).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], 0);
    Ok(())
}
