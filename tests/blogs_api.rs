mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn author_creates_blog_and_reads_are_populated() {
    let app = TestApp::spawn().await;
    let author = app.register("Ada", "ada@x.com", "secret1").await;
    let author_id = app.user_id("ada@x.com").await;
    let category = app.category("Rust").await;

    let res = app
        .client
        .post(app.url("/api/blogs"))
        .bearer_auth(&author)
        .json(&json!({ "title": "Ownership", "content": "body", "category": category }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["author"], author_id.to_string());
    assert_eq!(created["category"], category);

    let res = app.client.get(app.url("/api/blogs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await.unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["author"]["name"], "Ada");
    assert_eq!(list[0]["category"]["name"], "Rust");
}

#[tokio::test]
async fn blog_creation_validates_fields_and_category() {
    let app = TestApp::spawn().await;
    let author = app.register("Ada", "ada@x.com", "secret1").await;

    let res = app
        .client
        .post(app.url("/api/blogs"))
        .bearer_auth(&author)
        .json(&json!({ "title": "", "category": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let res = app
        .client
        .post(app.url("/api/blogs"))
        .bearer_auth(&author)
        .json(&json!({ "title": "t", "content": "c", "category": Uuid::new_v4() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Category not found");
}

#[tokio::test]
async fn admin_token_cannot_create_blog() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let category = app.category("Rust").await;

    let res = app
        .client
        .post(app.url("/api/blogs"))
        .bearer_auth(&admin)
        .json(&json!({ "title": "t", "content": "c", "category": category }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_owner_or_admin_may_modify() {
    let app = TestApp::spawn().await;
    let owner = app.register("Owner", "owner@x.com", "secret1").await;
    let other = app.register("Other", "other@x.com", "secret1").await;
    let admin = app.admin_token().await;
    let category = app.category("Rust").await;
    let blog = app.blog(&owner, "Original", &category).await;
    let blog_url = app.url(&format!("/api/blogs/{blog}"));

    let res = app
        .client
        .put(&blog_url)
        .bearer_auth(&other)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Not authorized to update/delete this blog");

    let res = app
        .client
        .delete(&blog_url)
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .put(&blog_url)
        .bearer_auth(&owner)
        .json(&json!({ "title": "Edited" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "Edited");
    assert_eq!(body["content"], "body");
    assert_eq!(body["category"]["name"], "Rust");

    let res = app
        .client
        .put(&blog_url)
        .bearer_auth(&admin)
        .json(&json!({ "content": "moderated" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "Edited");
    assert_eq!(body["content"], "moderated");

    let res = app
        .client
        .delete(&blog_url)
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Blog deleted");

    let res = app.client.get(&blog_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_unknown_category_is_400() {
    let app = TestApp::spawn().await;
    let owner = app.register("Owner", "owner@x.com", "secret1").await;
    let category = app.category("Rust").await;
    let blog = app.blog(&owner, "Original", &category).await;

    let res = app
        .client
        .put(app.url(&format!("/api/blogs/{blog}")))
        .bearer_auth(&owner)
        .json(&json!({ "category": Uuid::new_v4() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Category not found");

    // Unchanged
    let stored = app
        .state
        .store
        .find_blog(blog.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.category_id.unwrap().to_string(), category);
}

#[tokio::test]
async fn blog_can_move_between_categories() {
    let app = TestApp::spawn().await;
    let owner = app.register("Owner", "owner@x.com", "secret1").await;
    let rust = app.category("Rust").await;
    let go = app.category("Go").await;
    let blog = app.blog(&owner, "Original", &rust).await;

    let res = app
        .client
        .put(app.url(&format!("/api/blogs/{blog}")))
        .bearer_auth(&owner)
        .json(&json!({ "category": go }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .get(app.url(&format!("/api/blogs/category/{go}")))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let res = app
        .client
        .get(app.url(&format!("/api/blogs/category/{rust}")))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_blog_is_404() {
    let app = TestApp::spawn().await;
    let author = app.register("A", "a@x.com", "secret1").await;
    let admin = app.admin_token().await;

    for token in [&author, &admin] {
        for id in [Uuid::new_v4().to_string(), "not-an-id".to_string()] {
            let res = app
                .client
                .delete(app.url(&format!("/api/blogs/{id}")))
                .bearer_auth(token)
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
            let body: Value = res.json().await.unwrap();
            assert_eq!(body["msg"], "Blog not found");
        }
    }

    let res = app
        .client
        .get(app.url(&format!("/api/blogs/{}", Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_of_deleted_user_cannot_create_blog() {
    let app = TestApp::spawn().await;
    let author = app.register("Ada", "ada@x.com", "secret1").await;
    let author_id = app.user_id("ada@x.com").await;
    let category = app.category("Rust").await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .delete(app.url(&format!("/api/users/{author_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The token is still within its lifetime
    let res = app
        .client
        .post(app.url("/api/blogs"))
        .bearer_auth(&author)
        .json(&json!({ "title": "Orphan", "content": "body", "category": category }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Not authorized");

    let res = app.client.get(app.url("/api/blogs")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert!(list.as_array().unwrap().is_empty());
}
