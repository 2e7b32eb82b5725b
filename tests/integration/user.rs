use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn user_list_is_public_and_never_exposes_credentials() {
    let app = TestApp::spawn().await;
    app.create_authenticated_user("alice", "password1").await;
    app.create_authenticated_user("bob", "password2").await;

    let res = app.get_without_token(routes::USERS).await;

    assert_eq!(res.status, 200);
    let items = res.body.as_array().expect("list body should be an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["username"], "alice");
    assert_eq!(items[1]["username"], "bob");
    for item in items {
        assert!(item["password"].is_null());
        assert!(item["snippets"].is_array());
    }
}

#[tokio::test]
async fn user_detail_lists_owned_snippet_ids_in_creation_order() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("alice", "password1").await;
    let bob = app.create_authenticated_user("bob", "password2").await;

    let first = app.create_snippet(&alice, "a = 1").await;
    let other = app.create_snippet(&bob, "b = 2").await;
    let second = app.create_snippet(&alice, "c = 3").await;

    let me = app.get_with_token(routes::ME, &alice).await;
    assert_eq!(me.status, 200);
    let alice_id = me.id();

    let res = app.get_without_token(&routes::user(alice_id)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["snippets"], json!([first, second]));
    assert!(res.body["password"].is_null());

    // The snippet remains the owning side: bob's snippet shows up only on bob.
    let bob_me = app.get_with_token(routes::ME, &bob).await;
    let bob_res = app.get_without_token(&routes::user(bob_me.id())).await;
    assert_eq!(bob_res.body["snippets"], json!([other]));
}

#[tokio::test]
async fn user_with_no_snippets_has_an_empty_back_reference() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "password1").await;

    let me = app.get_with_token(routes::ME, &token).await;
    let res = app.get_without_token(&routes::user(me.id())).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["snippets"], json!([]));
}

#[tokio::test]
async fn unknown_user_id_returns_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(&routes::user(99)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
