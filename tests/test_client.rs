use chopsmo_recipes::{ChopsmoError, Fetched, RecipeClient, ResponseCache};
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

fn recipe_json() -> &'static str {
    r#"
    {
        "id": 42,
        "title": "Buttermilk Pancakes",
        "description": "Weekend breakfast",
        "servings": "4",
        "ingredients": [
            "2 cups flour, sifted",
            {"ingredient_name": "Buttermilk", "amount": 2, "unit": "cups"},
            {"name": "Salt", "quantity": "1", "unit": "tsp"},
            ""
        ],
        "instructions": ["Whisk the dry ingredients.", "Fold in the buttermilk."]
    }
    "#
}

fn client_for(server: &mockito::Server) -> RecipeClient {
    RecipeClient::builder()
        .base_url(server.url())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fetch_recipe_normalizes_ingredients() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipes/42/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_json())
        .create();

    let recipe = client_for(&server).fetch_recipe("42").await.unwrap();

    assert_eq!(recipe.id, "42");
    assert_eq!(recipe.title, "Buttermilk Pancakes");
    assert_eq!(recipe.servings.as_deref(), Some("4"));
    assert_eq!(recipe.ingredients.len(), 3);

    assert_eq!(recipe.ingredients[0].name, "flour");
    assert_eq!(recipe.ingredients[0].preparation, "sifted");
    assert_eq!(recipe.ingredients[1].name, "Buttermilk");
    assert_eq!(recipe.ingredients[1].amount(), "2 cups");
    assert_eq!(recipe.ingredients[2].display(), "1 tsp Salt");

    assert_eq!(recipe.instructions.len(), 2);
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/recipes/42/")
        .with_status(200)
        .with_body(recipe_json())
        .expect(1)
        .create();

    let client = client_for(&server);
    let first = client.fetch_recipe("42").await.unwrap();
    let second = client.fetch_recipe("42").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.cache().stats().hits, 1);
    m.assert_async().await;
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/recipes/42/")
        .with_status(200)
        .with_body(recipe_json())
        .expect(2)
        .create();

    let client = client_for(&server);
    client.fetch_recipe("42").await.unwrap();
    client.invalidate_recipe("42");
    client.fetch_recipe("42").await.unwrap();

    m.assert_async().await;
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/recipes/42/")
        .with_status(200)
        .with_body(recipe_json())
        .expect(2)
        .create();

    let client = RecipeClient::builder()
        .base_url(server.url())
        .cache(Arc::new(ResponseCache::disabled()))
        .build()
        .unwrap();

    client.fetch_recipe("42").await.unwrap();
    client.fetch_recipe("42").await.unwrap();

    m.assert_async().await;
}

#[tokio::test]
async fn test_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipes/missing/")
        .with_status(404)
        .with_body(r#"{"detail": "Not found."}"#)
        .create();

    let result = client_for(&server).fetch_recipe("missing").await;

    match result {
        Err(ChopsmoError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/recipes/missing/"));
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_response_is_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("GET", "/recipes/42/")
        .with_status(500)
        .expect(1)
        .create();

    let client = client_for(&server);
    assert!(client.fetch_recipe("42").await.is_err());
    failing.assert_async().await;
    failing.remove_async().await;

    let _ok = server
        .mock("GET", "/recipes/42/")
        .with_status(200)
        .with_body(recipe_json())
        .create();
    assert!(client.fetch_recipe("42").await.is_ok());
}

#[tokio::test]
async fn test_unresponsive_backend_times_out() {
    // Accepts the connection and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        }
    });

    let client = RecipeClient::builder()
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let result = client.fetch_recipe("42").await;
    assert!(
        matches!(result, Err(ChopsmoError::Timeout(_))),
        "Expected timeout, got {result:?}"
    );
    assert_eq!(client.cache().stats().hits, 0);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipes/1/")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let result = client_for(&server).fetch_recipe("1").await;
    assert!(matches!(result, Err(ChopsmoError::JsonError(_))));
}

#[tokio::test]
async fn test_token_header_is_sent() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/recipes/42/")
        .match_header("authorization", "Token secret-token")
        .with_status(200)
        .with_body(recipe_json())
        .create();

    let client = RecipeClient::builder()
        .base_url(server.url())
        .token("secret-token")
        .build()
        .unwrap();

    assert!(client.fetch_recipe("42").await.is_ok());
    m.assert_async().await;
}

#[tokio::test]
async fn test_search_recipes() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipes/")
        .match_query(Matcher::UrlEncoded("search".into(), "tomato soup".into()))
        .with_status(200)
        .with_body(
            r#"{"count": 2, "results": [
                {"id": 1, "title": "Tomato Soup"},
                {"id": 2, "title": "Roasted Tomato Soup", "image_url": "https://example.com/r.jpg"}
            ]}"#,
        )
        .create();

    let results = client_for(&server)
        .search_recipes("tomato soup")
        .await
        .unwrap()
        .current()
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].title, "Roasted Tomato Soup");
    assert_eq!(results[1].image.as_deref(), Some("https://example.com/r.jpg"));
}

#[tokio::test]
async fn test_older_search_is_superseded() {
    let mut server = mockito::Server::new_async().await;
    let _first = server
        .mock("GET", "/recipes/")
        .match_query(Matcher::UrlEncoded("search".into(), "tom".into()))
        .with_status(200)
        .with_body(r#"[{"id": 1, "title": "Tomato"}]"#)
        .create();
    let _second = server
        .mock("GET", "/recipes/")
        .match_query(Matcher::UrlEncoded("search".into(), "tomato".into()))
        .with_status(200)
        .with_body(r#"[{"id": 1, "title": "Tomato"}, {"id": 2, "title": "Tomato Pie"}]"#)
        .create();

    let client = client_for(&server);
    let (older, newer) = tokio::join!(client.search_recipes("tom"), client.search_recipes("tomato"));

    assert_eq!(older.unwrap(), Fetched::Superseded);
    assert_eq!(newer.unwrap().current().map(|r| r.len()), Some(2));
}
