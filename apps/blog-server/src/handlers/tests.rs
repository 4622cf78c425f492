use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use blog_core::domain::{Category, Comment, Location, Post, User};
use blog_core::policy::UncategorizedPolicy;
use blog_core::ports::{AuthError, BaseRepository, PasswordService, RateLimiter};
use blog_infra::{InMemoryRateLimiter, InMemoryStore, JwtConfig, JwtTokenService, RateLimitConfig};

use super::{configure_routes, json_config, path_config};
use crate::config::AppConfig;
use crate::state::{AppState, Repositories};

/// Argon2 is too slow for handler tests.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${password}"))
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        posts_per_page: 10,
        uncategorized: UncategorizedPolicy::Public,
    }
}

fn state_for(config: &AppConfig) -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-tests".to_string(),
        ..JwtConfig::default()
    });

    AppState::with_services(
        Repositories::in_memory(&InMemoryStore::new()),
        Arc::new(tokens),
        Arc::new(PlainPasswords),
        config,
    )
}

/// Fresh in-memory state with cheap password hashing.
pub(crate) fn test_state() -> AppState {
    state_for(&test_config())
}

struct Fixture {
    state: AppState,
    limiter: Arc<dyn RateLimiter>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(test_config())
    }

    fn with_config(config: AppConfig) -> Self {
        let state = state_for(&config);
        let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1_000,
            window: Duration::from_secs(60),
        }));

        Self { state, limiter }
    }

    /// A user and a bearer header for them.
    async fn user(&self, username: &str) -> (User, (&'static str, String)) {
        self.account(username, false).await
    }

    async fn staff(&self, username: &str) -> (User, (&'static str, String)) {
        self.account(username, true).await
    }

    async fn account(&self, username: &str, is_staff: bool) -> (User, (&'static str, String)) {
        let mut user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            format!("plain$secret-{username}"),
        );
        user.is_staff = is_staff;
        let user = self.state.users.create(user).await.unwrap();

        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();

        (user, ("Authorization", format!("Bearer {token}")))
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(
            slug.to_uppercase(),
            "About it".to_string(),
            slug.to_string(),
        );
        category.is_published = is_published;
        self.state.categories.create(category).await.unwrap()
    }

    async fn post(&self, author: &User, title: &str, age: TimeDelta) -> Post {
        self.save_post(Post::new(
            author.id,
            title.to_string(),
            "Body".to_string(),
            Utc::now() - age,
        ))
        .await
    }

    async fn save_post(&self, post: Post) -> Post {
        self.state.posts.create(post).await.unwrap()
    }
}

macro_rules! app {
    ($fixture:expr) => {{
        let limiter = $fixture.limiter.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.state.clone()))
                .app_data(json_config())
                .app_data(path_config())
                .configure(move |cfg| configure_routes(cfg, limiter)),
        )
        .await
    }};
}

fn titles(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

fn post_body(title: &str, pub_date: chrono::DateTime<Utc>) -> Value {
    json!({
        "title": title,
        "text": "Went to the mountains.",
        "pub_date": pub_date,
    })
}

// ---------------------------------------------------------------------------
// Listings and visibility
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_index_lists_live_posts_newest_first() {
    let fx = Fixture::new();
    let (alice, _) = fx.user("alice").await;
    fx.post(&alice, "Older", TimeDelta::days(2)).await;
    fx.post(&alice, "Newer", TimeDelta::hours(1)).await;
    fx.save_post(
        Post::new(alice.id, "Draft".into(), "x".into(), Utc::now() - TimeDelta::days(1))
            .unpublished(),
    )
    .await;
    let app = app!(fx);

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(titles(&body), vec!["Newer", "Older"]);
    assert_eq!(body["items"][0]["author"]["username"], "alice");
    assert_eq!(body["total_items"], 2);
}

#[actix_web::test]
async fn test_scheduled_post_visible_only_to_author() {
    let fx = Fixture::new();
    let (alice, alice_auth) = fx.user("alice").await;
    let (_, bob_auth) = fx.user("bob").await;
    let scheduled = fx.post(&alice, "Tomorrow", -TimeDelta::days(1)).await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(titles(&body).is_empty());

    let uri = format!("/posts/{}/", scheduled.id);
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bob_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(alice_auth.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/profile/alice/")
        .insert_header(alice_auth)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body["posts"]), vec!["Tomorrow"]);
}

#[actix_web::test]
async fn test_unpublished_category_hides_its_posts() {
    let fx = Fixture::new();
    let (alice, _) = fx.user("alice").await;
    let hidden = fx.category("secret", false).await;
    let travel = fx.category("travel", true).await;
    fx.save_post(
        Post::new(alice.id, "Hidden".into(), "x".into(), Utc::now() - TimeDelta::hours(2))
            .with_category(Some(hidden.id)),
    )
    .await;
    fx.save_post(
        Post::new(alice.id, "Trip".into(), "x".into(), Utc::now() - TimeDelta::hours(1))
            .with_category(Some(travel.id)),
    )
    .await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["Trip"]);

    let req = test::TestRequest::get().uri("/category/secret/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/category/travel/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["category"]["slug"], "travel");
    assert_eq!(titles(&body["posts"]), vec!["Trip"]);
}

#[actix_web::test]
async fn test_hidden_uncategorized_policy() {
    let fx = Fixture::with_config(AppConfig {
        uncategorized: UncategorizedPolicy::Hidden,
        ..test_config()
    });
    let (alice, alice_auth) = fx.user("alice").await;
    fx.post(&alice, "Loose", TimeDelta::hours(1)).await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(titles(&body).is_empty());

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(alice_auth)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["Loose"]);
}

#[actix_web::test]
async fn test_pagination_bounds() {
    let fx = Fixture::new();
    let (alice, _) = fx.user("alice").await;
    let app = app!(fx);

    // An empty first page is still a page.
    let req = test::TestRequest::get().uri("/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for i in 0..11 {
        fx.post(&alice, &format!("Post {i}"), TimeDelta::minutes(i + 1))
            .await;
    }

    let req = test::TestRequest::get().uri("/?page=2").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["Post 10"]);
    assert_eq!(body["has_previous"], true);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["total_pages"], 2);

    // Pages whose offset overflows, or that no SQL OFFSET can reach.
    let unaddressable = [
        "/?page=18446744073709551615".to_string(),
        format!("/?page={}", (i64::MAX as u64) / 10 + 2),
    ];
    let invalid = ["/?page=3", "/?page=0", "/?page=last-ish"].map(String::from);

    for uri in invalid.iter().chain(&unaddressable) {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND,
            "{uri}"
        );
    }
}

// ---------------------------------------------------------------------------
// Authoring
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_create_post_requires_login() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .set_json(post_body("Hello", Utc::now()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_post_and_read_it_back() {
    let fx = Fixture::new();
    let (_, alice_auth) = fx.user("alice").await;
    let travel = fx.category("travel", true).await;
    let location = fx
        .state
        .locations
        .create(Location::new("Alps".to_string()))
        .await
        .unwrap();
    let app = app!(fx);

    let mut body = post_body("Summit", Utc::now() - TimeDelta::minutes(5));
    body["category_id"] = json!(travel.id);
    body["location_id"] = json!(location.id);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(alice_auth)
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["author"]["username"], "alice");
    assert_eq!(created["category"]["slug"], "travel");
    assert_eq!(created["location"]["name"], "Alps");

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", created["id"].as_str().unwrap()))
        .to_request();
    let detail: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(detail["post"]["title"], "Summit");
    assert_eq!(detail["comments"], json!([]));
}

#[actix_web::test]
async fn test_create_post_reports_field_errors() {
    let fx = Fixture::new();
    let (_, alice_auth) = fx.user("alice").await;
    let app = app!(fx);

    let mut body = post_body("", Utc::now());
    body["category_id"] = json!(uuid::Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(alice_auth)
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let problem: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "category_id"]);
}

#[actix_web::test]
async fn test_overlong_image_is_a_field_error() {
    let fx = Fixture::new();
    let (_, alice_auth) = fx.user("alice").await;
    let app = app!(fx);

    let mut body = post_body("Summit", Utc::now());
    body["image"] = json!(format!("posts/{}.jpg", "x".repeat(1024)));

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(alice_auth.clone())
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let problem: Value = test::read_body_json(res).await;
    assert_eq!(problem["errors"][0]["field"], "image");
    assert_eq!(problem["errors"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/profile/alice/")
        .insert_header(alice_auth)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["posts"]["total_items"], 0);
}

#[actix_web::test]
async fn test_malformed_id_in_path_is_problem_json() {
    let fx = Fixture::new();
    let (_, alice_auth) = fx.user("alice").await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/posts/not-a-uuid/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let problem: Value = test::read_body_json(res).await;
    assert_eq!(problem["status"], 404);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete_comment/42/", uuid::Uuid::new_v4()))
        .insert_header(alice_auth)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let problem: Value = test::read_body_json(res).await;
    assert_eq!(problem["status"], 404);
}

#[actix_web::test]
async fn test_only_author_edits_or_deletes_post() {
    let fx = Fixture::new();
    let (alice, alice_auth) = fx.user("alice").await;
    let (_, bob_auth) = fx.user("bob").await;
    let post = fx.post(&alice, "Mine", TimeDelta::hours(1)).await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(bob_auth.clone())
        .set_json(post_body("Hijacked", Utc::now()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header(bob_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let stored = fx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mine");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(alice_auth.clone())
        .set_json(post_body("Mine, revised", Utc::now() - TimeDelta::minutes(1)))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], "Mine, revised");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header(alice_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    assert!(fx.state.posts.find_by_id(post.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_comments_flow() {
    let fx = Fixture::new();
    let (alice, alice_auth) = fx.user("alice").await;
    let (_, bob_auth) = fx.user("bob").await;
    let post = fx.post(&alice, "Trip", TimeDelta::hours(1)).await;
    let app = app!(fx);

    for (auth, text) in [(&bob_auth, "First!"), (&alice_auth, "Thanks")] {
        let req = test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header(auth.clone())
            .set_json(json!({ "text": text }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let detail: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(detail["post"]["comment_count"], 2);
    assert_eq!(detail["comments"][0]["text"], "First!");
    assert_eq!(detail["comments"][0]["author"]["username"], "bob");
    assert_eq!(detail["comments"][1]["text"], "Thanks");

    let bobs = detail["comments"][0]["id"].as_str().unwrap().to_string();

    // Alice owns the post but not the comment.
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete_comment/{bobs}/", post.id))
        .insert_header(alice_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let bobs_id = uuid::Uuid::parse_str(&bobs).unwrap();
    let kept = fx.state.comments.find_by_id(bobs_id).await.unwrap();
    assert_eq!(kept.map(|c| c.text), Some("First!".to_string()));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit_comment/{bobs}/", post.id))
        .insert_header(bob_auth.clone())
        .set_json(json!({ "text": "First! (edited)" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["text"], "First! (edited)");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete_comment/{bobs}/", post.id))
        .insert_header(bob_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_comment_paths_must_match_post() {
    let fx = Fixture::new();
    let (alice, alice_auth) = fx.user("alice").await;
    let first = fx.post(&alice, "One", TimeDelta::hours(2)).await;
    let second = fx.post(&alice, "Two", TimeDelta::hours(1)).await;
    let comment = fx
        .state
        .comments
        .create(Comment::new(first.id, alice.id, "On one".to_string()))
        .await
        .unwrap();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit_comment/{}/", second.id, comment.id))
        .insert_header(alice_auth.clone())
        .set_json(json!({ "text": "moved" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", uuid::Uuid::new_v4()))
        .insert_header(alice_auth)
        .set_json(json!({ "text": "into the void" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_register_login_and_me() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "correct horse",
            "first_name": "Carol",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "carol", "password": "wrong horse" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "carol", "password": "correct horse" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let auth: Value = test::read_body_json(res).await;
    assert_eq!(auth["token_type"], "Bearer");

    let req = test::TestRequest::get()
        .uri("/auth/me/")
        .insert_header((
            "Authorization",
            format!("Bearer {}", auth["access_token"].as_str().unwrap()),
        ))
        .to_request();
    let me: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(me["username"], "carol");
    assert_eq!(me["first_name"], "Carol");
    assert_eq!(me["is_staff"], false);
    assert!(me.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_rejects_taken_username_and_short_password() {
    let fx = Fixture::new();
    fx.user("alice").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "short",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let problem: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "username"]);
}

#[actix_web::test]
async fn test_password_change_checks_old_password() {
    let fx = Fixture::new();
    let (alice, alice_auth) = fx.user("alice").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/password_change/")
        .insert_header(alice_auth.clone())
        .set_json(json!({ "old_password": "guess", "new_password": "new-secret-1" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::post()
        .uri("/auth/password_change/")
        .insert_header(alice_auth)
        .set_json(json!({ "old_password": "secret-alice", "new_password": "new-secret-1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let stored = fx.state.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "plain$new-secret-1");
}

#[actix_web::test]
async fn test_edit_profile() {
    let fx = Fixture::new();
    fx.user("bob").await;
    let (_, alice_auth) = fx.user("alice").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/edit/profile/")
        .insert_header(alice_auth.clone())
        .set_json(json!({ "username": "bob", "email": "alice@example.com" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::post()
        .uri("/edit/profile/")
        .insert_header(alice_auth)
        .set_json(json!({
            "username": "alice.w",
            "first_name": "Alice",
            "last_name": "Walker",
            "email": "alice@example.com",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/profile/alice.w/").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["profile"]["last_name"], "Walker");
    assert!(body["profile"].get("email").is_none());
}

#[actix_web::test]
async fn test_unknown_profile_is_not_found() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/profile/nobody/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Management
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_manage_requires_staff() {
    let fx = Fixture::new();
    let (_, bob_auth) = fx.user("bob").await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/manage/categories/")
        .insert_header(bob_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_sign_up_never_grants_staff() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({
            "username": "admin",
            "email": "admin@example.com",
            "password": "correct horse",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let auth: Value = test::read_body_json(res).await;

    let req = test::TestRequest::post()
        .uri("/manage/locations/")
        .insert_header((
            "Authorization",
            format!("Bearer {}", auth["access_token"].as_str().unwrap()),
        ))
        .set_json(json!({ "name": "Alps" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let admin = fx.state.users.find_by_username("admin").await.unwrap().unwrap();
    assert!(!admin.is_staff);
}

#[actix_web::test]
async fn test_deleting_category_keeps_posts() {
    let fx = Fixture::new();
    let (_, admin_auth) = fx.staff("admin").await;
    let (alice, _) = fx.user("alice").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/manage/categories/")
        .insert_header(admin_auth.clone())
        .set_json(json!({ "title": "Travel", "description": "Trips", "slug": "travel" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let category: Value = test::read_body_json(res).await;
    let category_id: uuid::Uuid = category["id"].as_str().unwrap().parse().unwrap();

    let post = fx
        .save_post(
            Post::new(alice.id, "Trip".into(), "x".into(), Utc::now() - TimeDelta::hours(1))
                .with_category(Some(category_id)),
        )
        .await;

    let req = test::TestRequest::post()
        .uri("/manage/categories/")
        .insert_header(admin_auth.clone())
        .set_json(json!({ "title": "Again", "description": "Dup", "slug": "travel" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::post()
        .uri(&format!("/manage/categories/{category_id}/delete/"))
        .insert_header(admin_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = test::read_body_json(res).await;
    assert_eq!(detail["post"]["category"], Value::Null);
}

#[actix_web::test]
async fn test_staff_unpublishes_location() {
    let fx = Fixture::new();
    let (_, admin_auth) = fx.staff("admin").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/manage/locations/")
        .insert_header(admin_auth.clone())
        .set_json(json!({ "name": "Lisbon" }))
        .to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(created["is_published"], true);

    let req = test::TestRequest::post()
        .uri(&format!("/manage/locations/{}/edit/", created["id"].as_str().unwrap()))
        .insert_header(admin_auth.clone())
        .set_json(json!({ "name": "Lisbon", "is_published": false }))
        .to_request();
    let updated: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(updated["is_published"], false);

    let req = test::TestRequest::get()
        .uri("/manage/locations/")
        .insert_header(admin_auth)
        .to_request();
    let list: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_health() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["status"], "ok");
}
