use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::storage::{FileBackend, StorageEngine};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

async fn start_server(engine: StorageEngine) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = server::startup::serve(listener, engine, std::future::pending()).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

async fn start_memory_server() -> anyhow::Result<TestApp> {
    start_server(StorageEngine::memory()).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

async fn post(c: &reqwest::Client, url: String, body: Value) -> anyhow::Result<(HttpStatusCode, Value)> {
    let res = c.post(url).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

async fn get(c: &reqwest::Client, url: String) -> anyhow::Result<(HttpStatusCode, Value)> {
    let res = c.get(url).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

fn id_of(v: &Value) -> String {
    v["id"].as_str().expect("record id").to_string()
}

/// State -> City -> Place (owned by a user, with one amenity) -> Review.
struct Graph {
    state: String,
    city: String,
    user: String,
    place: String,
    review: String,
    amenity: String,
}

async fn seed(app: &TestApp, c: &reqwest::Client) -> anyhow::Result<Graph> {
    let (_, state) = post(c, app.url("/states"), json!({"name": "California"})).await?;
    let state = id_of(&state);
    let (_, city) = post(c, app.url(&format!("/states/{state}/cities")), json!({"name": "San Francisco"})).await?;
    let city = id_of(&city);
    let (_, user) = post(c, app.url("/users"), json!({"email": "host@hbnb.io", "password": "pwd"})).await?;
    let user = id_of(&user);
    let (_, place) = post(
        c,
        app.url(&format!("/cities/{city}/places")),
        json!({"name": "Loft", "user_id": user, "number_rooms": 2, "latitude": 37.77}),
    )
    .await?;
    let place = id_of(&place);
    let (_, review) = post(c, app.url(&format!("/places/{place}/reviews")), json!({"text": "Great", "user_id": user})).await?;
    let review = id_of(&review);
    let (_, amenity) = post(c, app.url("/amenities"), json!({"name": "Wifi"})).await?;
    let amenity = id_of(&amenity);
    let res = c.post(app.url(&format!("/places/{place}/amenities/{amenity}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(Graph { state, city, user, place, review, amenity })
}

#[tokio::test]
async fn e2e_status_and_stats() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();

    let (status, body) = get(&c, app.url("/status")).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));

    seed(&app, &c).await?;
    let (status, body) = get(&c, app.url("/stats/")).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(
        body,
        json!({"amenities": 1, "cities": 1, "places": 1, "reviews": 1, "states": 1, "users": 1})
    );
    Ok(())
}

#[tokio::test]
async fn e2e_create_then_fetch_returns_payload() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();

    let (status, created) = post(&c, app.url("/states"), json!({"name": "California", "motto": "Eureka"})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);
    for key in ["id", "created_at", "updated_at"] {
        assert!(created[key].is_string(), "{key}");
    }
    assert_eq!(created["motto"], "Eureka");

    let (status, fetched) = get(&c, app.url(&format!("/states/{}", id_of(&created)))).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) = get(&c, app.url("/states")).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(all, json!([created]));
    Ok(())
}

#[tokio::test]
async fn e2e_create_validation_order() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();
    let g = seed(&app, &c).await?;

    let (status, body) = post(&c, app.url("/states"), json!({})).await?;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing name"}));

    let res = c.post(app.url("/states")).body("name=Ohio").send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not a JSON"}));

    // parent is checked before the payload
    let res = c.post(app.url("/states/nope/cities")).body("garbage").send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let (status, body) = post(&c, app.url("/users"), json!({"password": "x"})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing email"})));
    let (status, body) = post(&c, app.url("/users"), json!({"email": "a@b.c"})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing password"})));

    let places = app.url(&format!("/cities/{}/places", g.city));
    let (status, body) = post(&c, places.clone(), json!({"user_id": g.user})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing name"})));
    let (status, body) = post(&c, places.clone(), json!({"name": "Hut"})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing user_id"})));
    let (status, _) = post(&c, places, json!({"name": "Hut", "user_id": "ghost"})).await?;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);

    let reviews = app.url(&format!("/places/{}/reviews", g.place));
    let (status, body) = post(&c, reviews.clone(), json!({"user_id": g.user})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing text"})));
    let (status, body) = post(&c, reviews.clone(), json!({"text": "ok"})).await?;
    assert_eq!((status, body), (HttpStatusCode::BAD_REQUEST, json!({"error": "Missing user_id"})));
    let (status, _) = post(&c, reviews, json!({"text": "ok", "user_id": "ghost"})).await?;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_update_ignores_immutable_fields_and_keeps_unknown() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();
    let g = seed(&app, &c).await?;

    let url = app.url(&format!("/places/{}", g.place));
    let res = c
        .put(&url)
        .json(&json!({"id": "forged", "city_id": "elsewhere", "name": "Big Loft", "pets": true}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], g.place.as_str());
    assert_eq!(body["city_id"], g.city.as_str());
    assert_eq!(body["name"], "Big Loft");
    assert_eq!(body["pets"], true);
    assert_eq!(body["number_rooms"], 2);

    let (_, fetched) = get(&c, url.clone()).await?;
    assert_eq!(fetched, body);

    let res = c.put(app.url(&format!("/users/{}", g.user))).json(&json!({"email": "new@hbnb.io", "first_name": "Ada"})).send().await?;
    let user = res.json::<Value>().await?;
    assert_eq!(user["email"], "host@hbnb.io");
    assert_eq!(user["first_name"], "Ada");

    // 404 wins over a bad payload
    let res = c.put(app.url("/states/nope")).body("garbage").send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.put(app.url(&format!("/states/{}", g.state))).body("garbage").send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_cascades_and_nested_access_404s() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();
    let g = seed(&app, &c).await?;

    let res = c.delete(app.url(&format!("/states/{}", g.state))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({}));

    for path in [
        format!("/states/{}", g.state),
        format!("/states/{}/cities", g.state),
        format!("/cities/{}", g.city),
        format!("/cities/{}/places", g.city),
        format!("/places/{}", g.place),
        format!("/places/{}/reviews", g.place),
        format!("/reviews/{}", g.review),
    ] {
        let (status, body) = get(&c, app.url(&path)).await?;
        assert_eq!(status, HttpStatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, json!({"error": "Not found"}));
    }

    let (status, _) = get(&c, app.url(&format!("/users/{}", g.user))).await?;
    assert_eq!(status, HttpStatusCode::OK);
    let res = c.delete(app.url(&format!("/states/{}", g.state))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_place_amenity_links() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();
    let g = seed(&app, &c).await?;
    let link = app.url(&format!("/places/{}/amenities/{}", g.place, g.amenity));

    let (status, linked) = get(&c, app.url(&format!("/places/{}/amenities", g.place))).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(linked.as_array().map(Vec::len), Some(1));
    assert_eq!(linked[0]["name"], "Wifi");

    let res = c.post(&link).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.delete(&link).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(&link).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.post(app.url(&format!("/places/{}/amenities/nope", g.place))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_places_search() -> anyhow::Result<()> {
    let app = start_memory_server().await?;
    let c = client();
    let g = seed(&app, &c).await?;
    let (_, nevada) = post(&c, app.url("/states"), json!({"name": "Nevada"})).await?;
    let (_, reno) = post(&c, app.url(&format!("/states/{}/cities", id_of(&nevada))), json!({"name": "Reno"})).await?;
    let (_, cabin) = post(
        &c,
        app.url(&format!("/cities/{}/places", id_of(&reno))),
        json!({"name": "Cabin", "user_id": g.user}),
    )
    .await?;

    let (status, everything) = post(&c, app.url("/places_search"), json!({})).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(everything.as_array().map(Vec::len), Some(2));
    let (_, listed) = get(&c, app.url(&format!("/cities/{}/places", g.city))).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    // state and city overlap: the loft appears once
    let (_, found) = post(
        &c,
        app.url("/places_search"),
        json!({"states": [g.state], "cities": [g.city]}),
    )
    .await?;
    let found = found.as_array().cloned().unwrap_or_default();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], g.place.as_str());
    assert!(found[0].get("amenity_ids").is_none());

    let (_, found) = post(&c, app.url("/places_search"), json!({"amenities": [g.amenity]})).await?;
    assert_eq!(found.as_array().map(|a| a.iter().map(id_of).collect::<Vec<_>>()), Some(vec![g.place.clone()]));

    let (_, found) = post(&c, app.url("/places_search"), json!({"cities": [id_of(&reno)], "amenities": [g.amenity]})).await?;
    assert_eq!(found, json!([]));
    assert_ne!(id_of(&cabin), g.place);

    let res = c.post(app.url("/places_search")).body("states").send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not a JSON"}));
    Ok(())
}

#[tokio::test]
async fn e2e_file_storage_survives_restart() -> anyhow::Result<()> {
    let path = format!("target/test-data/{}/file.json", Uuid::new_v4());
    let c = client();

    let app = start_server(StorageEngine::new(Arc::new(FileBackend::new(&path)))).await?;
    let (status, created) = post(&c, app.url("/amenities"), json!({"name": "Pool"})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);

    // a second server over the same file sees the saved record
    let app = start_server(StorageEngine::new(Arc::new(FileBackend::new(&path)))).await?;
    let (status, fetched) = get(&c, app.url(&format!("/amenities/{}", id_of(&created)))).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(fetched, created);

    let raw: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(raw[format!("Amenity.{}", id_of(&created))]["__class__"], "Amenity");
    Ok(())
}
