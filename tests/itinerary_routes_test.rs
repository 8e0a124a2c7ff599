mod common;

use actix_web::{http::header, test};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use common::{status_of, TestApp};
use tripcraft_api::models::user::UserRole;
use tripcraft_api::services::gemini_service::{AiError, PlanModel};

struct CannedModel(&'static str);

#[async_trait]
impl PlanModel for CannedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Ok(self.0.to_string())
    }
}

fn jaipur_trip() -> Value {
    json!({
        "city": "jaipur",
        "days": "3",
        "budget": "15000",
        "travelStyle": "Food & Culture",
        "accommodation": "Heritage Haveli",
        "pace": "Balanced",
        "transportMode": "Auto-rickshaw",
        "interests": ["Food", "History"]
    })
}

#[actix_rt::test]
async fn test_create_itinerary_with_fallback_plan() {
    let test_app = TestApp::new().await;
    test_app.seed(&["Jaipur"]).await;
    let (user, token) = test_app.user_with_token("asha@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(jaipur_trip())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], user.id);
    assert_eq!(body["city"], "Jaipur");
    assert_eq!(body["days"], 3);
    assert_eq!(body["budget"], 15000);
    assert_eq!(body["daily_budget"], 5000);
    assert_eq!(body["budget_breakdown"]["accommodation"], 1500);
    assert_eq!(body["budget_breakdown"]["food"], 2000);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["interests"], json!(["Food", "History"]));

    let plan = body["plan"].as_array().unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0]["title"], "Arrival in Jaipur");
    assert_eq!(plan[2]["title"], "Farewell to Jaipur");

    let day_plans = body["day_plans"].as_array().unwrap();
    assert_eq!(day_plans.len(), 3);
    assert_eq!(day_plans[1]["day_number"], 2);
    assert_eq!(day_plans[0]["morning"], plan[0]["morning"]);
}

#[actix_rt::test]
async fn test_create_itinerary_with_model_answer() {
    let test_app = TestApp::with_model(Arc::new(CannedModel(
        r#"```json
[{"day":1,"title":"Pink City","morning":"Amber Fort","afternoon":"City Palace","evening":"Chokhi Dhani","activities":["Amber Fort"],"approx_cost":4800},
 {"day":2,"title":"Bazaars","morning":"Hawa Mahal","afternoon":"Johari Bazaar","evening":"LMB","activities":[]}]
```"#,
    )))
    .await;
    test_app.seed(&["Jaipur"]).await;
    let (_, token) = test_app.user_with_token("asha@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    let mut trip = jaipur_trip();
    trip["days"] = json!(2);
    trip["budget"] = json!(10000);

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(trip)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["source"], "ai");
    assert_eq!(body["plan"][0]["title"], "Pink City");
    assert_eq!(body["plan"][1]["approx_cost"], 5000);
    assert_eq!(body["day_plans"][1]["morning"], "Hawa Mahal");
}

#[actix_rt::test]
async fn test_unusable_model_answer_falls_back() {
    let test_app = TestApp::with_model(Arc::new(CannedModel("Sorry, I can't plan that."))).await;
    test_app.seed(&["Jaipur"]).await;
    let (_, token) = test_app.user_with_token("asha@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(jaipur_trip())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["plan"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_create_itinerary_validation() {
    let test_app = TestApp::new().await;
    test_app.seed(&["Jaipur"]).await;
    let (_, token) = test_app.user_with_token("asha@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    let invalid = [
        json!({ "city": "Jaipur", "days": 0, "budget": 1000 }),
        json!({ "city": "Jaipur", "days": 31, "budget": 1000 }),
        json!({ "city": "Jaipur", "days": 2, "budget": 0 }),
        json!({ "city": "", "days": 2, "budget": 1000 }),
        json!({ "city": "Jaipur", "days": "three", "budget": 1000 }),
        json!({ "city": "Jaipur", "budget": 1000 }),
    ];

    for body in invalid {
        let req = test::TestRequest::post()
            .uri("/api/itineraries")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "body {}", body);
    }

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({ "city": "Atlantis", "days": 2, "budget": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["detail"],
        "City not found in database. Please seed cities first."
    );
}

#[actix_rt::test]
async fn test_huge_budget_is_rejected() {
    let test_app = TestApp::new().await;
    test_app.seed(&["Jaipur"]).await;
    let (_, token) = test_app.user_with_token("asha@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    for budget in [json!("9223372036854775807"), json!("1e30"), json!(2_000_000_000_i64)] {
        let req = test::TestRequest::post()
            .uri("/api/itineraries")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({ "city": "Jaipur", "days": 1, "budget": budget }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "budget {}", budget);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Budget must not exceed 1000000000");
    }
}

#[actix_rt::test]
async fn test_itineraries_require_auth() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/itineraries").to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), 401);

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(jaipur_trip())
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), 401);
}

#[actix_rt::test]
async fn test_list_get_and_delete_are_scoped_to_owner() {
    let test_app = TestApp::new().await;
    test_app.seed(&["Jaipur", "Goa"]).await;
    let (_, owner) = test_app.user_with_token("owner@example.com", UserRole::User).await;
    let (_, other) = test_app.user_with_token("other@example.com", UserRole::User).await;
    let app = test::init_service(test_app.create_app()).await;

    let mut ids = Vec::new();
    for city in ["Jaipur", "Goa"] {
        let req = test::TestRequest::post()
            .uri("/api/itineraries")
            .insert_header((header::AUTHORIZATION, owner.clone()))
            .set_json(json!({ "city": city, "days": 2, "budget": 8000 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, owner.clone()))
        .to_request();
    let list: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["city"], "Goa");
    assert_eq!(list[0]["day_plans"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, other.clone()))
        .to_request();
    let list: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(list.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/itineraries/{}", ids[0]))
        .insert_header((header::AUTHORIZATION, other.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Not authorized to view this itinerary");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/itineraries/{}", ids[0]))
        .insert_header((header::AUTHORIZATION, other))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/itineraries/{}", ids[0]))
        .insert_header((header::AUTHORIZATION, owner.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/itineraries/{}", ids[0]))
        .insert_header((header::AUTHORIZATION, owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let (remaining_days,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM itinerary_days WHERE itinerary_id = ?")
            .bind(ids[0])
            .fetch_one(&test_app.pool)
            .await
            .unwrap();
    assert_eq!(remaining_days, 0);
}
