use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use fleet_manager::config::EnvironmentConfig;
use fleet_manager::database::seed_sample_data;
use fleet_manager::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestResponse {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn json(&self) -> &Value {
        &self.body
    }
}

impl TestApp {
    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn post_empty(&self, uri: &str) -> TestResponse {
        self.request(Method::POST, uri, None).await
    }

    async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    async fn patch_empty(&self, uri: &str) -> TestResponse {
        self.request(Method::PATCH, uri, None).await
    }

    async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

/// App vacía sobre almacenamiento en memoria
async fn create_test_app() -> TestApp {
    let state = AppState::in_memory(EnvironmentConfig::default());
    TestApp {
        router: create_app(state),
    }
}

/// App con la flota de ejemplo cargada
async fn create_seeded_app() -> TestApp {
    let state = AppState::in_memory(EnvironmentConfig::default());
    seed_sample_data(state.storage.as_ref()).await.unwrap();
    TestApp {
        router: create_app(state),
    }
}

fn vehicle_body(plate: &str) -> Value {
    json!({
        "plate": plate,
        "make": "Renault",
        "model": "Kangoo",
        "year": 2021,
        "type": "utilitaire",
        "mileage": 10000
    })
}

fn part_body(reference: &str) -> Value {
    json!({
        "name": "Filtre à air",
        "reference": reference,
        "category": "filtres",
        "stock": 12,
        "unitPrice": 1800
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
    assert_eq!(response.json()["storage"], "memory");
}

#[tokio::test]
async fn test_vehicle_crud_flow() {
    let app = create_test_app().await;

    let created = app.post("/api/vehicles", vehicle_body(" gh-404-ab ")).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json()["success"], true);
    let vehicle = &created.json()["data"];
    assert_eq!(vehicle["plate"], "GH-404-AB");
    assert_eq!(vehicle["status"], "operational");
    assert_eq!(vehicle["type"], "utilitaire");
    let id = vehicle["id"].as_i64().unwrap();

    let detail = app.get(&format!("/api/vehicles/{}", id)).await;
    assert_eq!(detail.status_code(), StatusCode::OK);
    assert_eq!(detail.json()["plate"], "GH-404-AB");
    assert_eq!(detail.json()["alerts"], json!([]));
    assert_eq!(detail.json()["lastMaintenance"], Value::Null);

    let updated = app
        .patch(&format!("/api/vehicles/{}", id), json!({ "mileage": 250000 }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    assert_eq!(updated.json()["data"]["mileage"], 250000);
    assert_eq!(updated.json()["data"]["model"], "Kangoo");

    let list = app.get("/api/vehicles?search=kangoo").await;
    assert_eq!(list.json().as_array().unwrap().len(), 1);
    let none = app.get("/api/vehicles?status=in_repair").await;
    assert_eq!(none.json().as_array().unwrap().len(), 0);

    let deleted = app.delete(&format!("/api/vehicles/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(app.get(&format!("/api/vehicles/{}", id)).await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&format!("/api/vehicles/{}", id)).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_plate_is_conflict() {
    let app = create_test_app().await;
    app.post("/api/vehicles", vehicle_body("AB-123-CD")).await;

    let response = app.post("/api/vehicles", vehicle_body("ab-123-cd")).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json()["code"], "CONFLICT");
}

#[tokio::test]
async fn test_invalid_vehicle_is_rejected() {
    let app = create_test_app().await;
    let mut body = vehicle_body("AB-123-CD");
    body["year"] = json!(1800);
    body["make"] = json!("   ");

    let response = app.post("/api/vehicles", body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = create_test_app().await;

    assert_eq!(app.get("/api/vehicles/99").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/parts/99").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/maintenance/99").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        app.patch("/api/parts/99", json!({ "stock": 1 })).await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.patch_empty("/api/alerts/99/read").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.post_empty("/api/vehicles/99/validate").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_vehicle_leaves_dangling_children() {
    let app = create_test_app().await;
    let vehicle = app.post("/api/vehicles", vehicle_body("AB-123-CD")).await;
    let vehicle_id = vehicle.json()["data"]["id"].as_i64().unwrap();

    let alert = app
        .post(
            "/api/alerts",
            json!({ "vehicleId": vehicle_id, "type": "overdue", "message": "Contrôle expiré", "priority": "urgent" }),
        )
        .await;
    assert_eq!(alert.status_code(), StatusCode::CREATED);

    let maintenance = app
        .post(
            "/api/maintenance",
            json!({
                "vehicleId": vehicle_id,
                "type": "vidange",
                "description": "Vidange moteur",
                "cost": 6500,
                "duration": 90,
                "technician": "J. Dubois"
            }),
        )
        .await;
    assert_eq!(maintenance.status_code(), StatusCode::CREATED);
    let maintenance_id = maintenance.json()["data"]["id"].as_i64().unwrap();

    app.delete(&format!("/api/vehicles/{}", vehicle_id)).await;

    let alerts = app.get("/api/alerts").await;
    assert_eq!(alerts.json()[0]["vehicleId"], vehicle_id);

    let history = app.get(&format!("/api/vehicles/{}/maintenance", vehicle_id)).await;
    assert_eq!(history.json().as_array().unwrap().len(), 1);

    let record = app.get(&format!("/api/maintenance/{}", maintenance_id)).await;
    assert_eq!(record.status_code(), StatusCode::OK);
    assert_eq!(record.json()["vehicleId"], vehicle_id);
    assert_eq!(record.json()["vehicle"], Value::Null);
}

#[tokio::test]
async fn test_children_need_existing_vehicle() {
    let app = create_test_app().await;

    let alert = app
        .post("/api/alerts", json!({ "vehicleId": 42, "type": "overdue", "message": "x" }))
        .await;
    assert_eq!(alert.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(alert.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_mark_alert_read_is_idempotent() {
    let app = create_seeded_app().await;

    let first = app.patch_empty("/api/alerts/1/read").await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let second = app.patch_empty("/api/alerts/1/read").await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json()["success"], true);

    let unread = app.get("/api/alerts?unread=true").await;
    let unread = unread.json().as_array().unwrap();
    assert_eq!(unread.len(), 2);
    assert!(unread.iter().all(|a| a["isRead"] == false));

    assert_eq!(app.delete("/api/alerts/1").await.status_code(), StatusCode::OK);
    assert_eq!(app.delete("/api/alerts/1").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parts_have_derived_status() {
    let app = create_seeded_app().await;

    let low = app.get("/api/parts?status=low_stock").await;
    let low = low.json().as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["reference"], "BRK-002-F");

    let out = app.get("/api/parts?status=out_of_stock").await;
    assert_eq!(out.json()[0]["reference"], "BAT-003-70");

    let filters = app.get("/api/parts?category=filtres").await;
    assert_eq!(filters.json().as_array().unwrap().len(), 1);

    // Sin minStock explícito se usa 5
    let created = app.post("/api/parts", part_body("air-010-k")).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json()["data"]["minStock"], 5);
    assert_eq!(created.json()["data"]["reference"], "AIR-010-K");

    let duplicate = app.post("/api/parts", part_body("AIR-010-K")).await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    let id = created.json()["data"]["id"].as_i64().unwrap();
    app.patch(&format!("/api/parts/{}", id), json!({ "stock": 0 })).await;
    let part = app.get(&format!("/api/parts/{}", id)).await;
    assert_eq!(part.json()["status"], "out_of_stock");
}

#[tokio::test]
async fn test_dashboard_stats_on_sample_fleet() {
    let app = create_seeded_app().await;
    let response = app.get("/api/dashboard/stats").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let stats = response.json();
    assert_eq!(stats["totalVehicles"], 3);
    assert_eq!(stats["operational"], 1);
    assert_eq!(stats["maintenanceDue"], 1);
    assert_eq!(stats["inRepair"], 1);
    assert_eq!(stats["totalParts"], 4);
    assert_eq!(stats["partsInStock"], 2);
    assert_eq!(stats["partsLowStock"], 1);
    assert_eq!(stats["partsOutOfStock"], 1);
    assert_eq!(stats["unreadAlerts"], 3);
}

#[tokio::test]
async fn test_dashboard_stats_on_empty_store() {
    let app = create_test_app().await;
    let stats = app.get("/api/dashboard/stats").await;
    assert_eq!(stats.json()["totalVehicles"], 0);
    assert_eq!(stats.json()["unreadAlerts"], 0);
}

#[tokio::test]
async fn test_validate_all_is_idempotent() {
    let app = create_seeded_app().await;

    let first = app.post_empty("/api/vehicles/validate-all").await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(first.json()["data"]["validated"], 3);
    assert_eq!(first.json()["data"]["changed"], 3);

    let statuses = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|v| v["status"].as_str().unwrap().to_string())
            .collect()
    };

    let after_first = app.get("/api/vehicles").await;
    // Vidange vencida, alerta urgente sin leer, alerta alta sin leer
    assert_eq!(
        statuses(after_first.json()),
        vec!["maintenance_due", "in_repair", "maintenance_due"]
    );

    let second = app.post_empty("/api/vehicles/validate-all").await;
    assert_eq!(second.json()["data"]["changed"], 0);
    let after_second = app.get("/api/vehicles").await;
    assert_eq!(statuses(after_first.json()), statuses(after_second.json()));
}

#[tokio::test]
async fn test_validate_one_restores_clean_vehicle() {
    let app = create_test_app().await;
    let mut body = vehicle_body("AB-123-CD");
    body["status"] = json!("in_repair");
    let created = app.post("/api/vehicles", body).await;
    let id = created.json()["data"]["id"].as_i64().unwrap();

    let response = app.post_empty(&format!("/api/vehicles/{}/validate", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let outcome = &response.json()["data"];
    assert_eq!(outcome["previousStatus"], "in_repair");
    assert_eq!(outcome["changed"], true);
    assert_eq!(outcome["validation"]["status"], "operational");

    let vehicle = app.get(&format!("/api/vehicles/{}", id)).await;
    assert_eq!(vehicle.json()["status"], "operational");
}

#[tokio::test]
async fn test_validate_one_flags_high_mileage() {
    let app = create_test_app().await;
    let mut body = vehicle_body("AB-123-CD");
    body["mileage"] = json!(250000);
    let created = app.post("/api/vehicles", body).await;
    let id = created.json()["data"]["id"].as_i64().unwrap();

    let response = app.post_empty(&format!("/api/vehicles/{}/validate", id)).await;
    assert_eq!(response.json()["data"]["validation"]["status"], "maintenance_due");
}

#[tokio::test]
async fn test_maintenance_with_parts_used() {
    let app = create_test_app().await;
    let vehicle = app.post("/api/vehicles", vehicle_body("AB-123-CD")).await;
    let vehicle_id = vehicle.json()["data"]["id"].as_i64().unwrap();
    let part = app.post("/api/parts", part_body("AIR-010-K")).await;
    let part_id = part.json()["data"]["id"].as_i64().unwrap();

    let body = json!({
        "vehicleId": vehicle_id,
        "type": "reparation",
        "description": "Remplacement filtre à air",
        "cost": 4200,
        "duration": 45,
        "technician": "M. Martin",
        "completedAt": "2025-03-10T09:00:00Z",
        "partsUsed": [{ "partId": part_id, "quantity": 2 }]
    });
    let created = app.post("/api/maintenance", body).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let record = &created.json()["data"];
    assert_eq!(record["type"], "reparation");
    assert_eq!(record["vehicle"]["plate"], "AB-123-CD");
    assert_eq!(record["partsUsed"][0]["quantity"], 2);
    assert_eq!(record["partsUsed"][0]["part"]["reference"], "AIR-010-K");
    let id = record["id"].as_i64().unwrap();

    let added = app
        .post(&format!("/api/maintenance/{}/parts", id), json!({ "partId": part_id }))
        .await;
    assert_eq!(added.status_code(), StatusCode::CREATED);
    assert_eq!(added.json()["data"]["quantity"], 1);

    let parts = app.get(&format!("/api/maintenance/{}/parts", id)).await;
    assert_eq!(parts.json().as_array().unwrap().len(), 2);

    let list = app.get("/api/maintenance").await;
    assert_eq!(list.json().as_array().unwrap().len(), 1);

    let detail = app.get(&format!("/api/vehicles/{}", vehicle_id)).await;
    assert_eq!(detail.json()["lastMaintenance"]["id"], id);
}

#[tokio::test]
async fn test_maintenance_with_unknown_part_writes_nothing() {
    let app = create_test_app().await;
    let vehicle = app.post("/api/vehicles", vehicle_body("AB-123-CD")).await;
    let vehicle_id = vehicle.json()["data"]["id"].as_i64().unwrap();

    let body = json!({
        "vehicleId": vehicle_id,
        "type": "reparation",
        "description": "Pièce inconnue",
        "cost": 100,
        "duration": 10,
        "technician": "M. Martin",
        "partsUsed": [{ "partId": 77, "quantity": 1 }]
    });
    let response = app.post("/api/maintenance", body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let list = app.get("/api/maintenance").await;
    assert_eq!(list.json(), &json!([]));
}

#[tokio::test]
async fn test_out_of_range_maintenance_dates() {
    let app = create_test_app().await;
    let vehicle = app.post("/api/vehicles", vehicle_body("AB-123-CD")).await;
    let vehicle_id = vehicle.json()["data"]["id"].as_i64().unwrap();

    let mut body = json!({
        "vehicleId": vehicle_id,
        "type": "vidange",
        "description": "Vidange moteur",
        "cost": 6500,
        "duration": 90,
        "technician": "J. Dubois",
        "completedAt": "+262142-12-01T00:00:00Z"
    });
    let rejected = app.post("/api/maintenance", body.clone()).await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(rejected.json()["code"], "VALIDATION_ERROR");

    // Última fecha aceptada: el intervalo se suma sin desbordar
    body["completedAt"] = json!("9999-12-31T00:00:00Z");
    let created = app.post("/api/maintenance", body).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let validated = app.post_empty(&format!("/api/vehicles/{}/validate", vehicle_id)).await;
    assert_eq!(validated.status_code(), StatusCode::OK);
    assert_eq!(validated.json()["data"]["validation"]["status"], "operational");

    let all = app.post_empty("/api/vehicles/validate-all").await;
    assert_eq!(all.status_code(), StatusCode::OK);

    let chat = app
        .post("/api/chat/query", json!({ "action": "schedule-maintenance" }))
        .await;
    assert_eq!(chat.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let app = create_test_app().await;

    let unknown_action = app.post("/api/chat/query", json!({ "action": "dance" })).await;
    assert_eq!(unknown_action.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_action.json()["code"], "BAD_REQUEST");

    let missing_fields = app.post("/api/vehicles", json!({ "plate": "AB-123-CD" })).await;
    assert_eq!(missing_fields.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing_fields.json()["error"], "Bad Request");

    let no_body = app.post_empty("/api/parts").await;
    assert_eq!(no_body.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(no_body.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_chat_actions_and_messages() {
    let app = create_seeded_app().await;

    let alerts = app.post("/api/chat/query", json!({ "action": "maintenance-alerts" })).await;
    assert_eq!(alerts.status_code(), StatusCode::OK);
    let text = alerts.json()["response"].as_str().unwrap();
    assert!(text.contains("[URGENT]"));
    assert!(text.contains("XYZ-789-FR"));

    let parts = app
        .post("/api/chat/query", json!({ "message": "Quel est le stock des pièces ?" }))
        .await;
    assert!(parts.json()["response"].as_str().unwrap().contains("Inventaire"));

    let help = app.post("/api/chat/query", json!({ "message": "bonjour" })).await;
    assert!(help.json()["response"].as_str().unwrap().contains("Je peux vous renseigner"));
}

#[tokio::test]
async fn test_empty_chat_query_is_rejected() {
    let app = create_test_app().await;

    let response = app.post("/api/chat/query", json!({ "message": "   " })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.post("/api/chat/query", json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
