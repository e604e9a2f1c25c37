use std::str::FromStr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use battery_rotation::config::environment::EnvironmentConfig;
use battery_rotation::models::{Battery, BatteryState, NewBattery, NewVehicle, Vehicle, VehicleState};
use battery_rotation::repositories::{FleetStore, MemoryFleetStore};
use battery_rotation::utils::jwt::{generate_token, JwtConfig};
use battery_rotation::{create_app_router, AppState};

struct TestApp {
    router: Router,
    store: Arc<MemoryFleetStore>,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let config = EnvironmentConfig::default();
        let token = generate_token("operador-test", Some("dispatcher"), &JwtConfig::from(&config)).unwrap();
        let store = Arc::new(MemoryFleetStore::new());
        let router = create_app_router(AppState::new(store.clone(), config));
        Self { router, store, token }
    }

    async fn battery(&self, code: &str, state: BatteryState, total: i64, current: i64) -> Battery {
        self.store
            .register_battery(NewBattery {
                code: code.to_string(),
                total_capacity: Decimal::from(total),
                current_capacity: Decimal::from(current),
                state,
                last_maintenance_date: None,
            })
            .await
            .unwrap()
    }

    async fn vehicle(&self, code: &str, required: i64) -> Vehicle {
        self.store
            .register_vehicle(NewVehicle {
                code: code.to_string(),
                model: "Toyota 8FBE".to_string(),
                load_capacity: Decimal::from(1500),
                required_battery_capacity: Decimal::from(required),
                state: VehicleState::Operational,
            })
            .await
            .unwrap()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };
        self.call(builder.body(body).unwrap()).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn stored_battery(&self, id: i64) -> Battery {
        self.store.find_battery(id).await.unwrap().unwrap()
    }

    async fn stored_vehicle(&self, id: i64) -> Vehicle {
        self.store.find_vehicle(id).await.unwrap().unwrap()
    }
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = app.call(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_rejected() {
    let app = TestApp::new();

    let request = Request::builder().uri("/rotacion/planes").body(Body::empty()).unwrap();
    let (status, _) = app.call(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/rotacion/planes")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.call(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_suggestion_filters_and_orders_candidates() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let a = app.battery("BAT-A", BatteryState::Available, 150, 95).await;
    app.battery("BAT-B", BatteryState::Available, 150, 79).await;
    let c = app.battery("BAT-C", BatteryState::Available, 150, 120).await;
    app.battery("BAT-D", BatteryState::Charging, 150, 140).await;
    app.battery("BAT-E", BatteryState::Maintenance, 150, 150).await;
    let f = app.battery("BAT-F", BatteryState::Available, 150, 80).await;

    let (status, body) = app.get(&format!("/rotacion/sugerir-bateria/{}", vehicle.id)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["suggestedBatteryId"], c.id);
    assert_eq!(data["batteryCode"], "BAT-C");
    assert_eq!(decimal(&data["suggestedCapacity"]), Decimal::from(120));
    assert_eq!(decimal(&data["requiredCapacity"]), Decimal::from(100));
    assert!(data["rationale"].as_str().unwrap().contains("120"));

    let ids: Vec<i64> = data["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|candidate| candidate["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c.id, a.id, f.id]);

    // La sugerencia no reserva nada
    assert_eq!(app.stored_battery(c.id).await.state, BatteryState::Available);
}

#[tokio::test]
async fn test_suggestion_without_candidates_is_not_found() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    app.battery("BAT-LOW", BatteryState::Available, 150, 79).await;

    let (status, body) = app.get(&format!("/rotacion/sugerir-bateria/{}", vehicle.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_CANDIDATE");

    let (status, body) = app.get("/rotacion/sugerir-bateria/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_assign_creates_plan_and_moves_battery_to_in_use() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (status, body) = app
        .post(
            "/rotacion/asignar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let plan = &body["data"];
    assert_eq!(plan["planState"], "active");
    assert_eq!(plan["reason"], "Asignación por sugerencia del sistema.");
    assert_eq!(decimal(&plan["capacityAtAssignment"]), Decimal::from(95));
    assert_eq!(plan["battery"]["state"], "in_use");
    assert_eq!(plan["vehicle"]["assignedBatteryId"], battery.id);

    assert_eq!(app.stored_battery(battery.id).await.state, BatteryState::InUse);
    assert_eq!(app.stored_vehicle(vehicle.id).await.assigned_battery_id, Some(battery.id));
}

#[tokio::test]
async fn test_assign_charging_battery_conflicts_without_plan() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Charging, 150, 140).await;

    let (status, body) = app
        .post(
            "/rotacion/asignar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "reason": "turno noche" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["details"]["currentState"], "charging");

    let (_, plans) = app.get("/rotacion/planes").await;
    assert!(plans["data"].as_array().unwrap().is_empty());
    assert_eq!(app.stored_battery(battery.id).await.state, BatteryState::Charging);
    assert_eq!(app.stored_vehicle(vehicle.id).await.assigned_battery_id, None);
}

#[tokio::test]
async fn test_concurrent_assignments_admit_exactly_one() {
    let app = TestApp::new();
    let first = app.vehicle("MC-01", 100).await;
    let second = app.vehicle("MC-02", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (a, b) = futures::future::join(
        app.post(
            "/rotacion/asignar",
            json!({ "vehicleId": first.id, "batteryId": battery.id }),
        ),
        app.post(
            "/rotacion/asignar",
            json!({ "vehicleId": second.id, "batteryId": battery.id }),
        ),
    )
    .await;

    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let (_, plans) = app.get("/rotacion/planes").await;
    assert_eq!(plans["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_usage_start_on_busy_battery_has_no_side_effects() {
    let app = TestApp::new();
    let first = app.vehicle("MC-01", 100).await;
    let second = app.vehicle("MC-02", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (status, _) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": first.id, "batteryId": battery.id, "startCapacity": 95 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": second.id, "batteryId": battery.id, "startCapacity": 95 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["currentState"], "in_use");

    let (_, sessions) = app.get("/registros-uso").await;
    assert_eq!(sessions["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.stored_vehicle(second.id).await.assigned_battery_id, None);
    assert_eq!(app.stored_vehicle(first.id).await.assigned_battery_id, Some(battery.id));
}

#[tokio::test]
async fn test_usage_start_capacity_above_total_is_rejected() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (status, body) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 151 }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["startCapacity"].is_array());
    assert_eq!(app.stored_battery(battery.id).await.state, BatteryState::Available);
}

#[tokio::test]
async fn test_usage_finish_validation_keeps_session_open() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, started) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 80 }),
        )
        .await;
    let session_id = started["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &format!("/registros-uso/{}/finalizar", session_id),
            json!({ "endCapacity": 90, "hoursUsed": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["endCapacity"].is_array());

    let (status, body) = app.get(&format!("/registros-uso/{}", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["endTime"].is_null());
    assert_eq!(app.stored_battery(battery.id).await.state, BatteryState::InUse);
}

#[tokio::test]
async fn test_usage_finish_below_threshold_leaves_battery_charging() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, started) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 95 }),
        )
        .await;
    let session_id = started["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &format!("/registros-uso/{}/finalizar", session_id),
            json!({ "endCapacity": 15, "hoursUsed": "6.5", "closingNotes": "fin de turno" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(decimal(&data["consumedEstimate"]), Decimal::from(80));
    assert_eq!(data["closingNotes"], "fin de turno");
    assert_eq!(data["battery"]["state"], "charging");

    let stored = app.stored_battery(battery.id).await;
    assert_eq!(stored.state, BatteryState::Charging);
    assert_eq!(stored.current_capacity, Decimal::from(15));
    assert_eq!(app.stored_vehicle(vehicle.id).await.assigned_battery_id, None);

    // Un registro cerrado es inmutable
    let (status, body) = app
        .post(
            &format!("/registros-uso/{}/finalizar", session_id),
            json!({ "endCapacity": 10, "hoursUsed": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_FINALIZED");
}

#[tokio::test]
async fn test_usage_finish_at_threshold_leaves_battery_available() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, started) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 95 }),
        )
        .await;
    let session_id = started["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            &format!("/registros-uso/{}/finalizar", session_id),
            json!({ "endCapacity": 45, "hoursUsed": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app.stored_battery(battery.id).await;
    assert_eq!(stored.state, BatteryState::Available);
    assert_eq!(stored.current_capacity, Decimal::from(45));
}

#[tokio::test]
async fn test_charging_cycle_end_to_end() {
    let app = TestApp::new();
    let battery = app.battery("BAT-A", BatteryState::Available, 100, 50).await;

    let (status, started) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": battery.id, "startCapacity": 50, "chargerId": "CHG-03" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(started["data"]["battery"]["state"], "charging");
    let session_id = started["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &format!("/sesiones-carga/{}/finalizar", session_id),
            json!({ "endCapacity": 90 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(decimal(&data["capacityGained"]), Decimal::from(40));
    assert!(decimal(&data["hoursCharging"]) >= Decimal::ONE);
    assert_eq!(data["chargerId"], "CHG-03");

    let stored = app.stored_battery(battery.id).await;
    assert_eq!(stored.state, BatteryState::Available);
    assert_eq!(stored.current_capacity, Decimal::from(90));

    // Una sesión cerrada no se vuelve a cerrar
    let (status, body) = app
        .post(
            &format!("/sesiones-carga/{}/finalizar", session_id),
            json!({ "endCapacity": 95 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_FINALIZED");
    assert_eq!(app.stored_battery(battery.id).await.current_capacity, Decimal::from(90));
}

#[tokio::test]
async fn test_charging_rules() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let busy = app.battery("BAT-BUSY", BatteryState::Available, 150, 120).await;
    let idle = app.battery("BAT-IDLE", BatteryState::Available, 100, 50).await;

    app.post(
        "/rotacion/asignar",
        json!({ "vehicleId": vehicle.id, "batteryId": busy.id }),
    )
    .await;

    let (status, _) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": busy.id, "startCapacity": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, started) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": idle.id, "startCapacity": 50 }),
        )
        .await;
    let session_id = started["data"]["id"].as_i64().unwrap();

    // Solo una sesión de carga abierta por batería
    let (status, _) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": idle.id, "startCapacity": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for end in [101, 40] {
        let (status, body) = app
            .post(
                &format!("/sesiones-carga/{}/finalizar", session_id),
                json!({ "endCapacity": end }),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["details"]["endCapacity"].is_array());
    }

    assert_eq!(app.stored_battery(idle.id).await.state, BatteryState::Charging);
}

#[tokio::test]
async fn test_battery_left_charging_by_usage_accepts_a_charging_session() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, started) = app
        .post(
            "/registros-uso/iniciar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 95 }),
        )
        .await;
    let session_id = started["data"]["id"].as_i64().unwrap();
    app.post(
        &format!("/registros-uso/{}/finalizar", session_id),
        json!({ "endCapacity": 10, "hoursUsed": 8 }),
    )
    .await;

    let (status, _) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": battery.id, "startCapacity": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancel_plan_keeps_battery_and_vehicle_state() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, assigned) = app
        .post(
            "/rotacion/asignar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id }),
        )
        .await;
    let plan_id = assigned["data"]["id"].as_i64().unwrap();

    let (status, body) = app.send(Method::DELETE, &format!("/rotacion/planes/{}", plan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["planState"], "cancelled");
    let ended_at = body["data"]["endedAt"].clone();
    assert!(ended_at.is_string());

    assert_eq!(app.stored_battery(battery.id).await.state, BatteryState::InUse);
    assert_eq!(app.stored_vehicle(vehicle.id).await.assigned_battery_id, Some(battery.id));

    // Cancelar de nuevo no reescribe el histórico
    let (status, body) = app.send(Method::DELETE, &format!("/rotacion/planes/{}", plan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["endedAt"], ended_at);

    let (status, _) = app.send(Method::DELETE, "/rotacion/planes/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_and_invalid_bodies_are_unprocessable() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/registros-uso/iniciar")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"vehicleId\": "))
        .unwrap();
    let (status, _) = app.call(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .post(
            "/sesiones-carga/iniciar",
            json!({ "batteryId": 0, "startCapacity": -5, "chargerId": "x".repeat(51) }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("batteryId"));
    assert!(details.contains_key("startCapacity"));
    assert!(details.contains_key("chargerId"));
}

#[tokio::test]
async fn test_history_lists_newest_first_with_relations() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let first = app.battery("BAT-A", BatteryState::Available, 150, 95).await;
    let second = app.battery("BAT-B", BatteryState::Available, 150, 110).await;

    for battery in [&first, &second] {
        let (_, started) = app
            .post(
                "/registros-uso/iniciar",
                json!({ "vehicleId": vehicle.id, "batteryId": battery.id, "startCapacity": 90 }),
            )
            .await;
        let session_id = started["data"]["id"].as_i64().unwrap();
        app.post(
            &format!("/registros-uso/{}/finalizar", session_id),
            json!({ "endCapacity": 60, "hoursUsed": 2 }),
        )
        .await;
    }

    let (status, body) = app.get("/registros-uso").await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["batteryId"], second.id);
    assert_eq!(sessions[1]["batteryId"], first.id);
    assert_eq!(sessions[0]["vehicle"]["code"], "MC-01");
    assert_eq!(sessions[0]["battery"]["code"], "BAT-B");
}

#[tokio::test]
async fn test_non_numeric_path_ids_are_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/registros-uso/abc/finalizar",
            json!({ "endCapacity": 10, "hoursUsed": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/rotacion/sugerir-bateria/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app.send(Method::DELETE, "/rotacion/planes/x1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.get("/sesiones-carga/1.5").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_concurrent_cancellations_record_a_single_end() {
    let app = TestApp::new();
    let vehicle = app.vehicle("MC-01", 100).await;
    let battery = app.battery("BAT-A", BatteryState::Available, 150, 95).await;

    let (_, assigned) = app
        .post(
            "/rotacion/asignar",
            json!({ "vehicleId": vehicle.id, "batteryId": battery.id }),
        )
        .await;
    let uri = format!("/rotacion/planes/{}", assigned["data"]["id"].as_i64().unwrap());

    let (a, b) = futures::future::join(
        app.send(Method::DELETE, &uri, None),
        app.send(Method::DELETE, &uri, None),
    )
    .await;

    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.1["data"]["endedAt"], b.1["data"]["endedAt"]);
    assert_eq!(a.1["data"]["planState"], "cancelled");
}
