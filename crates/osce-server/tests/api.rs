mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{start, test_state, Call};
use osce_cases::get_case;

#[tokio::test]
async fn health_and_directory_need_no_token() {
    let app = osce_server::app(test_state());

    let (status, body) = Call::new("GET", "/health").token(None).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = Call::new("GET", "/cases").token(None).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = Call::new("GET", "/zones").token(None).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 11);

    let (status, body) = Call::new("GET", "/stations").token(None).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "station-1");
}

#[tokio::test]
async fn case_detail_hides_replies() {
    let app = osce_server::app(test_state());

    let (status, body) = Call::new("GET", "/cases/pneumonia").send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "pneumonia");
    assert!(body.get("replies").is_none());

    let (status, _) = Call::new("GET", "/cases/gout").send(&app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_routes_require_bearer_token() {
    let app = osce_server::app(test_state());
    let (status, _) = Call::new("POST", "/session/start")
        .token(None)
        .json(json!({ "caseId": "pneumonia", "stationId": "station-1" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_role_header_is_rejected() {
    let app = osce_server::app(test_state());
    let (status, _) = Call::new("POST", "/session/start")
        .role("janitor")
        .json(json!({ "caseId": "pneumonia", "stationId": "station-1" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn start_rejects_unknown_case_and_station() {
    let app = osce_server::app(test_state());

    let (status, _) = Call::new("POST", "/session/start")
        .json(json!({ "caseId": "gout", "stationId": "station-1" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = Call::new("POST", "/session/start")
        .json(json!({ "caseId": "pneumonia", "stationId": "station-99" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn start_lands_in_history_taking() {
    let app = osce_server::app(test_state());
    let (status, body) = Call::new("POST", "/session/start")
        .json(json!({ "caseId": "pneumonia", "stationId": "station-1", "mode": "training" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "history_taking");

    let id = body["sessionId"].as_str().unwrap();
    let (status, snap) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["phase"], "history_taking");
    assert_eq!(snap["station_id"], "station-1");
    assert_eq!(snap["vitals"]["spo2"], 95);
}

#[tokio::test(start_paused = true)]
async fn message_waits_for_patient_reply() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, body) = Call::new("POST", format!("/session/{id}/message"))
        .json(json!({ "text": "When did it start?" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let case = get_case("pneumonia").unwrap();
    let reply = body["patientReply"].as_str().unwrap();
    assert!(
        case.replies().iter().any(|r| *r == reply),
        "unexpected reply: {reply}"
    );

    let (_, snap) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(snap["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn blank_message_is_bad_request() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, body) = Call::new("POST", format!("/session/{id}/message"))
        .json(json!({ "text": "   " }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test(start_paused = true)]
async fn second_question_while_reply_pending_is_429() {
    let state = test_state();
    let app = osce_server::app(state.clone());
    let id = start(&app, "training").await;

    let handle = state.sessions.get(id.parse().unwrap()).await.unwrap();
    handle.with_session(|s| s.ask("Any fever?")).await.unwrap();

    let (status, _) = Call::new("POST", format!("/session/{id}/message"))
        .json(json!({ "text": "Any cough?" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn deterioration_fires_after_a_minute() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    tokio::time::sleep(Duration::from_secs(61)).await;

    let (_, snap) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(snap["has_deteriorated"], true);
    assert_eq!(snap["vitals"]["spo2"], 88);
    assert!(snap["elapsed_seconds"].as_u64().unwrap() >= 60);
}

#[tokio::test(start_paused = true)]
async fn manual_deterioration_is_idempotent() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, body) = Call::new("POST", format!("/session/{id}/deteriorate"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(body["vitals"]["heart_rate_bpm"], 102);

    let (_, body) = Call::new("POST", format!("/session/{id}/deteriorate"))
        .send(&app)
        .await;
    assert_eq!(body["changed"], false);
}

#[tokio::test(start_paused = true)]
async fn exam_mode_cannot_go_back() {
    let app = osce_server::app(test_state());
    let id = start(&app, "exam").await;

    for expected in ["history_evaluation", "physical_exam"] {
        let (status, body) = Call::new("POST", format!("/session/{id}/advance"))
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], expected);
    }

    let (status, _) = Call::new("POST", format!("/session/{id}/back")).send(&app).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, snap) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(snap["phase"], "physical_exam");
    assert_eq!(snap["available_events"], json!(["advance_to_physical_evaluation"]));
}

#[tokio::test(start_paused = true)]
async fn examine_and_checklist_during_physical_exam() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, _) = Call::new("POST", format!("/session/{id}/examine"))
        .json(json!({ "zoneId": "chest_right" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for _ in 0..2 {
        Call::new("POST", format!("/session/{id}/advance")).send(&app).await;
    }

    let (status, body) = Call::new("POST", format!("/session/{id}/examine"))
        .json(json!({ "zoneId": "chest_right" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zoneLabel"], "Right Chest");
    assert_ne!(body["finding"], "Normal findings");

    let (status, body) = Call::new("POST", format!("/session/{id}/checklist/palpation"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["palpation"], true);

    let (status, _) = Call::new("POST", format!("/session/{id}/checklist/smelling"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn rubric_is_for_graders_only() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;
    Call::new("POST", format!("/session/{id}/advance")).send(&app).await;

    let rubric = json!({
        "communication": 2,
        "structure": 2,
        "safety": 2,
        "clinical_reasoning": 2,
        "professionalism": 2
    });

    let (status, _) = Call::new("PUT", format!("/session/{id}/rubric"))
        .json(rubric.clone())
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = Call::new("PUT", format!("/session/{id}/rubric"))
        .as_instructor()
        .json(rubric)
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = Call::new("PUT", format!("/session/{id}/rubric"))
        .as_instructor()
        .json(json!({ "communication": 3, "structure": 0, "safety": 0,
                      "clinical_reasoning": 0, "professionalism": 0 }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn other_students_cannot_reach_a_session() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, _) = Call::new("GET", format!("/session/{id}"))
        .token(Some("someone-else"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = Call::new("GET", format!("/session/{id}"))
        .as_instructor()
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn full_session_scores_and_counts_down() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    for q in [
        "What brings you in today?",
        "When did it start?",
        "Any other symptoms like fever or cough?",
        "Any past medical history?",
        "Do you take any medications or have allergies?",
    ] {
        let (status, _) = Call::new("POST", format!("/session/{id}/message"))
            .json(json!({ "text": q }))
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    for _ in 0..3 {
        Call::new("POST", format!("/session/{id}/advance")).send(&app).await;
    }

    let (status, _) = Call::new("PUT", format!("/session/{id}/evaluation"))
        .json(json!({
            "red_flag_recognized": true,
            "selected_diagnosis": "pneumonia",
            "diagnosis_confidence": 150,
            "diagnosis_rationale": "Fever, cough and crackles"
        }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = Call::new("POST", format!("/session/{id}/finish"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["score"].as_f64().unwrap() > 0.0);
    assert!(body["feedback"].is_string());

    let (status, _) = Call::new("POST", format!("/session/{id}/finish"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, snap) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(snap["countdown"], 10);
    assert_eq!(snap["evaluation"]["diagnosis_confidence"], 100);

    // The driver tears the session down and drops it once the countdown ends.
    tokio::time::sleep(Duration::from_secs(11)).await;
    let (status, _) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn return_now_closes_immediately() {
    let app = osce_server::app(test_state());
    let id = start(&app, "training").await;

    let (status, _) = Call::new("POST", format!("/session/{id}/return-now"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for _ in 0..3 {
        Call::new("POST", format!("/session/{id}/advance")).send(&app).await;
    }
    Call::new("POST", format!("/session/{id}/finish")).send(&app).await;

    let (status, _) = Call::new("POST", format!("/session/{id}/return-now"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = Call::new("GET", format!("/session/{id}")).send(&app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn delete_tears_down() {
    let state = test_state();
    let app = osce_server::app(state.clone());
    let id = start(&app, "training").await;
    let handle = state.sessions.get(id.parse().unwrap()).await.unwrap();

    let (status, _) = Call::new("DELETE", format!("/session/{id}")).send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.sessions.is_empty().await);

    let torn_down = handle.with_session(|s| (s.is_torn_down(), s.armed_timers())).await;
    assert_eq!(torn_down, (true, 0));

    let (status, _) = Call::new("DELETE", format!("/session/{id}")).send(&app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
