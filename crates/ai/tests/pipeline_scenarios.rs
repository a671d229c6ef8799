use serde_json::{Value, json};

use listingforge_ai::{ListingPipeline, ModelClient, ModelError, PipelineResult, PipelineStatus};

/// Replies with a fixed text.
struct StubReply(String);

impl StubReply {
    fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl ModelClient for StubReply {
    fn complete(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String, ModelError> {
        Ok(self.0.clone())
    }
}

/// Simulates a transport failure.
struct StubDown;

impl ModelClient for StubDown {
    fn complete(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String, ModelError> {
        Err(ModelError::transport("connection reset by peer"))
    }
}

const GOOD_REPLY: &str = r#"{
    "title": "Premium Coffee Maker for Home Baristas",
    "description": "Bring the coffee shop home. This premium coffee maker brews rich, aromatic coffee with a programmable timer so a warm cup is waiting when you wake up.",
    "features": ["Programmable 24-hour timer", "Thermal carafe keeps coffee hot", "Adjustable brew strength", "Easy-clean filter basket"],
    "keywords": "coffee maker, home barista, programmable coffee, thermal carafe"
}"#;

fn coffee_maker_input() -> Value {
    json!({
        "product": {
            "name": "Premium Coffee Maker",
            "price": 89.99,
            "category": "home_goods",
            "in_stock": true
        },
        "target_audience": "home baristas",
        "tone": "warm and inviting",
        "language": "English"
    })
}

#[test]
fn scenario_a_well_formed_reply_succeeds() {
    let result = ListingPipeline::new(StubReply::new(GOOD_REPLY)).run(&coffee_maker_input());

    assert_eq!(result.status(), PipelineStatus::Success);
    let report = result.to_json();
    assert_eq!(report["status"], json!("success"));
    assert_eq!(report["input"]["product"]["name"], json!("Premium Coffee Maker"));
    assert_eq!(report["input"]["product"]["brand"], Value::Null);
    assert_eq!(report["input"]["tone"], json!("warm and inviting"));
    assert_eq!(report["output"]["features"].as_array().unwrap().len(), 4);
    assert!(report.get("error").is_none());

    match result {
        PipelineResult::Success { input, output } => {
            assert_eq!(input.product().price(), 89.99);
            assert_eq!(output.title(), "Premium Coffee Maker for Home Baristas");
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn scenario_a_fenced_reply_also_succeeds() {
    let fenced = format!("```json\n{GOOD_REPLY}\n```");
    let result = ListingPipeline::new(StubReply::new(fenced)).run(&coffee_maker_input());
    assert!(result.is_success());
}

#[test]
fn scenario_b_negative_price_fails_input_validation() {
    let mut input = coffee_maker_input();
    input["product"]["price"] = json!(-5);

    let result = ListingPipeline::new(StubReply::new(GOOD_REPLY)).run(&input);

    assert_eq!(result.status(), PipelineStatus::InputValidationFailed);
    let report = result.to_json();
    assert_eq!(report["status"], json!("input_validation_failed"));
    let paths: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["product.price"]);
}

#[test]
fn scenario_c_non_json_reply_fails_output_validation_with_raw_text() {
    let result = ListingPipeline::new(StubReply::new("not json at all")).run(&coffee_maker_input());

    assert_eq!(result.status(), PipelineStatus::OutputValidationFailed);
    let report = result.to_json();
    assert_eq!(report["status"], json!("output_validation_failed"));
    assert_eq!(report["raw_response"], json!("not json at all"));
    assert!(report["error"].as_str().unwrap().contains("not valid JSON"));
}

#[test]
fn scenario_c_wrong_shape_reports_field_errors() {
    let reply = r#"{"title": "Coffee", "description": "Nice.", "features": [], "keywords": "coffee"}"#;
    let result = ListingPipeline::new(StubReply::new(reply)).run(&coffee_maker_input());

    assert_eq!(result.status(), PipelineStatus::OutputValidationFailed);
    let report = result.to_json();
    assert_eq!(report["raw_response"], json!(reply));
    assert_eq!(report["errors"].as_array().unwrap().len(), 4);
}

#[test]
fn scenario_d_transport_failure_is_reported() {
    let result = ListingPipeline::new(StubDown).run(&coffee_maker_input());

    assert_eq!(result.status(), PipelineStatus::ModelCallFailed);
    let report = result.to_json();
    assert_eq!(report["status"], json!("chatgpt_failed"));
    assert!(report["error"].as_str().unwrap().contains("connection reset by peer"));
    assert!(report.get("raw_response").is_none());
}

#[test]
fn runs_are_independent() {
    let pipeline = ListingPipeline::new(StubReply::new(GOOD_REPLY));
    let first = pipeline.run(&coffee_maker_input());
    let second = pipeline.run(&coffee_maker_input());
    assert_eq!(first, second);
}

#[test]
fn pipelines_can_run_on_separate_threads() {
    let pipeline = ListingPipeline::new(StubReply::new(GOOD_REPLY));
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.run(&coffee_maker_input()).is_success()))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}
