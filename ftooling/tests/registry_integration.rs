use std::collections::HashSet;
use std::sync::Arc;

use flimit::{McpRateLimiter, RateLimitConfig};
use ftooling::prelude::*;
use ftooling::{McpToolDescriptor, ToolFilter};
use serde_json::{Map, Value, json};

async fn noop(_args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
    Ok(Value::Null)
}

async fn get_taste_profile(args: Map<String, Value>, ctx: ToolExecutionContext) -> ToolOutput {
    Ok(json!({
        "user_id": ctx.user_id.as_str(),
        "name": args["name"],
        "count": args.get("count").cloned().unwrap_or(json!(10)),
    }))
}

fn nutrition_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    ToolRegistration::new("dev.fcp.nutrition.get_taste_profile")
        .description("Returns the caller's taste profile")
        .category("nutrition")
        .register(
            &mut registry,
            &signature!(get_taste_profile(user_id: String, name: String, count: i64 = 10)),
            get_taste_profile,
        )
        .expect("taste profile registers");
    ToolRegistration::new("dev.fcp.recipes.search")
        .description("Searches saved recipes")
        .category("recipes")
        .register(
            &mut registry,
            &signature!(search(user_id: String, query: String, tags: Vec<String> = Vec::new())),
            noop,
        )
        .expect("search registers");
    ToolRegistration::new("dev.fcp.nutrition.log_meal")
        .description("Logs a meal")
        .category("nutrition")
        .requires_write(true)
        .dependency("db")
        .register(
            &mut registry,
            &signature!(log_meal(user_id: String, meal: String, db)),
            noop,
        )
        .expect("log_meal registers");
    ToolRegistration::new("dev.fcp.safety.recall_check")
        .description("Checks food recalls")
        .category("safety")
        .requires_admin(true)
        .register(
            &mut registry,
            &signature!(recall_check(user_id: String, item: Option<String>)),
            noop,
        )
        .expect("recall_check registers");

    registry
}

#[test]
fn second_registration_under_same_name_always_fails() {
    let mut registry = nutrition_registry();

    let error = ToolRegistration::new("dev.fcp.recipes.search")
        .description("a completely different tool")
        .category("other")
        .requires_admin(true)
        .schema(json!({"type": "object", "properties": {}, "required": []}))
        .register(&mut registry, &HandlerSignature::new("other"), noop)
        .map(|_| ())
        .expect_err("duplicate must fail");

    assert_eq!(
        error,
        RegistrationError::DuplicateTool {
            name: "dev.fcp.recipes.search".to_string()
        }
    );
    let kept = registry.get("dev.fcp.recipes.search").expect("original kept");
    assert_eq!(kept.category.as_deref(), Some("recipes"));
}

#[test]
fn derived_schemas_hide_user_id_and_dependencies() {
    let registry = nutrition_registry();

    let profile = registry
        .get("dev.fcp.nutrition.get_taste_profile")
        .expect("registered");
    assert_eq!(profile.schema["required"], json!(["name"]));
    assert!(profile.schema["properties"].get("user_id").is_none());

    let log_meal = registry.get("dev.fcp.nutrition.log_meal").expect("registered");
    assert!(log_meal.schema["properties"].get("db").is_none());
    assert_eq!(log_meal.required_parameters(), vec!["meal"]);

    let recall = registry
        .get("dev.fcp.safety.recall_check")
        .expect("registered");
    assert_eq!(recall.schema["properties"]["item"], json!({"type": "string"}));
    assert_eq!(recall.required_parameters(), vec!["item"]);
}

#[test]
fn protocol_export_is_sorted_and_uses_input_schema_key() {
    let mut registry = ToolRegistry::new();
    for name in ["zebra", "alpha", "beta"] {
        ToolRegistration::new(name)
            .register(&mut registry, &HandlerSignature::new(name), noop)
            .expect("registers");
    }

    let exported: Vec<McpToolDescriptor> = registry.get_mcp_tool_list();
    let names: Vec<&str> = exported.iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "zebra"]);

    let wire = serde_json::to_value(&exported[0]).expect("descriptor serializes");
    assert_eq!(
        wire,
        json!({
            "name": "alpha",
            "description": "",
            "inputSchema": {"type": "object", "properties": {}, "required": []}
        })
    );
}

#[test]
fn categories_are_sorted_and_unique() {
    let registry = nutrition_registry();
    assert_eq!(
        registry.get_categories(),
        vec!["nutrition", "recipes", "safety"]
    );
}

#[test]
fn lookups_and_filters() {
    let registry = nutrition_registry();

    assert!(registry.get("search").is_none());
    assert_eq!(
        registry
            .get_by_short_name("search")
            .expect("short name resolves")
            .name,
        "dev.fcp.recipes.search"
    );

    let writers = registry.list_tools(&ToolFilter::new().requires_write(true));
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].name, "dev.fcp.nutrition.log_meal");

    let nutrition_reads = registry.list_tools(
        &ToolFilter::new()
            .category("nutrition")
            .requires_write(false),
    );
    assert_eq!(nutrition_reads.len(), 1);
    assert_eq!(registry.list_tools(&ToolFilter::new()).len(), 4);

    let expected: HashSet<String> = [
        "dev.fcp.nutrition.get_taste_profile",
        "dev.fcp.recipes.search",
        "dev.fcp.nutrition.log_meal",
        "dev.fcp.safety.recall_check",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    assert_eq!(registry.get_all_names(), expected);
}

#[test]
fn clear_resets_every_index() {
    let mut registry = nutrition_registry();
    registry.clear();

    assert!(registry.is_empty());
    assert!(registry.get_by_short_name("search").is_none());
    assert!(registry.get_mcp_tool_list().is_empty());
    assert!(registry.get_categories().is_empty());
}

#[tokio::test]
async fn rate_limited_dispatch_end_to_end() {
    let limiter = Arc::new(McpRateLimiter::new(
        RateLimitConfig::new(100, 60)
            .expect("valid config")
            .with_tool_limit("dev.fcp.nutrition.get_taste_profile", 2),
    ));
    let runtime = RateLimitedRuntime::new(
        DefaultToolRuntime::new(Arc::new(nutrition_registry())),
        Arc::clone(&limiter),
    );

    let result = runtime
        .execute(
            ToolCall::new("c1", "get_taste_profile", json!({"name": "umami"})),
            ToolExecutionContext::new("user-42"),
        )
        .await
        .expect("first call is admitted");
    assert_eq!(
        result.output,
        json!({"user_id": "user-42", "name": "umami", "count": 10})
    );

    runtime
        .execute(
            ToolCall::new("c2", "get_taste_profile", json!({"name": "sour"})),
            ToolExecutionContext::new("user-42"),
        )
        .await
        .expect("second call is admitted");

    let error = runtime
        .execute(
            ToolCall::new(
                "c3",
                "dev.fcp.nutrition.get_taste_profile",
                json!({"name": "bitter"}),
            ),
            ToolExecutionContext::new("user-42"),
        )
        .await
        .expect_err("the full name shares the short name's budget");
    assert_eq!(error.kind, ToolErrorKind::RateLimited);
    let exceeded = error.rate_limit().expect("carries the rejection");
    assert_eq!(exceeded.tool_name, "dev.fcp.nutrition.get_taste_profile");
    assert_eq!(exceeded.limit, 2);
    assert_eq!(
        limiter.get_remaining("dev.fcp.nutrition.get_taste_profile"),
        0
    );
    assert_eq!(limiter.get_remaining("dev.fcp.recipes.search"), 100);
}
