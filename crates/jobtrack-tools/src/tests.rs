//! Dispatcher tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use chrono::NaiveDate;
use jobtrack_core::{
  application::ApplicationStatus,
  store::{ApplicationQuery, TrackerStore},
};
use jobtrack_store_sqlite::SqliteStore;
use serde_json::{Value, json};

use crate::{Tool, ToolContext, ToolError, ToolOutput, catalog, dispatch};

fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 18).unwrap() }

async fn ctx() -> ToolContext<SqliteStore> {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  ToolContext::with_today(Arc::new(store), today())
}

async fn call(ctx: &ToolContext<SqliteStore>, name: &str, args: Value) -> ToolOutput {
  dispatch(ctx, name, Some(args)).await.expect("known tool")
}

async fn ok(ctx: &ToolContext<SqliteStore>, name: &str, args: Value) -> String {
  let out = call(ctx, name, args).await;
  assert!(!out.is_error, "{name} failed: {}", out.text);
  out.text
}

async fn err(ctx: &ToolContext<SqliteStore>, name: &str, args: Value) -> String {
  let out = call(ctx, name, args).await;
  assert!(out.is_error, "{name} unexpectedly succeeded: {}", out.text);
  out.text
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[test]
fn catalog_lists_every_tool_with_a_schema() {
  let tools = catalog();
  let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
  assert_eq!(names, [
    "add_job_application",
    "get_applications",
    "get_application",
    "update_application_status",
    "add_resume_version",
    "set_default_resume",
    "get_resume_content",
    "list_resumes",
    "get_application_stats",
  ]);
  for tool in &tools {
    assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
    assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
    assert!(!tool.description.is_empty());
  }

  let add = serde_json::to_value(&tools[0]).unwrap();
  assert_eq!(add["inputSchema"]["required"], json!(["company", "position"]));
}

#[test]
fn tool_names_parse_exactly() {
  assert_eq!("list_resumes".parse::<Tool>().unwrap(), Tool::ListResumes);
  assert!("List_Resumes".parse::<Tool>().is_err());
}

// ─── Dispatch failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tool_is_an_error_not_output() {
  let ctx = ctx().await;
  let result = dispatch(&ctx, "delete_everything", None).await;
  assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "delete_everything"));
}

#[tokio::test]
async fn malformed_arguments_are_rendered() {
  let ctx = ctx().await;
  let text = err(&ctx, "add_job_application", json!({ "company": "Google" })).await;
  assert!(text.contains("Invalid arguments"), "{text}");
  assert!(text.contains("position"), "{text}");

  let text = err(&ctx, "get_application", json!({ "id": "seven" })).await;
  assert!(text.contains("Invalid arguments"), "{text}");
}

#[tokio::test]
async fn missing_arguments_read_as_empty_object() {
  let ctx = ctx().await;
  let out = dispatch(&ctx, "list_resumes", None).await.unwrap();
  assert!(!out.is_error);
  let out = dispatch(&ctx, "get_applications", Some(Value::Null)).await.unwrap();
  assert!(!out.is_error);
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn added_application_defaults_and_filters() {
  let ctx = ctx().await;
  let text = ok(&ctx, "add_job_application", json!({
    "company": "Google",
    "position": "Senior Python Developer",
  }))
  .await;
  assert!(text.contains("✅ Added application #1"), "{text}");
  assert!(text.contains("Status: applied"), "{text}");
  assert!(text.contains("Applied: 2026-10-18"), "{text}");

  let stored = ctx.store.get_application(1).await.unwrap().unwrap();
  assert_eq!(stored.status, ApplicationStatus::Applied);
  assert_eq!(stored.applied_date, today());

  let applied = ok(&ctx, "get_applications", json!({ "status": "applied" })).await;
  assert!(applied.contains("Senior Python Developer"), "{applied}");

  let rejected = ok(&ctx, "get_applications", json!({ "status": "rejected" })).await;
  assert!(!rejected.contains("Senior Python Developer"), "{rejected}");
  assert!(rejected.contains("No applications found"), "{rejected}");
}

#[tokio::test]
async fn today_and_literal_date_store_the_same_value() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({
    "company": "A", "position": "X", "applied_date": "today",
  }))
  .await;
  ok(&ctx, "add_job_application", json!({
    "company": "B", "position": "Y", "applied_date": "2026-10-18",
  }))
  .await;

  let apps = ctx.store.get_applications(&ApplicationQuery::default()).await.unwrap();
  assert_eq!(apps.len(), 2);
  assert_eq!(apps[0].applied_date, apps[1].applied_date);
}

#[tokio::test]
async fn unparseable_date_leaves_store_untouched() {
  let ctx = ctx().await;
  let text = err(&ctx, "add_job_application", json!({
    "company": "Google", "position": "SRE", "applied_date": "sometime soon",
  }))
  .await;
  assert!(text.starts_with("❌ Invalid input"), "{text}");

  let apps = ctx.store.get_applications(&ApplicationQuery::default()).await.unwrap();
  assert!(apps.is_empty());
}

#[tokio::test]
async fn listing_renders_salary_and_count() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({
    "company": "Acme",
    "position": "Engineer",
    "salary_range": "$150k - $180k",
    "source": "LinkedIn",
  }))
  .await;
  let text = ok(&ctx, "get_applications", json!({ "company": "acm" })).await;
  assert!(text.starts_with("Found 1 application(s):"), "{text}");
  assert!(text.contains("Salary: $150,000 – $180,000"), "{text}");
  assert!(text.contains("Source: LinkedIn"), "{text}");
}

#[tokio::test]
async fn get_application_shows_detail_or_not_found() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({
    "company": "Acme", "position": "Engineer", "location": "Remote",
  }))
  .await;

  let text = ok(&ctx, "get_application", json!({ "application_id": 1 })).await;
  assert!(text.contains("**Engineer** at **Acme** (ID 1)"), "{text}");
  assert!(text.contains("Location: Remote"), "{text}");

  let missing = err(&ctx, "get_application", json!({ "id": 42 })).await;
  assert_eq!(missing, "❌ Application 42 not found");
}

#[tokio::test]
async fn status_update_appends_note() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({ "company": "Acme", "position": "Engineer" })).await;

  let text = ok(&ctx, "update_application_status", json!({
    "id": 1, "status": "Rejected", "note": "no callback",
  }))
  .await;
  assert!(text.contains("applied → rejected"), "{text}");
  assert!(text.contains("Note added: no callback"), "{text}");

  let app = ctx.store.get_application(1).await.unwrap().unwrap();
  assert_eq!(app.status, ApplicationStatus::Rejected);
  assert_eq!(app.notes.as_deref(), Some("[2026-10-18] rejected: no callback"));
}

#[tokio::test]
async fn status_update_on_missing_id_is_not_found() {
  let ctx = ctx().await;
  let text = err(&ctx, "update_application_status", json!({
    "application_id": 9, "new_status": "offer",
  }))
  .await;
  assert_eq!(text, "❌ Application 9 not found");
}

#[tokio::test]
async fn invalid_status_lists_allowed_values() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({ "company": "Acme", "position": "Engineer" })).await;
  let text = err(&ctx, "update_application_status", json!({ "id": 1, "status": "ghosted" })).await;
  assert!(text.contains("applied, interviewing, offered"), "{text}");
}

// ─── Resumes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_resume_is_a_conflict() {
  let ctx = ctx().await;
  ok(&ctx, "add_resume_version", json!({ "name": "backend", "content": "v1" })).await;
  let text = err(&ctx, "add_resume_version", json!({ "name": "backend", "content": "v2" })).await;
  assert!(text.contains("already exists"), "{text}");
  assert!(text.contains("Use a different name"), "{text}");

  let content = ok(&ctx, "get_resume_content", json!({ "name": "backend" })).await;
  assert!(content.ends_with("\n\nv1"), "{content}");
}

#[tokio::test]
async fn default_resume_is_linked_and_switchable() {
  let ctx = ctx().await;
  ok(&ctx, "add_resume_version", json!({
    "resume_name": "general", "content": "text", "set_as_default": true,
  }))
  .await;
  ok(&ctx, "add_resume_version", json!({ "name": "ml", "content": "text" })).await;

  let added = ok(&ctx, "add_job_application", json!({ "company": "A", "position": "X" })).await;
  assert!(added.contains("Resume: general"), "{added}");

  let text = ok(&ctx, "set_default_resume", json!({ "name": "ml" })).await;
  assert_eq!(text, "✅ 'ml' is now the default resume");

  let listing = ok(&ctx, "list_resumes", json!({})).await;
  assert!(listing.contains("**ml** ⭐ default"), "{listing}");
  assert!(!listing.contains("**general** ⭐"), "{listing}");
}

#[tokio::test]
async fn set_default_on_unknown_name_lists_choices() {
  let ctx = ctx().await;
  let empty = err(&ctx, "set_default_resume", json!({ "name": "nope" })).await;
  assert!(empty.contains("No resume versions have been added yet"), "{empty}");

  ok(&ctx, "add_resume_version", json!({ "name": "alpha", "content": "a" })).await;
  ok(&ctx, "add_resume_version", json!({ "name": "beta", "content": "b" })).await;
  let text = err(&ctx, "set_default_resume", json!({ "name": "gamma" })).await;
  assert!(text.starts_with("❌ Resume 'gamma' not found"), "{text}");
  assert!(text.contains("Available: alpha, beta"), "{text}");
}

#[tokio::test]
async fn unknown_resume_content_is_not_found() {
  let ctx = ctx().await;
  let text = err(&ctx, "get_resume_content", json!({ "name": "missing" })).await;
  assert_eq!(text, "❌ Resume 'missing' not found");
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_count_by_status() {
  let ctx = ctx().await;
  for company in ["Google", "Meta", "Apple"] {
    ok(&ctx, "add_job_application", json!({ "company": company, "position": "SWE" })).await;
  }
  ok(&ctx, "update_application_status", json!({ "id": 3, "status": "rejected" })).await;

  let text = ok(&ctx, "get_application_stats", json!({})).await;
  assert!(text.contains("(all time)"), "{text}");
  assert!(text.contains("Total: 3"), "{text}");
  assert!(text.contains("• applied: 2"), "{text}");
  assert!(text.contains("• rejected: 1"), "{text}");
  assert!(text.contains("• (none): 3"), "{text}");
}

#[tokio::test]
async fn stats_window_excludes_older_applications() {
  let ctx = ctx().await;
  ok(&ctx, "add_job_application", json!({
    "company": "Old", "position": "X", "applied_date": "2025-01-15",
  }))
  .await;
  ok(&ctx, "add_job_application", json!({ "company": "New", "position": "Y" })).await;

  let text = ok(&ctx, "get_application_stats", json!({ "window": "this_month" })).await;
  assert!(text.contains("this_month: 2026-10-01 to 2026-10-18"), "{text}");
  assert!(text.contains("Total: 1"), "{text}");
  assert!(text.contains("• New: 1"), "{text}");
  assert!(!text.contains("Old"), "{text}");
}

#[tokio::test]
async fn stats_reject_unknown_window() {
  let ctx = ctx().await;
  let text = err(&ctx, "get_application_stats", json!({ "window": "fortnight" })).await;
  assert!(text.contains("this_week"), "{text}");
}

#[tokio::test]
async fn stats_on_empty_store() {
  let ctx = ctx().await;
  let text = ok(&ctx, "get_application_stats", json!({ "window": "today" })).await;
  assert!(text.contains("Total: 0"), "{text}");
  assert!(text.contains("No applications recorded"), "{text}");
}
