//! Seed plans and the sequential seed runner.
//!
//! A plan is an ordered list of [`SeedWrite`]s. [`demo_plan`] builds the demo
//! data set (tester applications, daily interactions, apps); [`load_plan`]
//! reads a plan from JSON. [`run`] encodes and writes each entry in order and
//! keeps going past failures, so one bad document never hides the rest.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::encoder::encode;
use crate::error::{DocseedError, Result};
use crate::store::DocumentStore;
use crate::timestamp::now_timestamp;
use crate::value::{Fields, Value};
use crate::wire::Document;

pub const TESTER_APPLICATIONS: &str = "tester_applications";
pub const DAILY_INTERACTIONS: &str = "daily_interactions";
pub const APPS: &str = "apps";

/// Id of the demo app every demo document points at.
pub const DEMO_APP_ID: &str = "eUOdv8wASX7RfSGMin7c";
const DEMO_PROVIDER_ID: &str = "provider_demo_123";
const DEMO_APP_NAME: &str = "BugCash Demo App";
const DEMO_APPLICATION_ID: &str = "app_001";

/// One document to write.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedWrite {
    pub collection: String,
    /// `None` lets the store assign an id.
    pub document_id: Option<String>,
    pub fields: Fields,
}

impl SeedWrite {
    pub fn new(collection: impl Into<String>, document_id: Option<String>, fields: Fields) -> Self {
        Self {
            collection: collection.into(),
            document_id,
            fields,
        }
    }
}

/// Builds the demo data set as of `now`.
///
/// Three tester applications (pending, approved, completed) with
/// store-assigned ids, two daily interactions keyed by date (today and
/// yesterday, UTC), and the demo app itself.
pub fn demo_plan(now: DateTime<Utc>) -> Vec<SeedWrite> {
    let mut plan = tester_applications(now);
    plan.extend(daily_interactions(now));
    plan.push(demo_app(now));
    plan
}

/// Parses a plan file: a JSON array of
/// `{"collection": "...", "documentId": "..."?, "fields": {...}}`.
pub fn load_plan(json: &str) -> Result<Vec<SeedWrite>> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    struct PlanEntry {
        collection: String,
        #[serde(default)]
        document_id: Option<String>,
        fields: serde_json::Map<String, serde_json::Value>,
    }

    let entries: Vec<PlanEntry> = serde_json::from_str(json)?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.collection.trim().is_empty() {
                return Err(DocseedError::Plan(format!(
                    "entry {}: collection must not be empty",
                    index
                )));
            }
            if matches!(entry.document_id.as_deref(), Some(id) if id.trim().is_empty()) {
                return Err(DocseedError::Plan(format!(
                    "entry {}: documentId must not be empty",
                    index
                )));
            }
            let fields = entry
                .fields
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect();
            Ok(SeedWrite::new(entry.collection, entry.document_id, fields))
        })
        .collect()
}

/// Result of one write.
#[derive(Debug)]
pub struct WriteOutcome {
    pub collection: String,
    pub document_id: Option<String>,
    pub result: Result<Document>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-write outcomes of a seed run, in plan order.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub outcomes: Vec<WriteOutcome>,
}

impl SeedReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Successful writes per collection. Collections with no success are
    /// absent.
    pub fn created_by_collection(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for outcome in self.outcomes.iter().filter(|o| o.is_ok()) {
            *counts.entry(outcome.collection.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Encodes and writes every entry of `plan` in order, one request at a time.
pub fn run(store: &dyn DocumentStore, plan: &[SeedWrite]) -> SeedReport {
    let mut report = SeedReport::default();

    for write in plan {
        let fields = encode(&write.fields);
        let result = store.write(&write.collection, write.document_id.as_deref(), &fields);

        match &result {
            Ok(doc) => info!(collection = %write.collection, id = doc.id(), "document written"),
            Err(e) => error!(
                collection = %write.collection,
                document_id = write.document_id.as_deref().unwrap_or("<auto>"),
                error = %e,
                "document write failed"
            ),
        }

        report.outcomes.push(WriteOutcome {
            collection: write.collection.clone(),
            document_id: write.document_id.clone(),
            result,
        });
    }

    report
}

/// `json!` object literals always convert to a map.
fn object(json: serde_json::Value) -> Fields {
    Value::from(json).into_fields().unwrap_or_default()
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn demo_requirements() -> serde_json::Value {
    json!([
        "일일 30분 이상 앱 사용",
        "피드백 작성 필수",
        "버그 발견 시 즉시 신고"
    ])
}

fn demo_mission_info() -> serde_json::Value {
    json!({
        "appName": DEMO_APP_NAME,
        "totalDays": 14,
        "dailyReward": 5000,
        "totalReward": 70000,
        "requirements": demo_requirements()
    })
}

fn tester_applications(now: DateTime<Utc>) -> Vec<SeedWrite> {
    let now = now_timestamp(now);

    let pending = json!({
        "appId": DEMO_APP_ID,
        "testerId": "CazdCJYsxGMxEOzXGTen3AY5Kom2",
        "providerId": DEMO_PROVIDER_ID,
        "status": "pending",
        "statusUpdatedAt": now,
        "statusUpdatedBy": "",
        "appliedAt": now,
        "approvedAt": null,
        "startedAt": null,
        "completedAt": null,
        "testerInfo": {
            "name": "김테스터",
            "email": "tester@example.com",
            "experience": "중급",
            "motivation": "앱 품질 향상에 기여하고 싶습니다.",
            "deviceModel": "SM-S926N",
            "deviceOS": "Android 15",
            "deviceVersion": "API 35"
        },
        "missionInfo": demo_mission_info(),
        "progress": {
            "currentDay": 0,
            "progressPercentage": 0.0,
            "todayCompleted": false,
            "bugsReported": 0,
            "feedbackSubmitted": 0,
            "totalPoints": 0
        }
    });

    let approved = json!({
        "appId": DEMO_APP_ID,
        "testerId": "active_tester_456",
        "providerId": DEMO_PROVIDER_ID,
        "status": "approved",
        "statusUpdatedAt": "2025-09-17T09:00:00Z",
        "statusUpdatedBy": DEMO_PROVIDER_ID,
        "appliedAt": "2025-09-17T05:00:00Z",
        "approvedAt": "2025-09-17T09:00:00Z",
        "startedAt": "2025-09-17T09:00:00Z",
        "completedAt": null,
        "testerInfo": {
            "name": "이활동",
            "email": "active@example.com",
            "experience": "고급",
            "motivation": "전문적인 QA 경험을 쌓고 싶습니다.",
            "deviceModel": "iPhone 15 Pro",
            "deviceOS": "iOS 17",
            "deviceVersion": "17.5.1"
        },
        "missionInfo": demo_mission_info(),
        "progress": {
            "currentDay": 3,
            "progressPercentage": 21.4,
            "todayCompleted": false,
            "bugsReported": 2,
            "feedbackSubmitted": 3,
            "totalPoints": 15000
        }
    });

    let completed = json!({
        "appId": DEMO_APP_ID,
        "testerId": "completed_tester_789",
        "providerId": DEMO_PROVIDER_ID,
        "status": "completed",
        "statusUpdatedAt": "2025-09-19T10:00:00Z",
        "statusUpdatedBy": DEMO_PROVIDER_ID,
        "appliedAt": "2025-09-05T05:00:00Z",
        "approvedAt": "2025-09-05T10:00:00Z",
        "startedAt": "2025-09-05T10:00:00Z",
        "completedAt": "2025-09-19T10:00:00Z",
        "testerInfo": {
            "name": "박완료",
            "email": "completed@example.com",
            "experience": "고급",
            "motivation": "앱 품질 향상에 성공적으로 기여했습니다.",
            "deviceModel": "Galaxy S24 Ultra",
            "deviceOS": "Android 14",
            "deviceVersion": "API 34"
        },
        "missionInfo": demo_mission_info(),
        "progress": {
            "currentDay": 14,
            "progressPercentage": 100.0,
            "todayCompleted": true,
            "bugsReported": 8,
            "feedbackSubmitted": 14,
            "totalPoints": 70000,
            "latestFeedback": "14일 테스트 완료, 전반적으로 만족스러운 앱입니다.",
            "averageRating": 4.8
        }
    });

    [pending, approved, completed]
        .into_iter()
        .map(|doc| SeedWrite::new(TESTER_APPLICATIONS, None, object(doc)))
        .collect()
}

fn daily_interactions(now: DateTime<Utc>) -> Vec<SeedWrite> {
    let today_date = now.date_naive();
    let today = day(today_date);
    let yesterday = day(today_date.pred_opt().unwrap_or(today_date));
    let now = now_timestamp(now);

    let pending = json!({
        "applicationId": DEMO_APPLICATION_ID,
        "date": today,
        "dayNumber": 3,
        "tester": {
            "submitted": false,
            "submittedAt": null,
            "feedback": "",
            "screenshots": [],
            "bugReports": [],
            "sessionDuration": 0,
            "appRating": null
        },
        "provider": {
            "reviewed": false,
            "reviewedAt": null,
            "approved": false,
            "pointsAwarded": 0,
            "providerComment": "",
            "needsImprovement": false
        },
        "status": "pending",
        "createdAt": now,
        "updatedAt": now
    });

    let approved = json!({
        "applicationId": DEMO_APPLICATION_ID,
        "date": yesterday,
        "dayNumber": 2,
        "tester": {
            "submitted": true,
            "submittedAt": "2025-09-18T14:00:00Z",
            "feedback": "앱이 전반적으로 잘 작동합니다. 로그인 속도가 빨라졌네요.",
            "screenshots": ["screenshot_001.jpg"],
            "bugReports": [],
            "sessionDuration": 35,
            "appRating": 4
        },
        "provider": {
            "reviewed": true,
            "reviewedAt": "2025-09-18T16:00:00Z",
            "approved": true,
            "pointsAwarded": 5000,
            "providerComment": "좋은 피드백 감사합니다.",
            "needsImprovement": false
        },
        "status": "approved",
        "createdAt": format!("{}T00:00:00Z", yesterday),
        "updatedAt": "2025-09-18T16:00:00Z"
    });

    vec![
        SeedWrite::new(
            DAILY_INTERACTIONS,
            Some(format!("{}_{}", DEMO_APPLICATION_ID, today)),
            object(pending),
        ),
        SeedWrite::new(
            DAILY_INTERACTIONS,
            Some(format!("{}_{}", DEMO_APPLICATION_ID, yesterday)),
            object(approved),
        ),
    ]
}

fn demo_app(now: DateTime<Utc>) -> SeedWrite {
    let app = json!({
        "appId": DEMO_APP_ID,
        "appName": DEMO_APP_NAME,
        "providerId": DEMO_PROVIDER_ID,
        "missionConfig": {
            "isActive": true,
            "maxTesters": 10,
            "currentTesters": 3,
            "testingPeriod": 14,
            "dailyReward": 5000,
            "requirements": demo_requirements()
        },
        "stats": {
            "totalApplications": 15,
            "pendingApplications": 2,
            "activeTesters": 3,
            "completedTesters": 10,
            "totalBugsFound": 25,
            "averageRating": 4.2
        },
        "createdAt": "2025-09-15T00:00:00Z",
        "updatedAt": now_timestamp(now)
    });

    SeedWrite::new(APPS, Some(DEMO_APP_ID.to_string()), object(app))
}
