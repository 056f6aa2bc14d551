//! Per-task fetch, normalization and ordered assembly of rows.

use std::sync::Arc;

use chrono::Local;
use log::{debug, warn};
use sdp_api::{Endpoint, SdpClient, SdpError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::extract::TaskIndex;
use crate::normalize::normalize_worklog;
use crate::row::NormalizedRow;

/// A task none of whose endpoints answered `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub task_id: String,
    /// HTTP status code, or the failure category when no response arrived.
    pub status: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Extract {
    pub rows: Vec<NormalizedRow>,
    pub skipped: Vec<SkippedTask>,
}

enum TaskOutcome {
    Rows(Vec<NormalizedRow>),
    Skipped(SkippedTask),
}

/// Fetches and normalizes worklogs for every task in `index`.
///
/// Rows come out in task order, then in the order the API listed them,
/// whatever `concurrency` is. A failing task is logged and skipped.
pub async fn collect_worklogs(client: &SdpClient, index: &TaskIndex, concurrency: usize) -> Extract {
    let jobs: Vec<(String, Vec<Endpoint>)> = index
        .tasks()
        .map(|task| (task.to_string(), index.endpoints_for(task)))
        .collect();

    let outcomes = if concurrency <= 1 {
        let mut outcomes = Vec::with_capacity(jobs.len());
        for (task_id, endpoints) in &jobs {
            outcomes.push(process_task(client, task_id, endpoints).await);
        }
        outcomes
    } else {
        process_concurrently(client, jobs, concurrency).await
    };

    let mut extract = Extract::default();
    for outcome in outcomes {
        match outcome {
            TaskOutcome::Rows(rows) => extract.rows.extend(rows),
            TaskOutcome::Skipped(skipped) => extract.skipped.push(skipped),
        }
    }
    extract
}

async fn process_concurrently(
    client: &SdpClient,
    jobs: Vec<(String, Vec<Endpoint>)>,
    concurrency: usize,
) -> Vec<TaskOutcome> {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut set = JoinSet::new();
    let total = jobs.len();

    for (position, (task_id, endpoints)) in jobs.into_iter().enumerate() {
        let client = client.clone();
        let permits = permits.clone();
        set.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let outcome = process_task(&client, &task_id, &endpoints).await;
            (position, outcome)
        });
    }

    let mut slots: Vec<Option<TaskOutcome>> = (0..total).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((position, outcome)) => slots[position] = Some(outcome),
            Err(err) => warn!("worklog task panicked or was cancelled: {}", err),
        }
    }
    slots.into_iter().flatten().collect()
}

async fn process_task(client: &SdpClient, task_id: &str, endpoints: &[Endpoint]) -> TaskOutcome {
    match client.fetch_worklogs(endpoints).await {
        Ok(fetched) => {
            debug!(
                "task {}: {} worklogs via {}",
                task_id,
                fetched.worklogs.len(),
                fetched.endpoint
            );
            let rows = fetched
                .worklogs
                .iter()
                .map(|raw| normalize_worklog(task_id, raw, Local::now()))
                .collect();
            TaskOutcome::Rows(rows)
        }
        Err(err) => TaskOutcome::Skipped(skip(task_id, &err)),
    }
}

fn skip(task_id: &str, err: &SdpError) -> SkippedTask {
    let status = err.status_label();
    warn!("skip task {}: {}", task_id, status);
    debug!("task {} failure details: {}", task_id, err);
    SkippedTask {
        task_id: task_id.to_string(),
        status,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdp_api::SdpConfig;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> SdpClient {
        let config = SdpConfig::new("token")
            .with_base_url(server.url())
            .with_api_path("api/v3");
        SdpClient::new(config).expect("client should build")
    }

    fn index(input: &str) -> TaskIndex {
        TaskIndex::from_reader(input.as_bytes()).expect("input should parse")
    }

    #[tokio::test]
    async fn fallback_route_produces_row_for_task() {
        let mut server = mockito::Server::new_async().await;
        let primary = server
            .mock("GET", "/api/v3/tasks/100/worklogs")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let fallback = server
            .mock("GET", "/api/v3/requests/900/tasks/100/worklogs")
            .with_status(200)
            .with_body(json!({"worklogs": [{"id": 1, "time_spent": "1:30"}]}).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let extract = collect_worklogs(&client, &index("task_id,request_id\n100,900\n"), 1).await;

        assert!(extract.skipped.is_empty());
        assert_eq!(extract.rows.len(), 1);
        let row = &extract.rows[0];
        assert_eq!(row.task_id, "100");
        assert_eq!(row.worklog_id.as_deref(), Some("1"));
        assert_eq!(row.time_spent.as_deref(), Some("1:30"));
        assert_eq!(row.time_spent_hours, Some(1));
        assert_eq!(row.time_spent_minutes, Some(30));
        primary.assert_async().await;
        fallback.assert_async().await;
    }

    #[tokio::test]
    async fn failing_task_is_skipped_and_later_tasks_continue() {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("GET", "/api/v3/tasks/100/worklogs")
            .with_status(404)
            .create_async()
            .await;
        let _first_fallback = server
            .mock("GET", "/api/v3/requests/900/tasks/100/worklogs")
            .with_status(500)
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/api/v3/tasks/200/worklogs")
            .with_status(200)
            .with_body(r#"{"worklogs": [{"id": 5, "owner": {"name": "Alice"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let extract =
            collect_worklogs(&client, &index("task_id,request_id\n100,900\n200,\n"), 1).await;

        assert_eq!(extract.rows.len(), 1);
        assert_eq!(extract.rows[0].task_id, "200");
        assert_eq!(extract.rows[0].owner.as_deref(), Some("Alice"));
        assert_eq!(extract.skipped.len(), 1);
        assert_eq!(extract.skipped[0].task_id, "100");
        assert_eq!(extract.skipped[0].status, "500");
    }

    #[tokio::test]
    async fn each_distinct_task_is_queried_once() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for task in ["1", "2", "3"] {
            mocks.push(
                server
                    .mock("GET", format!("/api/v3/tasks/{task}/worklogs").as_str())
                    .with_status(200)
                    .with_body(r#"{"worklogs": []}"#)
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let client = client_for(&server);
        let extract = collect_worklogs(&client, &index("task_id\n3\n1\n2.0\n1\n\n3\n"), 1).await;

        assert!(extract.rows.is_empty());
        assert!(extract.skipped.is_empty());
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_fetch_keeps_task_order() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for task in 1..=6 {
            let body = json!({"worklogs": [{"id": format!("{task}-a")}, {"id": format!("{task}-b")}]});
            mocks.push(
                server
                    .mock("GET", format!("/api/v3/tasks/{task}/worklogs").as_str())
                    .with_status(200)
                    .with_body(body.to_string())
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let client = client_for(&server);
        let extract = collect_worklogs(&client, &index("task_id\n6\n5\n4\n3\n2\n1\n"), 4).await;

        let ids: Vec<String> = extract
            .rows
            .iter()
            .filter_map(|row| row.worklog_id.clone())
            .collect();
        assert_eq!(
            ids,
            vec!["1-a", "1-b", "2-a", "2-b", "3-a", "3-b", "4-a", "4-b", "5-a", "5-b", "6-a", "6-b"]
        );
        for mock in mocks {
            mock.assert_async().await;
        }
    }
}
