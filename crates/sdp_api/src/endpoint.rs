//! Routing for the two worklog endpoint shapes.

use std::fmt;

/// One worklog route to try for a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `tasks/{task_id}/worklogs`
    TaskOnly { task_id: String },
    /// `requests/{request_id}/tasks/{task_id}/worklogs`, for tasks that are only
    /// visible through their parent request.
    RequestScoped { request_id: String, task_id: String },
}

impl Endpoint {
    pub fn task_id(&self) -> &str {
        match self {
            Endpoint::TaskOnly { task_id } | Endpoint::RequestScoped { task_id, .. } => task_id,
        }
    }

    /// Path relative to the API root.
    pub fn path(&self) -> String {
        match self {
            Endpoint::TaskOnly { task_id } => format!("tasks/{}/worklogs", task_id),
            Endpoint::RequestScoped {
                request_id,
                task_id,
            } => format!("requests/{}/tasks/{}/worklogs", request_id, task_id),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Ordered routes for a task: task-only first, then the request-scoped
/// fallback when the task has a parent request.
pub fn resolve_endpoints(task_id: &str, request_id: Option<&str>) -> Vec<Endpoint> {
    let mut endpoints = vec![Endpoint::TaskOnly {
        task_id: task_id.to_string(),
    }];
    if let Some(request_id) = request_id.filter(|id| !id.is_empty()) {
        endpoints.push(Endpoint::RequestScoped {
            request_id: request_id.to_string(),
            task_id: task_id.to_string(),
        });
    }
    endpoints
}
