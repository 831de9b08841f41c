use std::env;
use std::str::FromStr;

/// Visibility rule applied by the task handlers.
///
/// The stored `creator` reference denotes nominal ownership only; whether it
/// is *enforced* is a deployment decision, not an accident of the handlers:
///
/// * `Shared` (default) — the flat-visibility model: every authenticated user
///   sees and may edit or delete every task.
/// * `Private` — listing is restricted to the caller's own tasks, and
///   mutating another user's task yields 404 (existence is not leaked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskVisibility {
    #[default]
    Shared,
    Private,
}

impl FromStr for TaskVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(TaskVisibility::Shared),
            "private" => Ok(TaskVisibility::Private),
            other => Err(format!(
                "unknown task visibility {:?} (expected \"shared\" or \"private\")",
                other
            )),
        }
    }
}

pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// When set, tasks and users are persisted to Postgres; otherwise the
    /// process-local in-memory store is used.
    pub database_url: Option<String>,
    pub session_secret: String,
    pub task_visibility: TaskVisibility,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            database_url: env::var("DATABASE_URL").ok(),
            session_secret: env::var("SESSION_SECRET").expect("SESSION_SECRET must be set"),
            task_visibility: match env::var("TASK_VISIBILITY") {
                Ok(value) => value
                    .parse()
                    .expect("TASK_VISIBILITY must be \"shared\" or \"private\""),
                Err(_) => TaskVisibility::default(),
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
