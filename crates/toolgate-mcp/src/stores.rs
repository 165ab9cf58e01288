//! Fixture-backed stores for the demonstration tools.
//!
//! Real backends are out of scope; these stand-ins hold just enough state
//! for the tools to behave observably. The ticket database is a seeded
//! in-memory SQLite instance so `run_query` exercises real SQL.

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use toolgate_core::TenantId;
use toolgate_guards::TenantDirectory;

use crate::error::{McpError, McpResult};

/// A tenant-owned project record.
#[derive(Debug, Clone)]
pub struct Project {
    pub project_id: String,
    pub tenant: TenantId,
    pub name: String,
    pub status: String,
}

/// A fetchable article fixture, keyed by URL.
#[derive(Debug, Clone)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub body: String,
}

/// A queued outbound message.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient: String,
    pub body: String,
}

/// All tool-facing state for one server instance.
pub struct Stores {
    pub projects: HashMap<String, Project>,
    pub articles: HashMap<String, Article>,
    pub secrets: HashMap<String, String>,
    pub log_lines: Vec<String>,
    pub outbox: Mutex<Vec<OutboundMessage>>,
    pub repositories: Mutex<Vec<String>>,
    pub tickets: Mutex<Connection>,
    /// Sandbox directory `list_directory` serves from, created and seeded
    /// on construction.
    pub files_root: PathBuf,
}

impl Stores {
    pub fn new(files_root: &Path) -> McpResult<Self> {
        let tickets = Connection::open_in_memory()
            .map_err(|e| McpError::StorageError(format!("failed to open ticket db: {}", e)))?;
        tickets
            .execute_batch(
                "CREATE TABLE tickets (
                     id INTEGER PRIMARY KEY,
                     title TEXT NOT NULL,
                     status TEXT NOT NULL,
                     assignee TEXT
                 );
                 INSERT INTO tickets (id, title, status, assignee) VALUES
                     (1, 'Login page rejects valid password', 'open', 'alice'),
                     (2, 'Export job stuck at 99%', 'open', 'bob'),
                     (3, 'Dark mode flickers on load', 'closed', 'alice'),
                     (4, 'Webhook retries forever', 'open', NULL);",
            )
            .map_err(|e| McpError::StorageError(format!("failed to seed ticket db: {}", e)))?;

        let mut projects = HashMap::new();
        for (id, tenant, name, status) in [
            ("proj-acme-1", "acme", "Checkout revamp", "active"),
            ("proj-acme-2", "acme", "Mobile onboarding", "paused"),
            ("proj-globex-1", "globex", "Billing pipeline", "active"),
        ] {
            projects.insert(
                id.to_string(),
                Project {
                    project_id: id.to_string(),
                    tenant: TenantId::new(tenant),
                    name: name.to_string(),
                    status: status.to_string(),
                },
            );
        }

        let mut articles = HashMap::new();
        for (url, title, body) in [
            (
                "https://news.example.com/release-notes",
                "Release notes",
                "Version 2.4 ships incremental sync and a faster indexer.",
            ),
            (
                "https://docs.example.com/getting-started",
                "Getting started",
                "Install the CLI, authenticate, and create your first workspace.",
            ),
        ] {
            articles.insert(
                url.to_string(),
                Article {
                    url: url.to_string(),
                    title: title.to_string(),
                    body: body.to_string(),
                },
            );
        }

        let mut secrets = HashMap::new();
        secrets.insert("deploy_key".to_string(), "dk-5f2a9c01".to_string());
        secrets.insert("backup_passphrase".to_string(), "bp-autumn-lattice-88".to_string());

        std::fs::create_dir_all(files_root).map_err(|e| {
            McpError::StorageError(format!("failed to create files root: {}", e))
        })?;
        for (name, contents) in [
            ("manifest.txt", "checkout-revamp 2.4\n"),
            ("notes.txt", "sandbox fixtures for directory listings\n"),
        ] {
            std::fs::write(files_root.join(name), contents).map_err(|e| {
                McpError::StorageError(format!("failed to seed files root: {}", e))
            })?;
        }

        let log_lines = vec![
            "GET /api/health 200 3ms".to_string(),
            "POST /api/tickets 201 41ms".to_string(),
            "GET /api/tickets/2 200 9ms".to_string(),
            "error: timeout after 5000ms contacting upstream".to_string(),
            "POST /api/export 500 5021ms".to_string(),
        ];

        Ok(Self {
            projects,
            articles,
            secrets,
            log_lines,
            outbox: Mutex::new(Vec::new()),
            repositories: Mutex::new(Vec::new()),
            tickets: Mutex::new(tickets),
            files_root: files_root.to_path_buf(),
        })
    }

    /// Directory the tenant-scope guard checks; derived from the same
    /// project fixtures the handlers serve, so guard and handler agree.
    pub fn tenant_directory(&self) -> TenantDirectory {
        let mut dir = TenantDirectory::new();
        dir.add_key("key-acme", TenantId::new("acme"));
        dir.add_key("key-globex", TenantId::new("globex"));
        for project in self.projects.values() {
            dir.add_resource(project.project_id.clone(), project.tenant.clone());
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stores() -> Stores {
        Stores::new(&std::env::temp_dir().join("toolgate-sandbox")).unwrap()
    }

    #[test]
    fn test_stores_seed_tickets() {
        let stores = make_stores();
        let conn = stores.tickets.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_tenant_directory_covers_all_projects() {
        let stores = make_stores();
        let dir = stores.tenant_directory();
        for project in stores.projects.values() {
            assert_eq!(dir.owner_of(&project.project_id), Some(&project.tenant));
        }
        assert_eq!(dir.tenant_for_key("key-acme"), Some(&TenantId::new("acme")));
        assert!(dir.tenant_for_key("key-wrong").is_none());
    }

    #[test]
    fn test_stores_fixtures_present() {
        let stores = make_stores();
        assert!(stores.articles.contains_key("https://news.example.com/release-notes"));
        assert!(stores.secrets.contains_key("deploy_key"));
        assert!(!stores.log_lines.is_empty());
    }

    #[test]
    fn test_stores_seed_files_root() {
        let stores = make_stores();
        assert!(stores.files_root.join("manifest.txt").is_file());
        assert!(stores.files_root.join("notes.txt").is_file());
    }
}
