use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::Client;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, PaginatorTrait,
    QueryFilter, Statement,
};
use serde_json::{Value, json};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use fest_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StaticAssetsConfig,
};
use fest_server::entity::{game, registration};
use fest_server::state::AppState;

/// PostgreSQL container shared across all tests in this binary.
static SHARED_PG: OnceCell<(ContainerAsync<Postgres>, u16)> = OnceCell::const_new();

/// Monotonic counter for unique database names.
static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Container ID for atexit cleanup.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

extern "C" fn cleanup_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", "-v", id])
            .output();
    }
}

fn database_config(port: u16, name: &str) -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port,
        user: "postgres".to_string(),
        password: "postgres".to_string(),
        name: name.to_string(),
        encrypt: false,
        trust_server_certificate: false,
        connect_timeout_secs: 30,
        max_connections: 10,
        sqlx_logging: false,
    }
}

async fn connect(port: u16, name: &str) -> DatabaseConnection {
    fest_server::database::init_db(&database_config(port, name))
        .await
        .expect("Failed to open connection pool")
}

/// Start (or reuse) the shared PostgreSQL container, create and bootstrap a
/// template database, and return the host port.
async fn shared_pg_port() -> u16 {
    let (_, port) = SHARED_PG
        .get_or_init(|| async {
            let container = Postgres::default()
                .start()
                .await
                .expect("Failed to start PostgreSQL container");
            let port = container
                .get_host_port_ipv4(5432)
                .await
                .expect("Failed to get PostgreSQL port");

            let _ = CONTAINER_ID.set(container.id().to_string());

            // The `watchdog` feature handles signal-based cleanup (Ctrl+C), but
            // normal process exit doesn't trigger `Drop` on statics.
            unsafe { libc::atexit(cleanup_container) };

            create_database(port, "template_test", None).await;
            let template_db = connect(port, "template_test").await;
            fest_server::seed::bootstrap_schema(&template_db)
                .await
                .expect("Failed to bootstrap template database");
            template_db
                .close()
                .await
                .expect("Failed to close template database");

            (container, port)
        })
        .await;
    *port
}

async fn create_database(port: u16, name: &str, template: Option<&str>) {
    let admin_db = connect(port, "postgres").await;
    let sql = match template {
        Some(template) => format!("CREATE DATABASE \"{name}\" TEMPLATE \"{template}\""),
        None => format!("CREATE DATABASE \"{name}\""),
    };
    admin_db
        .execute_raw(Statement::from_string(DbBackend::Postgres, sql))
        .await
        .expect("Failed to create database");
    admin_db
        .close()
        .await
        .expect("Failed to close admin database");
}

fn next_db_name() -> String {
    format!("test_{}", DB_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// An empty database on the shared server, with no tables.
pub async fn empty_database() -> DatabaseConnection {
    let port = shared_pg_port().await;
    let name = next_db_name();
    create_database(port, &name, None).await;
    connect(port, &name).await
}

pub mod routes {
    pub const REGISTER: &str = "/api/register";
    pub const REGISTRATIONS: &str = "/api/registrations";
    pub const GAMES_STATS: &str = "/api/games-stats";
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server on a fresh copy of the bootstrapped template database,
    /// letting the caller adjust the configuration first.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let port = shared_pg_port().await;
        let db_name = next_db_name();
        create_database(port, &db_name, Some("template_test")).await;

        let mut config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: database_config(port, &db_name),
            static_assets: StaticAssetsConfig {
                enabled: false,
                dir: PathBuf::from("dist"),
            },
        };
        configure(&mut config);

        let db = fest_server::database::init_db(&config.database)
            .await
            .expect("Failed to connect to test database");

        let state = AppState {
            db: db.clone(),
            config,
        };

        let app = fest_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Submit a registration for `games` and assert it was accepted.
    pub async fn register(&self, roll_number: &str, games: &[&str]) -> i64 {
        let res = self
            .post(routes::REGISTER, &registration_body(roll_number, games))
            .await;
        assert_eq!(res.status, 201, "register failed: {}", res.text);
        res.body["registrationId"]
            .as_i64()
            .expect("response body should contain 'registrationId'")
    }

    pub async fn registration_count(&self) -> u64 {
        registration::Entity::find()
            .count(&self.db)
            .await
            .expect("DB query failed")
    }

    pub async fn game(&self, name: &str) -> game::Model {
        game::Entity::find()
            .filter(game::Column::Name.eq(name))
            .one(&self.db)
            .await
            .expect("DB query failed")
            .unwrap_or_else(|| panic!("Game {name} not found"))
    }

    /// Overwrite a game's capacity, count and active flag.
    pub async fn set_game(&self, name: &str, max: i32, current: i32, active: bool) {
        game::Entity::update_many()
            .col_expr(game::Column::MaxParticipants, Expr::value(max))
            .col_expr(game::Column::CurrentParticipants, Expr::value(current))
            .col_expr(game::Column::IsActive, Expr::value(active))
            .filter(game::Column::Name.eq(name))
            .exec(&self.db)
            .await
            .expect("Failed to update game");
    }

    /// Run raw SQL against the test database.
    pub async fn execute(&self, sql: &str) {
        self.db
            .execute_unprepared(sql)
            .await
            .expect("Failed to execute SQL");
    }
}

/// A complete registration body with the given roll number and games.
pub fn registration_body(roll_number: &str, games: &[&str]) -> Value {
    json!({
        "fullName": "Jane Doe",
        "rollNumber": roll_number,
        "department": "Computer Science",
        "section": "A",
        "gender": "female",
        "games": games,
    })
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }
}
