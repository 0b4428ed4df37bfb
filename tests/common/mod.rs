//! Common test utilities for E2E tests

#![allow(dead_code)]

use minitter::data::User;
use minitter::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TEST_PASSWORD: &str = "wonderland42";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig { path: db_path },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604800,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        minitter::metrics::init_metrics();
        let state = AppState::new(config).await.unwrap();

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = minitter::build_router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Create a user directly through the service layer
    pub async fn create_user(&self, username: &str) -> User {
        self.state
            .accounts()
            .signup(username, TEST_PASSWORD)
            .await
            .unwrap()
    }

    /// Cookie header value carrying a valid session for `user`
    pub fn session_cookie(&self, user: &User) -> String {
        use minitter::auth::session::{Session, create_session_token};

        let session = Session::for_user(user, self.state.config.auth.session_max_age).unwrap();
        let token =
            create_session_token(&session, &self.state.config.auth.session_secret).unwrap();
        format!("session={}", token)
    }

    /// GET with an optional Cookie header
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request.send().await.unwrap()
    }

    /// POST an urlencoded form with an optional Cookie header
    pub async fn post_form(
        &self,
        path: &str,
        cookie: Option<&str>,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request.send().await.unwrap()
    }

    /// Follow a redirect by hand, keeping the session and any flash cookie
    pub async fn follow_redirect(
        &self,
        response: &reqwest::Response,
        session: &str,
    ) -> reqwest::Response {
        let location = location(response);
        let cookie = match set_cookie(response, "flash") {
            Some(flash) => format!("{}; flash={}", session, flash),
            None => session.to_string(),
        };
        self.get(&location, Some(&cookie)).await
    }
}

/// `Location` header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Value of cookie `name` set by the response, if any
pub fn set_cookie(response: &reqwest::Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(|value| {
            let pair = value.split(';').next().unwrap_or_default();
            pair[prefix.len()..].to_string()
        })
}
