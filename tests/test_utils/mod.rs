//! Test utilities for database testing.
//!
//! In-memory SQLite databases with every migration applied, plus fixture helpers for users and
//! bases. Foreign keys stay enforced, so fixtures must be inserted in dependency order.

use anyhow::Result;
use chrono::Utc;
use csa_loop::models::{base, user};
use csa_loop::repositories::{BaseRef, FarmerInput, FarmerRepository, SeasonalProductInput};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Sets up an in-memory SQLite database with all migrations applied and returns an Arc.
#[allow(dead_code)]
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    Ok(Arc::new(setup_test_db().await?))
}

/// Inserts a user row directly; the password column holds a placeholder, not a usable hash.
#[allow(dead_code)]
pub async fn insert_user(db: &DatabaseConnection, email: &str) -> Result<i32> {
    let now = Utc::now().fixed_offset();
    let created = user::ActiveModel {
        name: Set(format!("User {email}")),
        email: Set(email.to_string()),
        password: Set("not-a-hash".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created.id)
}

/// Inserts a base row and returns its id.
#[allow(dead_code)]
pub async fn insert_base(db: &DatabaseConnection, name: &str, area: Option<&str>) -> Result<i32> {
    let now = Utc::now().fixed_offset();
    let created = base::ActiveModel {
        name: Set(name.to_string()),
        area: Set(area.map(str::to_string)),
        station: Set(Some(format!("{name}駅"))),
        address: Set(Some(format!("{name} 1-1-1"))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created.id)
}

/// Minimal community input attached to an existing base.
#[allow(dead_code)]
pub fn farmer_input(name: &str, base_id: i32) -> FarmerInput {
    let mut input = FarmerInput::new(name, "Tokyo", BaseRef::Existing(base_id));
    input.seasonal_products = vec![SeasonalProductInput::new("3-5月", "carrot")];
    input
}

/// Creates a community owned by `owner` and returns its id.
#[allow(dead_code)]
pub async fn create_farmer(
    db: &DatabaseConnection,
    owner: i32,
    name: &str,
    base_id: i32,
) -> Result<i32> {
    let repo = FarmerRepository::new(Arc::new(db.clone()));
    Ok(repo.create_farmer(farmer_input(name, base_id), owner).await?)
}

/// Router-level helpers: build the app over a test database and drive it with `oneshot`.
#[allow(dead_code)]
pub mod api {
    use anyhow::Result;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{HeaderMap, Method, Request, StatusCode, header},
    };
    use csa_loop::config::AppConfig;
    use csa_loop::repositories::UserRepository;
    use csa_loop::server::{create_app, create_test_app_state};
    use sea_orm::DatabaseConnection;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    pub const PASSWORD: &str = "correct horse battery";

    pub struct TestApp {
        pub router: Router,
        pub db: DatabaseConnection,
        /// Holds the upload directory for the lifetime of the test
        pub upload_dir: TempDir,
    }

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Value,
    }

    impl TestResponse {
        pub fn set_cookie(&self) -> Option<&str> {
            self.headers
                .get(header::SET_COOKIE)
                .and_then(|value| value.to_str().ok())
        }
    }

    /// Builds the router with defaults adjusted by `configure`.
    pub async fn test_app_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestApp> {
        let db = super::setup_test_db().await?;
        let upload_dir = TempDir::new()?;

        let mut config = AppConfig {
            bcrypt_cost: 4,
            upload_dir: upload_dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        configure(&mut config);

        let state = create_test_app_state(config, db.clone())?;
        Ok(TestApp {
            router: create_app(state),
            db,
            upload_dir,
        })
    }

    pub async fn test_app() -> Result<TestApp> {
        test_app_with(|_| {}).await
    }

    impl TestApp {
        pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
            let response = self.router.clone().oneshot(request).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = to_bytes(response.into_body(), usize::MAX).await?;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            Ok(TestResponse {
                status,
                headers,
                body,
            })
        }

        pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Result<TestResponse> {
            self.send(request(Method::GET, uri, cookie, Body::empty())?)
                .await
        }

        pub async fn json(
            &self,
            method: Method,
            uri: &str,
            cookie: Option<&str>,
            body: Value,
        ) -> Result<TestResponse> {
            let mut req = request(method, uri, cookie, Body::from(body.to_string()))?;
            req.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
            self.send(req).await
        }

        /// Registers `email` directly in the database and logs in over HTTP.
        ///
        /// Returns the user id and the `session=...` pair to send back as a `Cookie` header.
        pub async fn login_as(&self, email: &str) -> Result<(i32, String)> {
            let users = UserRepository::new(Arc::new(self.db.clone()), 4);
            let user = users.register_user("Tester", email, PASSWORD).await?;

            let response = self
                .json(
                    Method::POST,
                    "/auth/login",
                    None,
                    json!({ "email": email, "password": PASSWORD }),
                )
                .await?;
            let cookie = response
                .set_cookie()
                .and_then(|value| value.split(';').next())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("login did not set a cookie"))?;
            Ok((user.id, cookie))
        }
    }

    pub fn request(
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Body,
    ) -> Result<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        Ok(builder.body(body)?)
    }

    /// A multipart/form-data body; `file` is `(filename, content_type, bytes)`.
    pub fn multipart_body(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (String, Vec<u8>) {
        let boundary = "csa-loop-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }
}
