use mailman_api::configuration::{Settings, get_configuration};
use mailman_api::list_lookup::ListHandle;
use mailman_api::mailman::{FileListStore, ListManager, MailingList};
use mailman_api::startup::Application;
use mailman_api::telemetry::{get_subscriber, init_subscriber};
use std::sync::{Arc, LazyLock};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
    pub list_manager: Arc<dyn ListManager>,
    pub settings: Settings,
}

/// Links embedded in the new list notification.
pub struct NotificationLinks {
    pub admin_url: String,
    pub listinfo_url: String,
}

impl TestApp {
    pub async fn get_lists(&self, address: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.get(format!("{}/", &self.address));
        if let Some(address) = address {
            request = request.query(&[("address", address)]);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_list(&self, listname: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/{}", &self.address, listname))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_list<Body>(&self, listname: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .put(format!("{}/{}", &self.address, listname))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_list<Body>(&self, listname: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}/{}", &self.address, listname))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_list<Body>(&self, listname: &str, body: Option<&Body>) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        let mut request = self
            .api_client
            .delete(format!("{}/{}", &self.address, listname));
        if let Some(body) = body {
            request = request.form(body);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_members(&self, listname: &str, address: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(format!("{}/{}/members", &self.address, listname));
        if let Some(address) = address {
            request = request.query(&[("address", address)]);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn put_member<Body>(&self, listname: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .put(format!("{}/{}/members", &self.address, listname))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_member<Body>(&self, listname: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .delete(format!("{}/{}/members", &self.address, listname))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a list through the API without sending a notification.
    pub async fn create_list(&self, listname: &str) {
        self.put_list(
            listname,
            &serde_json::json!({
                "admin": "admin@example.com",
                "password": "123456",
                "quiet": "1",
            }),
        )
        .await
        .error_for_status()
        .unwrap();
    }

    /// Changes a stored list directly through the backend.
    pub fn update_list(&self, listname: &str, update: impl FnOnce(&mut MailingList)) {
        let mut list = ListHandle::resolve(&self.list_manager, listname, true)
            .expect("Failed to lock the list.");
        update(&mut *list);
        list.save().expect("Failed to save the list.");
    }

    pub fn load_list(&self, listname: &str) -> MailingList {
        self.list_manager
            .load(listname)
            .expect("Failed to load the list.")
    }

    pub async fn mount_email_ok(&self) {
        Mock::given(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.email_server)
            .await;
    }

    /// Extract the links embedded in the plain text notification body.
    pub fn get_notification_links(&self, email_request: &wiremock::Request) -> NotificationLinks {
        let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
        let links: Vec<String> = linkify::LinkFinder::new()
            .links(body["TextBody"].as_str().unwrap())
            .filter(|l| *l.kind() == linkify::LinkKind::Url)
            .map(|l| l.as_str().to_owned())
            .collect();
        assert_eq!(links.len(), 2);

        NotificationLinks {
            admin_url: links[0].clone(),
            listinfo_url: links[1].clone(),
        }
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    LazyLock::force(&TRACING);

    // Launch a mock server to stand in for Postmark's API
    let email_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Every test gets its own list storage
        c.mailman.var_prefix = std::env::temp_dir()
            .join("mailman-api-tests")
            .join(Uuid::new_v4().to_string());
        c.mailman.default_email_host = "lists.example.com".to_string();
        c.mailman.default_url_host = "lists.example.com".to_string();
        c.mailman.lock_timeout_milliseconds = 500;
        // Use a random OS port
        c.application.host = "127.0.0.1".to_string();
        c.application.port = 0;
        c.application.allowed_ips = Vec::new();
        // Use the mock server as email API
        c.email_client.base_url = email_server.uri();
        customise(&mut c);
        c
    };

    let list_manager: Arc<dyn ListManager> =
        Arc::new(FileListStore::new(configuration.mailman.clone()));

    // Launch the application as a background task
    let application =
        Application::build_with_list_manager(configuration.clone(), Arc::clone(&list_manager))
            .await
            .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        email_server,
        api_client: reqwest::Client::new(),
        list_manager,
        settings: configuration,
    }
}
