use crate::email_client::EmailClient;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mailman: MailmanSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    // An empty list turns the peer address check off.
    #[serde(default)]
    pub allowed_ips: Vec<IpAddr>,
}

/// Where the list backend keeps its state, and the defaults it applies to
/// newly created lists.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct MailmanSettings {
    pub var_prefix: PathBuf,
    pub site_list: String,
    pub default_email_host: String,
    pub default_url_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub lock_timeout_milliseconds: u64,
}

impl MailmanSettings {
    pub fn lists_dir(&self) -> PathBuf {
        self.var_prefix.join("lists")
    }

    pub fn list_dir(&self, listname: &str) -> PathBuf {
        self.lists_dir().join(listname)
    }

    pub fn locks_dir(&self) -> PathBuf {
        self.var_prefix.join("locks")
    }

    pub fn lock_file(&self, listname: &str) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", listname))
    }

    pub fn private_archives_dir(&self) -> PathBuf {
        self.var_prefix.join("archives").join("private")
    }

    pub fn public_archives_dir(&self) -> PathBuf {
        self.var_prefix.join("archives").join("public")
    }

    /// Private and public archive locations of a list, each followed by its
    /// `.mbox` sibling.
    pub fn archive_paths(&self, listname: &str) -> Vec<PathBuf> {
        let mbox = format!("{}.mbox", listname);
        vec![
            self.private_archives_dir().join(listname),
            self.private_archives_dir().join(&mbox),
            self.public_archives_dir().join(listname),
            self.public_archives_dir().join(&mbox),
        ]
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn client(self) -> Result<EmailClient, reqwest::Error> {
        let timeout = self.timeout();
        EmailClient::new(
            self.base_url,
            self.sender_email,
            self.authorization_token,
            timeout,
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// `APP_MAILMAN__VAR_PREFIX` maps to `Settings.mailman.var_prefix`. The
/// allow-list takes a comma separated value, e.g.
/// `APP_APPLICATION__ALLOWED_IPS=127.0.0.1,::1`.
fn environment_source() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("application.allowed_ips")
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Variables from a `.env` file become visible to the `APP_` source below.
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(environment_source())
        .build()?;

    settings.try_deserialize::<Settings>()
}
