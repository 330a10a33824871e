use crate::access_control::{AllowedHosts, reject_unlisted_hosts};
use crate::configuration::{MailmanSettings, Settings};
use crate::email_client::EmailClient;
use crate::errors::{ApiError, ErrorKind};
use crate::mailman::{FileListStore, ListManager};
use crate::routes;
use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::web::Data;
use actix_web::{App, HttpServer, web};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let list_manager: Arc<dyn ListManager> =
            Arc::new(FileListStore::new(configuration.mailman.clone()));
        Self::build_with_list_manager(configuration, list_manager).await
    }

    /// Serves the API on top of an already constructed list backend.
    pub async fn build_with_list_manager(
        configuration: Settings,
        list_manager: Arc<dyn ListManager>,
    ) -> Result<Self, anyhow::Error> {
        let email_client = configuration.email_client.client()?;
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            list_manager,
            configuration.mailman,
            email_client,
            AllowedHosts::new(configuration.application.allowed_ips),
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    list_manager: Arc<dyn ListManager>,
    mailman_settings: MailmanSettings,
    email_client: EmailClient,
    allowed_hosts: AllowedHosts,
) -> Result<Server, anyhow::Error> {
    let list_manager: Data<dyn ListManager> = Data::from(list_manager);
    let mailman_settings = Data::new(mailman_settings);
    let email_client = Data::new(email_client);
    let allowed_hosts = Data::new(allowed_hosts);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(reject_unlisted_hosts))
            .wrap(TracingLogger::default())
            .configure(routes::api)
            .default_service(web::to(routes::not_found))
            .app_data(web::FormConfig::default().error_handler(|err, _req| {
                ApiError::domain(ErrorKind::InvalidParams, err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::domain(ErrorKind::InvalidParams, err.to_string()).into()
            }))
            .app_data(list_manager.clone())
            .app_data(mailman_settings.clone())
            .app_data(email_client.clone())
            .app_data(allowed_hosts.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
