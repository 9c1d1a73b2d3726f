use std::time::Duration;

use aidd_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client};
use tracing::{debug, info};

use crate::error::DbError;

/// Build a MongoDB client from settings and ping the server once.
///
/// The ping forces server selection so an unreachable server surfaces here
/// instead of on the first provisioning call.
pub async fn connect(settings: &DatabaseSettings) -> Result<Client, DbError> {
    let mut options = ClientOptions::parse(settings.uri.as_str()).await?;
    options.app_name = Some(settings.app_name.clone());
    options.connect_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
    options.server_selection_timeout =
        Some(Duration::from_millis(settings.server_selection_timeout_ms));

    debug!(
        app_name = %settings.app_name,
        connect_timeout_ms = settings.connect_timeout_ms,
        "building mongodb client"
    );
    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    info!("connected to mongodb");
    Ok(client)
}
