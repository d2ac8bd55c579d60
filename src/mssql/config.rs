use tiberius::{AuthMethod, Config as TiberiusConfig};

use crate::vendor::{ConnectOptions, Credentials};

pub(super) fn build_tiberius_config(
    host: &str,
    credentials: &Credentials,
    options: &ConnectOptions,
) -> TiberiusConfig {
    let mut config = TiberiusConfig::new();
    config.host(host);
    if !options.database.is_empty() {
        config.database(&options.database);
    }
    config.port(options.port);
    config.authentication(AuthMethod::sql_server(
        &credentials.user,
        &credentials.password,
    ));
    if let Some(instance) = &options.instance_name {
        config.instance_name(instance);
    }
    if options.trust_cert {
        config.trust_cert();
    }
    config
}
