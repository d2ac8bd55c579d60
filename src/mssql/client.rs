use std::net::ToSocketAddrs;

use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::config::build_tiberius_config;
use super::query::{engine_error, run_statement};
use crate::results::{BufferedCursor, FetchedRow};
use crate::types::FetchMode;
use crate::vendor::{
    ConnectOptions, Credentials, EngineError, ExecOptions, VendorClient, VendorConnection,
};

/// Native error code used for failures that happen before the server answers.
pub(super) const CLIENT_ERROR: &str = "HY000";

pub(super) type MssqlClient = Client<Compat<TcpStream>>;

/// [`VendorClient`] backed by tiberius.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiberiusClient;

impl TiberiusClient {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// An open tiberius session and the runtime that drives it.
///
/// The client is declared first so it is dropped while its runtime is still alive.
pub struct TiberiusConnection {
    client: MssqlClient,
    errors: Vec<EngineError>,
    runtime: Runtime,
}

impl VendorClient for TiberiusClient {
    type Connection = TiberiusConnection;

    fn connect(
        &self,
        host: &str,
        credentials: &Credentials,
        options: &ConnectOptions,
    ) -> Result<TiberiusConnection, EngineError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EngineError::new(CLIENT_ERROR, format!("tokio runtime error: {e}")))?;

        let config = build_tiberius_config(host, credentials, options);
        let client = runtime.block_on(async {
            let tcp = if options.instance_name.is_some() {
                TcpStream::connect_named(&config).await.map_err(engine_error)?
            } else {
                // Resolve the address ourselves so the error names the host
                let server_addr = (host, options.port)
                    .to_socket_addrs()
                    .map_err(|e| {
                        EngineError::new(
                            CLIENT_ERROR,
                            format!("Failed to resolve server address: {e}"),
                        )
                    })?
                    .next()
                    .ok_or_else(|| {
                        EngineError::new(CLIENT_ERROR, format!("No valid address found for {host}"))
                    })?;
                TcpStream::connect(server_addr).await.map_err(|e| {
                    EngineError::new(CLIENT_ERROR, format!("TCP connection error: {e}"))
                })?
            };
            tcp.set_nodelay(true)
                .map_err(|e| EngineError::new(CLIENT_ERROR, format!("TCP option error: {e}")))?;

            Client::connect(config, tcp.compat_write())
                .await
                .map_err(engine_error)
        })?;

        Ok(TiberiusConnection {
            client,
            errors: Vec::new(),
            runtime,
        })
    }
}

impl VendorConnection for TiberiusConnection {
    type Cursor = BufferedCursor;

    fn execute(&mut self, sql: &str, options: ExecOptions) -> Result<BufferedCursor, EngineError> {
        self.errors.clear();
        let result = self
            .runtime
            .block_on(run_statement(&mut self.client, sql, options.cursor));
        if let Err(error) = &result {
            self.errors.push(error.clone());
        }
        result
    }

    fn fetch_row(
        &mut self,
        cursor: &mut BufferedCursor,
        mode: FetchMode,
    ) -> Result<Option<FetchedRow>, EngineError> {
        Ok(cursor.next_row(mode))
    }

    fn rows_affected(&self, cursor: &BufferedCursor) -> u64 {
        cursor.rows_affected()
    }

    fn num_rows(&self, cursor: &BufferedCursor) -> Option<u64> {
        cursor.num_rows()
    }

    fn free_cursor(&mut self, cursor: BufferedCursor) {
        drop(cursor);
    }

    fn last_errors(&self) -> Vec<EngineError> {
        self.errors.clone()
    }
}
