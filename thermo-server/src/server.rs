//! TCP front end for the thermo store.
//!
//! Uses `std::net::TcpListener` with one thread per connection. Each
//! connection carries one JSON request (see [`crate::protocol`]) and receives
//! a plain-text reply, after which the server closes it:
//!
//! - `info` → `information received`
//! - `daily_stats` / `weekly_stats` → one line per report record

use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thermo::{ReadConsistency, ReportBuilder, Store};

use crate::error::ServerError;
use crate::protocol::{self, Request, RequestError};
use crate::render;

/// Reply to an accepted reading.
const INFO_RECEIVED: &str = "information received";

/// Runtime settings, assembled from the command line.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: String,
    /// TCP port; 0 picks a free one.
    pub port: u16,
    /// How reports read the store.
    pub consistency: ReadConsistency,
    /// Per-connection read timeout.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            consistency: ReadConsistency::PerLookup,
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// A bound server, ready to accept connections.
pub struct Server {
    listener: TcpListener,
    store: Arc<Store>,
    config: ServerConfig,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable.
    pub fn bind(config: ServerConfig, store: Arc<Store>) -> Result<Self, ServerError> {
        let addr = format!("{}:{}", config.bind, config.port);
        let listener = TcpListener::bind(&addr).map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        Ok(Self {
            listener,
            store,
            config,
        })
    }

    /// Returns the address actually bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, handling each on its own thread.
    pub fn serve(self) {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("accept error: {e}");
                    continue;
                }
            };

            let store = Arc::clone(&self.store);
            let config = self.config.clone();
            let spawned = thread::Builder::new()
                .name("thermo-conn".to_string())
                .spawn(move || {
                    if let Err(e) = handle_connection(&stream, &store, &config) {
                        tracing::debug!("connection error: {e}");
                    }
                });

            if let Err(e) = spawned {
                tracing::warn!("failed to spawn connection thread: {e}");
            }
        }
    }
}

/// Reads one request from `stream`, dispatches it and writes the reply.
fn handle_connection(
    stream: &TcpStream,
    store: &Store,
    config: &ServerConfig,
) -> Result<(), ServerError> {
    // Don't block forever on slow clients
    stream.set_read_timeout(Some(config.read_timeout))?;

    let peer = stream.peer_addr().ok();
    let mut out = stream;

    let request = match protocol::read_request(BufReader::new(stream)) {
        Ok(request) => request,
        Err(e) => {
            if let RequestError::UnknownType(kind) = &e {
                tracing::debug!(?peer, kind = kind.as_str(), "unknown request type");
            } else {
                tracing::debug!(?peer, "rejected request: {e:?}");
            }
            writeln!(out, "{e}")?;
            return Ok(());
        }
    };

    tracing::debug!(?peer, ?request, "request");

    match request {
        Request::Info {
            sensor,
            temperature,
        } => {
            store.ingest(&sensor, temperature);
            writeln!(out, "{INFO_RECEIVED}")?;
        }
        Request::DailyStats { as_of } => {
            let as_of = as_of.unwrap_or_else(|| store.today().to_string());
            let report = ReportBuilder::new(store)
                .consistency(config.consistency)
                .daily(&as_of);
            render::write_report(&mut out, &report)?;
        }
        Request::WeeklyStats { as_of } => {
            let as_of = as_of.unwrap_or_else(|| store.today().to_string());
            let report = ReportBuilder::new(store)
                .consistency(config.consistency)
                .weekly(&as_of);
            render::write_report(&mut out, &report)?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Message;
    use std::io::Read;
    use thermo::{Day, FixedClock};

    /// Starts a server on a free loopback port.
    fn start(today: &str) -> (SocketAddr, Arc<Store>) {
        let clock = Arc::new(FixedClock::new(Day::parse(today).unwrap()));
        let store = Arc::new(Store::with_clock(clock));
        let config = ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        };

        let server = Server::bind(config, Arc::clone(&store)).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.serve());
        (addr, store)
    }

    fn send(addr: SocketAddr, body: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(body.as_bytes()).unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();
        reply
    }

    fn info(sensor: &str, temperature: i64) -> String {
        serde_json::to_string(&Message {
            sensor_name: sensor.to_string(),
            kind: "info".to_string(),
            temperature: Some(temperature),
            date: None,
        })
        .unwrap()
    }

    #[test]
    fn test_ingest_then_weekly_over_tcp() {
        let (addr, store) = start("2024-03-10");

        assert_eq!(send(addr, &info("A", 10)), "information received\n");
        assert_eq!(send(addr, &info("A", 30)), "information received\n");
        assert_eq!(store.reading_count(), 2);

        let reply = send(addr, r#"{"type":"weekly_stats"}"#);
        assert_eq!(
            reply,
            "sensor A weekly stats is: min: 10. max: 30 avg: 20\n\
             all sensors weekly stats are: min: 10. max: 30 avg: 20\n"
        );
    }

    #[test]
    fn test_daily_with_explicit_date() {
        let (addr, _store) = start("2024-03-10");
        send(addr, &info("A", 7));

        let reply = send(addr, r#"{"type":"daily_stats","date":"2024-03-17"}"#);
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(
            lines[0],
            "date 2024-03-10 stats for sensor A are: min: 7. max: 7 avg: 7"
        );
        assert_eq!(lines[1], "all sensors stats for 2024-03-10 are: min: 7. max: 7 avg: 7");
        assert_eq!(lines[8], "date 2024-03-17 has no data for sensor: A");
    }

    #[test]
    fn test_error_replies() {
        let (addr, _store) = start("2024-03-10");

        assert_eq!(send(addr, "garbage"), "wrong format sent\n");
        assert_eq!(send(addr, r#"{"type":"yearly"}"#), "wrong type\n");
        assert_eq!(
            send(addr, r#"{"type":"info","temperature":3}"#),
            "please provide a valid sensorname and temperature\n"
        );
        assert_eq!(
            send(addr, r#"{"type":"weekly_stats"}"#),
            "error getting stats: no data for any sensor\n"
        );
        assert_eq!(
            send(addr, r#"{"type":"daily_stats","date":"10.03.2024"}"#),
            "error getting stats: invalid date: 10.03.2024\n"
        );
    }
}
