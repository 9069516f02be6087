//! Single-shot TCP echo client
//!
//! One connection, one send, one bounded read. The socket lives only inside
//! [`TcpEchoClient::exchange`] and is closed on every path out of it.

pub mod repr;
pub mod state;

pub use repr::bytes_repr;
pub use state::ConnectionTracker;

use crate::{
    defaults::ECHO_RECV_BUFFER,
    error::{AppError, Result},
    logging::NetworkLogger,
    models::Config,
    types::ConnectionState,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

/// Result of one request/response exchange
#[derive(Debug, Clone)]
pub struct EchoExchange {
    pub sent: Vec<u8>,
    /// Raw bytes from the single read, at most the receive buffer size
    pub received: Vec<u8>,
    /// `received` decoded as UTF-8
    pub text: String,
    /// States visited, ending in `Closed`
    pub states: Vec<ConnectionState>,
    pub connect_time: Duration,
    /// From connected to reply received
    pub round_trip: Duration,
}

impl EchoExchange {
    /// `b'...'` rendering of the raw reply
    pub fn received_repr(&self) -> String {
        bytes_repr(&self.received)
    }

    /// Whether the peer returned exactly what was sent
    pub fn is_echo(&self) -> bool {
        self.sent == self.received
    }
}

/// Transport seam for the echo command
#[async_trait]
pub trait EchoClient: Send + Sync {
    /// Send `message` once and perform one read of the reply
    async fn exchange(&self, message: &[u8]) -> Result<EchoExchange>;

    /// Address the client talks to
    fn target(&self) -> &str;
}

/// tokio `TcpStream` echo client
pub struct TcpEchoClient {
    address: String,
    timeout: Duration,
    logger: Option<NetworkLogger>,
}

impl TcpEchoClient {
    /// `timeout` bounds the connect and the read separately
    pub fn new<S: Into<String>>(address: S, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            logger: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.echo_address(), config.echo_timeout())
    }

    pub fn with_logger(mut self, logger: NetworkLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn advance(&self, tracker: &mut ConnectionTracker, to: ConnectionState) -> Result<()> {
        let from = tracker.advance(to)?;
        if let Some(logger) = &self.logger {
            logger.log_transition(from, to).await;
        }
        Ok(())
    }

    async fn connect(&self) -> Result<(TcpStream, Duration)> {
        let start = Instant::now();
        let result = match timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Err(_) => Err(AppError::timeout(format!(
                "connecting to {} took longer than {}s",
                self.address,
                self.timeout.as_secs_f64()
            ))),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::TimedOut => {
                Err(AppError::timeout(format!("connecting to {}: {}", self.address, e)))
            }
            Ok(Err(e)) => Err(AppError::network(format!("failed to connect to {}: {}", self.address, e))),
            Ok(Ok(stream)) => Ok(stream),
        };
        let elapsed = start.elapsed();

        if let Some(logger) = &self.logger {
            let error = result.as_ref().err().map(|e| e.to_string());
            logger
                .log_connection(&self.address, result.is_ok(), elapsed, error.as_deref())
                .await;
        }

        result.map(|stream| (stream, elapsed))
    }

    async fn run(&self, message: &[u8], tracker: &mut ConnectionTracker) -> Result<EchoExchange> {
        let (mut stream, connect_time) = self.connect().await?;
        self.advance(tracker, ConnectionState::Connected).await?;

        let exchange_start = Instant::now();
        stream
            .write_all(message)
            .await
            .map_err(|e| AppError::network(format!("failed to send to {}: {}", self.address, e)))?;
        self.advance(tracker, ConnectionState::Sent).await?;

        // Exactly one read; a short reply is accepted as-is
        let mut buffer = [0u8; ECHO_RECV_BUFFER];
        let read = timeout(self.timeout, stream.read(&mut buffer))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "no reply from {} within {}s",
                    self.address,
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| AppError::network(format!("failed to read from {}: {}", self.address, e)))?;
        let round_trip = exchange_start.elapsed();
        let received = buffer[..read].to_vec();
        self.advance(tracker, ConnectionState::Received).await?;

        let text = String::from_utf8(received.clone())?;

        // The peer may already have closed its side; the reply is already in hand
        let _ = stream.shutdown().await;
        drop(stream);
        self.advance(tracker, ConnectionState::Closed).await?;

        if let Some(logger) = &self.logger {
            logger.log_exchange(&self.address, message.len(), received.len(), round_trip).await;
        }

        Ok(EchoExchange {
            sent: message.to_vec(),
            received,
            text,
            states: tracker.trail().to_vec(),
            connect_time,
            round_trip,
        })
    }
}

#[async_trait]
impl EchoClient for TcpEchoClient {
    async fn exchange(&self, message: &[u8]) -> Result<EchoExchange> {
        let mut tracker = ConnectionTracker::new();
        let correlation_id = match &self.logger {
            Some(logger) => Some(logger.begin_exchange(&self.address).await),
            None => None,
        };

        let result = self.run(message, &mut tracker).await;

        if result.is_err() {
            if let Some(from) = tracker.fail() {
                if let Some(logger) = &self.logger {
                    logger.log_transition(from, ConnectionState::Failed).await;
                }
            }
        }

        if let (Some(logger), Some(id)) = (&self.logger, &correlation_id) {
            logger.finish_exchange(id, &self.address, result.is_ok()).await;
        }

        result
    }

    fn target(&self) -> &str {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one connection and reply with whatever `reply` returns for the request
    async fn spawn_peer<F>(reply: F) -> String
    where
        F: FnOnce(Vec<u8>) -> Option<Vec<u8>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            match reply(buf[..n].to_vec()) {
                Some(bytes) => {
                    socket.write_all(&bytes).await.unwrap();
                }
                None => {
                    // Hold the connection open without replying
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        });
        address
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let address = spawn_peer(Some).await;
        let client = TcpEchoClient::new(address, Duration::from_secs(5));

        let exchange = client.exchange(b"Hello, world").await.unwrap();
        assert_eq!(exchange.text, "Hello, world");
        assert_eq!(exchange.received_repr(), "b'Hello, world'");
        assert!(exchange.is_echo());
        assert_eq!(
            exchange.states,
            vec![
                ConnectionState::Disconnected,
                ConnectionState::Connected,
                ConnectionState::Sent,
                ConnectionState::Received,
                ConnectionState::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let client = TcpEchoClient::new(address, Duration::from_secs(5));
        let err = client.exchange(b"Hello, world").await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)), "got {:?}", err);
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let address = spawn_peer(|_| None).await;
        let client = TcpEchoClient::new(address, Duration::from_millis(200));

        let err = client.exchange(b"Hello, world").await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decode_error() {
        let address = spawn_peer(|_| Some(vec![0xff, 0xfe, 0x00])).await;
        let client = TcpEchoClient::new(address, Duration::from_secs(5));

        let err = client.exchange(b"Hello, world").await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_single_read_is_bounded() {
        let address = spawn_peer(|_| Some(vec![b'a'; 4000])).await;
        let client = TcpEchoClient::new(address, Duration::from_secs(5));

        let exchange = client.exchange(b"Hello, world").await.unwrap();
        assert!(!exchange.received.is_empty());
        assert!(exchange.received.len() <= ECHO_RECV_BUFFER);
        assert!(!exchange.is_echo());
    }

    #[tokio::test]
    async fn test_empty_reply_accepted() {
        let address = spawn_peer(|_| Some(Vec::new())).await;
        let client = TcpEchoClient::new(address, Duration::from_secs(5));

        let exchange = client.exchange(b"Hello, world").await.unwrap();
        assert_eq!(exchange.text, "");
        assert_eq!(exchange.received_repr(), "b''");
    }

    #[tokio::test]
    async fn test_reset_during_read_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            // Closing with unread data in the receive buffer sends a reset
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(socket);
        });

        let client = TcpEchoClient::new(address.clone(), Duration::from_secs(5));
        let err = client.exchange(b"Hello, world").await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)), "got {:?}", err);
        assert!(err.to_string().contains(&address));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_logged_exchange_still_succeeds() {
        let address = spawn_peer(Some).await;
        let config = Config { log_level: Some("error".to_string()), ..Default::default() };
        let client = TcpEchoClient::new(address, Duration::from_secs(5))
            .with_logger(NetworkLogger::new(&config));

        let exchange = client.exchange(b"ping").await.unwrap();
        assert_eq!(exchange.text, "ping");
    }

    #[test]
    fn test_from_config() {
        let client = TcpEchoClient::from_config(&Config::default());
        assert_eq!(client.target(), "127.0.0.1:9000");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
