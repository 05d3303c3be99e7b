//! Fire-and-forget UDP publishing of samples.
//!
//! Every sample becomes exactly one datagram holding a compact JSON object.
//! Nothing is awaited from the receiver and nothing is retried.

use crate::error::{Result, SystemError};
use crate::metrics::data::Sample;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Serialize a sample into the wire payload.
pub fn encode(sample: &Sample) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(sample)?)
}

/// Parse a wire payload back into a sample.
pub fn decode(payload: &[u8]) -> Result<Sample> {
    Ok(serde_json::from_slice(payload)?)
}

/// Owns the datagram socket for the lifetime of the loop.
#[derive(Debug)]
pub struct UdpPublisher {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpPublisher {
    /// Bind an ephemeral local socket able to reach `target`.
    pub async fn bind(target: SocketAddr) -> Result<Self> {
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(local).await.map_err(|e| {
            SystemError::network_error(format!("failed to bind UDP socket: {}", e))
        })?;
        debug!(local = ?socket.local_addr().ok(), remote = %target, "UDP socket bound");

        Ok(Self { socket, target })
    }

    /// Destination of every datagram.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encode and send one sample, returning the number of bytes sent.
    pub async fn send(&self, sample: &Sample) -> Result<usize> {
        let payload = encode(sample)?;
        self.socket
            .send_to(&payload, self.target)
            .await
            .map_err(|e| SystemError::network_error(format!("send to {} failed: {}", self.target, e)))
    }

    /// Send one sample and log the operator summary.
    ///
    /// Returns whether the datagram was handed to the OS. A failure is logged
    /// and otherwise ignored; the sample is dropped.
    pub async fn publish(&self, sample: &Sample) -> bool {
        match self.send(sample).await {
            Ok(bytes) => {
                debug!(bytes, remote = %self.target, "Datagram sent");
                info!("{}", sample.summary_line());
                true
            }
            Err(err) => {
                warn!("Send error: {}", err);
                false
            }
        }
    }

    /// Release the socket.
    ///
    /// Consumes the publisher, so the socket is closed exactly once.
    pub fn close(self) {
        debug!(remote = %self.target, "Closing UDP socket");
        drop(self.socket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::data::Status;
    use std::time::Duration;

    fn sample() -> Sample {
        Sample {
            timestamp: "09:30".to_string(),
            cpu_percent: 3.5,
            ram_percent: 20.0,
            ram_used_gb: 3.2,
            ram_total_gb: 16.0,
            disk_percent: 50.1,
            cpu_temp: None,
            gpu_temp: Some(40),
            fan_speed: None,
            status: Status::Online,
        }
    }

    #[test]
    fn test_encode_is_compact_with_nulls() {
        let payload = String::from_utf8(encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            payload,
            r#"{"timestamp":"09:30","cpu_percent":3.5,"ram_percent":20.0,"ram_used_gb":3.2,"ram_total_gb":16.0,"disk_percent":50.1,"cpu_temp":null,"gpu_temp":40,"fan_speed":null,"status":"online"}"#
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode(b"not json"),
            Err(SystemError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_requires_hardware_fields() {
        let omitted = br#"{"timestamp":"14:07","cpu_percent":1.0,"ram_percent":2.0,"ram_used_gb":0.5,"ram_total_gb":16.0,"disk_percent":3.0,"status":"online"}"#;
        assert!(matches!(decode(omitted), Err(SystemError::Serialization(_))));

        let nulls = br#"{"timestamp":"14:07","cpu_percent":1.0,"ram_percent":2.0,"ram_used_gb":0.5,"ram_total_gb":16.0,"disk_percent":3.0,"cpu_temp":null,"gpu_temp":null,"fan_speed":null,"status":"online"}"#;
        let sample = decode(nulls).unwrap();
        assert_eq!(sample.cpu_temp, None);
        assert_eq!(sample.fan_speed, None);
    }

    #[test]
    fn test_decode_rejects_unknown_fields() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["bogus"] = serde_json::json!(7);
        let payload = serde_json::to_vec(&value).unwrap();
        assert!(matches!(decode(&payload), Err(SystemError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_publish_reports_send_failure() {
        // Broadcast without SO_BROADCAST is refused by the OS.
        let publisher = UdpPublisher::bind("255.255.255.255:4210".parse().unwrap())
            .await
            .unwrap();

        assert!(publisher.send(&sample()).await.is_err());
        assert!(!publisher.publish(&sample()).await);
    }

    #[tokio::test]
    async fn test_publish_delivers_one_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let publisher = UdpPublisher::bind(receiver.local_addr().unwrap())
            .await
            .unwrap();

        assert!(publisher.publish(&sample()).await);

        let mut buf = [0u8; 1024];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(decode(&buf[..len]).unwrap(), sample());

        publisher.close();
    }
}
