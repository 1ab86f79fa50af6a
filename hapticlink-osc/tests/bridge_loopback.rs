//! Loopback integration tests for the bridge
//!
//! Builds a real bridge on ephemeral localhost sockets, feeds datagrams
//! straight into the handler, and checks what arrives at the device and
//! default targets.

use std::net::UdpSocket;
use std::time::Duration;

use hapticlink_osc::{codec, BridgeConfig, OscBridge};

struct Receiver {
    socket: UdpSocket,
}

impl Receiver {
    fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        Self { socket }
    }

    fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    fn recv(&self) -> Vec<u8> {
        let mut buf = [0u8; 1536];
        let (n, _) = self.socket.recv_from(&mut buf).unwrap();
        buf[..n].to_vec()
    }

    fn recv_none(&self) {
        let mut buf = [0u8; 1536];
        assert!(self.socket.recv_from(&mut buf).is_err(), "unexpected datagram");
    }
}

fn bridge_for(device_port: u16, default_port: u16) -> OscBridge {
    let config = format!(
        r#"{{
            "listen": {{ "ip": "127.0.0.1", "port": 0 }},
            "default_target": {{ "ip": "127.0.0.1", "port": {default_port} }},
            "detectors": [ {{ "key": "Contact", "radius": 1.0 }} ],
            "devices": [ {{
                "name": "Wrist",
                "target": {{ "ip": "127.0.0.1", "port": {device_port} }},
                "detector_keys": ["Contact"],
                "min_velocity": 0.0,
                "max_velocity": 1.0,
                "proximity_key": "WristTouch",
                "mode": 0
            }} ]
        }}"#
    );
    let config = BridgeConfig::parse(&config).unwrap();
    let router = config.build_router().unwrap();
    OscBridge::bind(config.listen_addr(), router).unwrap()
}

#[test]
fn device_message_forwards_computed_intensity_at_arrival_address() {
    let device = Receiver::bind();
    let fallback = Receiver::bind();
    let mut bridge = bridge_for(device.port(), fallback.port());

    bridge.handle_datagram(&codec::encode_float("/avatar/parameters/Contact", 0.2));
    bridge.handle_datagram(&codec::encode_float("/avatar/parameters/WristTouch", 1.0));
    device.recv(); // settle the position vector

    bridge.handle_datagram(&codec::encode_float("/avatar/parameters/Contact", 0.8));
    bridge.handle_datagram(&codec::encode_float("/avatar/parameters/WristTouch", 1.0));

    let msg = codec::decode(&device.recv()).unwrap();
    assert_eq!(msg.address, "/avatar/parameters/WristTouch");
    assert!((msg.last_value().unwrap() - 0.6).abs() < 1e-6);

    assert_eq!(bridge.stats().forwarded, 2);
    assert_eq!(bridge.stats().recorded, 2);
}

#[test]
fn detector_messages_produce_no_outbound_traffic() {
    let device = Receiver::bind();
    let fallback = Receiver::bind();
    let mut bridge = bridge_for(device.port(), fallback.port());

    bridge.handle_datagram(&codec::encode_float("/avatar/parameters/Contact", 0.4));

    device.recv_none();
    fallback.recv_none();
    assert_eq!(bridge.stats().recorded, 1);
}

#[test]
fn unmatched_datagrams_pass_through_byte_for_byte() {
    let device = Receiver::bind();
    let fallback = Receiver::bind();
    let mut bridge = bridge_for(device.port(), fallback.port());

    let original = codec::encode_float("/avatar/parameters/Foo", 3.14);
    bridge.handle_datagram(&original);

    assert_eq!(fallback.recv(), original);
    assert_eq!(bridge.stats().passthrough, 1);
}

#[test]
fn malformed_datagrams_are_dropped_not_fatal() {
    let device = Receiver::bind();
    let fallback = Receiver::bind();
    let mut bridge = bridge_for(device.port(), fallback.port());

    bridge.handle_datagram(b"\xff\xfe\xfd");
    bridge.handle_datagram(b"/unterminated");
    assert_eq!(bridge.stats().dropped, 2);

    // The bridge still routes fine afterwards.
    let original = codec::encode_float("/tracking/head", 1.0);
    bridge.handle_datagram(&original);
    assert_eq!(fallback.recv(), original);
}
