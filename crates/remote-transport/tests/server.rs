//! Multi-client server transport properties, exercised against a real
//! bound TCP socket and real client sockets on loopback.

use std::{net::SocketAddr, time::Duration};

use bytes::Bytes;
use remote_core::{Transport, TransportMessage};
use remote_transport::ServerTransport;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
    time::timeout,
};

const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

async fn bound_server(port: u16) -> (ServerTransport, mpsc::Receiver<TransportMessage>, SocketAddr) {
    let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
    let (tx, rx) = mpsc::channel(32);
    let server = ServerTransport::bind(addr, tx, MAX_FRAME_LEN).await.expect("bind should succeed");
    (server, rx, addr)
}

async fn connect_client(addr: SocketAddr) -> TcpStream {
    // The accept loop polls on a 100ms timeout; a brief retry loop keeps
    // this test from racing a listener that hasn't started accepting yet.
    for _ in 0..50 {
        if let Ok(stream) = TcpStream::connect(addr).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("could not connect to test server");
}

#[tokio::test]
async fn two_peers_both_receive_every_broadcast() {
    let (mut server, _rx, addr) = bound_server(18423).await;

    let mut client_a = connect_client(addr).await;
    let mut client_b = connect_client(addr).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    server.send(Bytes::from_static(b"hello")).await.expect("broadcast should report ok");

    let mut buf_a = [0u8; 5];
    let mut buf_b = [0u8; 5];
    timeout(Duration::from_secs(1), client_a.read_exact(&mut buf_a)).await.expect("timed out").unwrap();
    timeout(Duration::from_secs(1), client_b.read_exact(&mut buf_b)).await.expect("timed out").unwrap();

    assert_eq!(&buf_a, b"hello");
    assert_eq!(&buf_b, b"hello");
}

#[tokio::test]
async fn frames_from_a_peer_are_forwarded_intact() {
    let (server, mut rx, addr) = bound_server(18424).await;
    let mut client = connect_client(addr).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    // A frame with type 0x06 and a zero-length payload: [0x06, 0,0,0,0].
    client.write_all(&[0x06, 0x00, 0x00, 0x00, 0x00]).await.unwrap();

    let msg = timeout(Duration::from_secs(1), rx.recv()).await.expect("timed out").expect("channel closed");
    match msg {
        TransportMessage::Data { peer, bytes } => {
            assert!(peer.is_some());
            assert_eq!(&bytes[..], &[0x06, 0x00, 0x00, 0x00, 0x00]);
        },
        other => panic!("expected Data, got {other:?}"),
    }

    drop(server);
}

#[tokio::test]
async fn closing_one_peer_leaves_the_other_functional() {
    let (mut server, mut rx, addr) = bound_server(18425).await;

    let client_a = connect_client(addr).await;
    let mut client_b = connect_client(addr).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    drop(client_a);

    // Drain the Closed notification for the peer that went away.
    let closed = timeout(Duration::from_secs(1), rx.recv()).await.expect("timed out").expect("channel closed");
    assert!(matches!(closed, TransportMessage::Closed { peer: Some(_) }));

    assert!(server.connected());

    server.send(Bytes::from_static(b"still here")).await.expect("broadcast should report ok");
    let mut buf = [0u8; 10];
    timeout(Duration::from_secs(1), client_b.read_exact(&mut buf)).await.expect("timed out").unwrap();
    assert_eq!(&buf, b"still here");
}

