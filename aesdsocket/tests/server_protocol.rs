//! End-to-end exercise of the TCP line protocol against the real
//! `connection::handle` entry point, without going through `main`'s
//! daemonization/signal plumbing.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use aesd_device::DeviceSurface;
use aesdsocket::connection;
use aesdsocket::sink::Sink;

fn start_server() -> (std::net::SocketAddr, Arc<Sink>, Arc<DeviceSurface>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(Sink::create(dir.path().join("sink")).unwrap());
    let device = Arc::new(DeviceSurface::new(10));
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let sink_for_thread = Arc::clone(&sink);
    let device_for_thread = Arc::clone(&device);
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            connection::handle(stream, Arc::clone(&sink_for_thread), Arc::clone(&device_for_thread));
        }
    });

    (addr, sink, device, dir)
}

fn send_and_recv(addr: std::net::SocketAddr, line: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(line).unwrap();
    stream.shutdown(std::net::Shutdown::Write).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn single_write_is_echoed_back_in_full() {
    let (addr, _sink, _device, _dir) = start_server();
    let response = send_and_recv(addr, b"hello\n");
    assert_eq!(response, b"hello\n");
}

#[test]
fn second_connection_sees_accumulated_content() {
    let (addr, _sink, _device, _dir) = start_server();
    assert_eq!(send_and_recv(addr, b"a\n"), b"a\n");
    assert_eq!(send_and_recv(addr, b"b\n"), b"a\nb\n");
}

#[test]
fn ioctl_directive_does_not_touch_the_sink() {
    let (addr, sink, _device, _dir) = start_server();
    send_and_recv(addr, b"a\n");
    send_and_recv(addr, b"bb\n");
    send_and_recv(addr, b"ccc\n");

    let before = std::fs::read(sink.path()).unwrap();
    let response = send_and_recv(addr, b"AESDCHAR_IOCSEEKTO:1,1\n");
    let after = std::fs::read(sink.path()).unwrap();

    assert_eq!(before, after);
    assert_eq!(response, b"b\nccc\n");
}

#[test]
fn connection_with_no_data_gets_no_response() {
    let (addr, _sink, _device, _dir) = start_server();
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.shutdown(std::net::Shutdown::Write).unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert!(out.is_empty());
}
