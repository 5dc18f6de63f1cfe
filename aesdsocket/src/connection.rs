//! Per-connection handler: receive one line, append-and-echo, or forward an
//! inline seek directive to the device surface.
//!
//! Every normal write is mirrored into both the sink and the device
//! surface as it arrives, so the device surface's log never needs a
//! separate catch-up pass before serving an `ioctl` directive — it is
//! always already consistent with the sink's content.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use aesd_device::{DeviceSurface, SeekTo};

use crate::sink::Sink;

const RECV_BUFFER_SIZE: usize = aesd_shared::constants::RECV_BUFFER_SIZE;
const IOCTL_PREFIX: &str = aesd_shared::constants::IOCTL_SEEK_PREFIX;

/// Handles one accepted connection to completion: at most one line in, at
/// most one response out, then the socket is closed.
pub fn handle(mut stream: TcpStream, sink: Arc<Sink>, device: Arc<DeviceSurface>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".into());
    log::info!("accepted connection from {peer}");

    let line = match receive_line(&mut stream) {
        Ok(line) => line,
        Err(err) => {
            log::warn!("connection {peer} recv error: {err}");
            return;
        }
    };
    if line.is_empty() {
        log::debug!("connection {peer} closed without sending data");
        return;
    }

    let response = match parse_seek_directive(&line) {
        Some(seek) => handle_seek(&device, seek),
        None => handle_append(&sink, &device, &line),
    };

    match response {
        Ok(bytes) => {
            if let Err(err) = stream.write_all(&bytes) {
                log::warn!("connection {peer} send error: {err}");
            }
        }
        Err(err) => log::warn!("connection {peer} failed to produce a response: {err}"),
    }
    log::info!("closed connection from {peer}");
}

/// Reads from `stream` until a `\n` is seen or the peer closes.
fn receive_line(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let mut line = Vec::new();
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(line);
        }
        match buf[..n].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                line.extend_from_slice(&buf[..=pos]);
                return Ok(line);
            }
            None => line.extend_from_slice(&buf[..n]),
        }
    }
}

fn parse_seek_directive(line: &[u8]) -> Option<SeekTo> {
    let text = std::str::from_utf8(line).ok()?;
    let rest = text.strip_prefix(IOCTL_PREFIX)?;
    let rest = rest.trim_end_matches('\n');
    let (cmd, offset) = rest.split_once(',')?;
    Some(SeekTo {
        cmd: cmd.parse().ok()?,
        cmd_offset: offset.parse().ok()?,
    })
}

fn handle_seek(device: &DeviceSurface, seek: SeekTo) -> Result<Vec<u8>, std::io::Error> {
    let cursor = device.ioctl_seek(seek)?;
    let (bytes, _) = device.read(cursor, usize::MAX);
    Ok(bytes)
}

fn handle_append(
    sink: &Sink,
    device: &DeviceSurface,
    line: &[u8],
) -> Result<Vec<u8>, std::io::Error> {
    device.write(line)?;
    Ok(sink.append_and_read_all(line)?)
}
