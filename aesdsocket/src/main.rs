use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aesd_device::DeviceSurface;
use aesd_shared::constants::LOG_CAPACITY;
use aesdsocket::config::Config;
use aesdsocket::registry::HandlerRegistry;
use aesdsocket::sink::Sink;
use aesdsocket::timestamp::TimestampProducer;
use aesdsocket::{connection, daemonize, listener, logger};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

fn main() {
    let config = Config::parse();

    if let Err(err) = logger::init_logger(config.log_dir.as_deref()) {
        eprintln!("fatal: failed to initialize logger: {err}");
        std::process::exit(1);
    }

    if config.daemon {
        if let Err(err) = daemonize::daemonize() {
            log::error!("fatal: {err}");
            std::process::exit(1);
        }
    }

    if let Err(err) = run(&config) {
        log::error!("fatal: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), aesd_shared::errors::ServerError> {
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    register_signal_handlers(&shutdown_requested);

    let sink = Arc::new(Sink::create(&config.sink)?);
    let device = Arc::new(DeviceSurface::new(LOG_CAPACITY));
    let registry = Arc::new(HandlerRegistry::new());

    let listener = listener::bind_reuseaddr(config.port).map_err(|source| {
        aesd_shared::errors::ServerError::Bind {
            port: config.port,
            source,
        }
    })?;
    listener
        .set_nonblocking(true)
        .expect("setting listener nonblocking must succeed on a freshly bound socket");
    log::info!("listening on port {}", config.port);

    if config.daemon {
        daemonize::write_pid_file(&config.pid_file)?;
    }

    let timestamp_producer = if config.no_timestamps {
        None
    } else {
        Some(TimestampProducer::spawn(Arc::clone(&sink)))
    };

    accept_loop(&listener, &shutdown_requested, &sink, &device, &registry);

    log::info!("shutting down, waiting for connection handlers to finish");
    registry.join_all();
    drop(timestamp_producer);
    drop(sink);
    if config.daemon {
        if let Err(err) = std::fs::remove_file(&config.pid_file) {
            log::warn!("failed to remove pid file: {err}");
        }
    }
    log::info!("shutdown complete");
    Ok(())
}

fn accept_loop(
    listener: &TcpListener,
    shutdown_requested: &AtomicBool,
    sink: &Arc<Sink>,
    device: &Arc<DeviceSurface>,
    registry: &Arc<HandlerRegistry>,
) {
    while !shutdown_requested.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, addr)) => {
                let sink = Arc::clone(sink);
                let device = Arc::clone(device);
                let registry_for_thread = Arc::clone(registry);
                let id = registry.reserve(addr);
                let handle = std::thread::Builder::new()
                    .name("connection-handler".into())
                    .spawn(move || {
                        connection::handle(stream, sink, device);
                        registry_for_thread.mark_done(id);
                    })
                    .expect("failed to spawn connection handler thread");
                registry.attach(id, handle);
                registry.reap_finished();
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(err) => {
                log::error!("accept failed: {err}");
            }
        }
    }
}

fn register_signal_handlers(running: &Arc<AtomicBool>) {
    for sig in [SIGINT, SIGTERM] {
        if let Err(err) = signal_hook::flag::register(sig, Arc::clone(running)) {
            log::warn!("failed to register handler for signal {sig}: {err}");
        }
    }
}
