use std::path::Path;

/// Initializes the logger with custom formatting.
///
/// Always logs to stderr; additionally logs to `<log_dir>/aesdsocket.log`
/// when `log_dir` is given (daemonized runs have no attached terminal to
/// write to).
pub fn init_logger(log_dir: Option<&Path>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{:<5}] [{}:{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                std::thread::current().name().unwrap_or("<unnamed>"),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr());

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        dispatch = dispatch.chain(fern::log_file(dir.join("aesdsocket.log"))?);
    }

    dispatch.apply().map_err(fern::InitError::SetLoggerError)
}
