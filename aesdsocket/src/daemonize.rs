//! Classic double-step daemonization: fork, detach from the controlling
//! terminal, redirect the standard streams, then let the child keep
//! running.
//!
//! Grounded on the original server's `daemonize()` (fork, `setsid`, `chdir`,
//! close/reopen of stdin/stdout/stderr against `/dev/null`), expressed here
//! with `libc` rather than hand-written syscall numbers, matching the
//! corpus's convention of reaching for `libc` for raw POSIX operations.

use std::ffi::CString;
use std::io;
use std::path::Path;

use aesd_shared::errors::ServerError;

/// Forks the process and exits the parent. The child detaches from its
/// session, changes to `/`, and closes/reopens the standard streams onto
/// `/dev/null`. Returns only in the child.
pub fn daemonize() -> Result<(), ServerError> {
    // SAFETY: single-threaded at this point in startup (called before any
    // worker thread is spawned), so fork is sound here.
    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(ServerError::Daemonize(
            io::Error::last_os_error().to_string(),
        ));
    }
    if pid > 0 {
        std::process::exit(0);
    }

    // SAFETY: plain libc calls with no shared mutable state.
    unsafe {
        if libc::setsid() < 0 {
            return Err(ServerError::Daemonize(
                io::Error::last_os_error().to_string(),
            ));
        }

        let root = CString::new("/").expect("constant path has no interior NUL");
        if libc::chdir(root.as_ptr()) != 0 {
            return Err(ServerError::Daemonize(
                io::Error::last_os_error().to_string(),
            ));
        }

        let dev_null = CString::new("/dev/null").expect("constant path has no interior NUL");
        let null_fd = libc::open(dev_null.as_ptr(), libc::O_RDWR);
        if null_fd < 0 {
            return Err(ServerError::Daemonize(
                io::Error::last_os_error().to_string(),
            ));
        }
        libc::dup2(null_fd, libc::STDIN_FILENO);
        libc::dup2(null_fd, libc::STDOUT_FILENO);
        libc::dup2(null_fd, libc::STDERR_FILENO);
        if null_fd > libc::STDERR_FILENO {
            libc::close(null_fd);
        }
    }

    Ok(())
}

/// Writes the current process id to `path`, truncating any prior contents.
pub fn write_pid_file(path: &Path) -> Result<(), ServerError> {
    let pid = std::process::id();
    std::fs::write(path, pid.to_string())
        .map_err(|source| ServerError::Daemonize(format!("writing pid file: {source}")))
}
