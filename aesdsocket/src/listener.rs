//! Binds a listening socket with `SO_REUSEADDR`, matching the original
//! server's `socket()`/`setsockopt(SO_REUSEADDR)`/`bind()`/`listen()`
//! sequence. `std::net::TcpListener::bind` alone does not set this option,
//! so a restarted server would otherwise fail to rebind a recently-used
//! port until the OS's `TIME_WAIT` interval elapses.

use std::net::TcpListener;
use std::os::unix::io::FromRawFd;

const LISTEN_BACKLOG: i32 = 128;

pub fn bind_reuseaddr(port: u16) -> std::io::Result<TcpListener> {
    // SAFETY: each libc call's return value is checked before the next is
    // made; `fd` is only ever handed to `TcpListener::from_raw_fd` (which
    // then owns it) once every prior step has succeeded.
    unsafe {
        let fd = libc::socket(libc::AF_INET, libc::SOCK_STREAM, 0);
        if fd < 0 {
            return Err(std::io::Error::last_os_error());
        }

        let enable: libc::c_int = 1;
        let rc = libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &enable as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        );
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        let addr = libc::sockaddr_in {
            sin_family: libc::AF_INET as libc::sa_family_t,
            sin_port: port.to_be(),
            sin_addr: libc::in_addr { s_addr: libc::INADDR_ANY.to_be() },
            sin_zero: [0; 8],
        };
        let rc = libc::bind(
            fd,
            &addr as *const _ as *const libc::sockaddr,
            std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        );
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        if libc::listen(fd, LISTEN_BACKLOG) != 0 {
            let err = std::io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        Ok(TcpListener::from_raw_fd(fd))
    }
}
