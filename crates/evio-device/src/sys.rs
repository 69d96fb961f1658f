//! Raw system calls.

#![expect(unsafe_code, reason = "ioctl(2) and poll(2) have no safe std wrapper")]

use evio_ioctl::ControlCode;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Which descriptor became readable.
pub(crate) enum Ready {
    Device,
    Woken,
}

/// Issues a control call passing `value` by value.
pub(crate) fn ioctl_value(
    fd: BorrowedFd<'_>,
    code: ControlCode,
    value: libc::c_int,
) -> io::Result<i32> {
    // SAFETY: `fd` is a live descriptor for the duration of the borrow and the
    // request takes its argument by value, so no memory is shared.
    let rc = unsafe { libc::ioctl(fd.as_raw_fd(), code.as_raw(), value) };
    check(rc)
}

/// Issues a control call passing `buf` by reference.
///
/// The caller has checked that `buf` is at least as large as the size
/// encoded in `code`, which bounds what the driver reads or writes.
pub(crate) fn ioctl_buffer(
    fd: BorrowedFd<'_>,
    code: ControlCode,
    buf: &mut [u8],
) -> io::Result<i32> {
    let ptr = buf.as_mut_ptr();
    // SAFETY: `fd` is live, `ptr` points to `buf.len() >= code.size()` writable
    // bytes that stay borrowed until the call returns.
    let rc = unsafe { libc::ioctl(fd.as_raw_fd(), code.as_raw(), ptr) };
    check(rc)
}

/// Blocks until `dev` or `wake` is readable. Retries on `EINTR`.
pub(crate) fn wait_readable(dev: BorrowedFd<'_>, wake: BorrowedFd<'_>) -> io::Result<Ready> {
    let mut fds = [
        libc::pollfd {
            fd: dev.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: wake.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        },
    ];
    loop {
        let nfds = fds.len() as libc::nfds_t;
        // SAFETY: `fds` is a valid array of `nfds` pollfd entries that lives
        // across the call.
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), nfds, -1) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        let [dev_fd, wake_fd] = &fds;
        if wake_fd.revents != 0 {
            return Ok(Ready::Woken);
        }
        // POLLERR and POLLHUP also count: the following read reports them.
        if dev_fd.revents != 0 {
            return Ok(Ready::Device);
        }
    }
}

fn check(rc: libc::c_int) -> io::Result<i32> {
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rc)
    }
}
