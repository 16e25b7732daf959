use std::io;
use std::os::fd::RawFd;

/// Adds `O_NONBLOCK` to `fd`, leaving the other status flags untouched.
pub fn set_non_blocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fcntl with F_GETFL only reads the descriptor's status flags.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    if flags & libc::O_NONBLOCK != 0 {
        return Ok(());
    }

    // SAFETY: F_SETFL only updates status flags on a descriptor we were handed.
    let result = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixStream;

    #[test]
    fn test_read_would_block_after_set() {
        let (mut reader, _writer) = UnixStream::pair().unwrap();
        set_non_blocking(reader.as_raw_fd()).unwrap();

        let mut buf = [0u8; 8];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_idempotent() {
        let (reader, _writer) = UnixStream::pair().unwrap();
        set_non_blocking(reader.as_raw_fd()).unwrap();
        set_non_blocking(reader.as_raw_fd()).unwrap();
    }

    #[test]
    fn test_bad_descriptor() {
        let err = set_non_blocking(-1).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EBADF));
    }
}
