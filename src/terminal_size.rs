//! Width of the attached terminal

/// Columns of the terminal on stdout, or `$COLUMNS` when stdout is not a
/// terminal
pub fn ambient_columns() -> Option<usize> {
    window_columns().or_else(|| columns_from_env(std::env::var("COLUMNS").ok().as_deref()))
}

#[cfg(unix)]
fn window_columns() -> Option<usize> {
    use nix::libc;
    use nix::pty::Winsize;

    let mut ws = Winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ only writes a winsize struct through the pointer
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(usize::from(ws.ws_col))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn window_columns() -> Option<usize> {
    None
}

fn columns_from_env(value: Option<&str>) -> Option<usize> {
    value?.trim().parse().ok().filter(|&columns| columns > 0)
}
