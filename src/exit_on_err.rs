use core::fmt::Display;

/// Startup helper: logs why the bot can't start and exits instead of panicking.
pub(crate) trait MapOrExit<V> {
    fn map_or_exit<M: AsRef<str>>(self, message: M) -> V;
}

impl<V, E: Display> MapOrExit<V> for Result<V, E> {
    fn map_or_exit<M: AsRef<str>>(self, message: M) -> V {
        self.unwrap_or_else(|e| exit(format_args!("{}: {}", message.as_ref(), e)))
    }
}

fn exit(reason: std::fmt::Arguments<'_>) -> ! {
    log::error!("{}", reason);
    std::process::exit(1);
}
