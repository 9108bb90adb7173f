//! Kernel entry-point numbers.
//!
//! Each operation the benchmark knows about is listed here together with the
//! number the build target's kernel ABI assigns it, if it assigns one. The
//! registry only ever contains operations whose number resolved.

/// An operation name paired with its kernel entry-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Operation name, as used on the command line.
    pub name: &'static str,
    /// Entry-point number, `None` when the target kernel has no such call.
    pub number: Option<usize>,
}

impl EntryPoint {
    /// Creates a table row.
    pub const fn new(name: &'static str, number: Option<usize>) -> Self {
        Self { name, number }
    }

    /// Whether the operation can be invoked on this target.
    pub const fn is_resolved(&self) -> bool {
        self.number.is_some()
    }
}

/// Linux x86-64 system call numbers.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub mod nr {
    /// `gettimeofday(2)`
    pub const GETTIMEOFDAY: usize = 96;
    /// `time(2)`
    pub const TIME: usize = 201;
    /// `getcpu(2)`
    pub const GETCPU: usize = 309;
}

/// Every operation, in registry order.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub const ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint::new("getcpu", Some(nr::GETCPU)),
    EntryPoint::new("gettimeofday", Some(nr::GETTIMEOFDAY)),
    EntryPoint::new("time", Some(nr::TIME)),
];

/// Every operation, in registry order.
#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub const ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint::new("getcpu", None),
    EntryPoint::new("gettimeofday", None),
    EntryPoint::new("time", None),
];

/// Looks up the entry-point number for `name`.
pub fn lookup(name: &str) -> Option<usize> {
    ENTRY_POINTS
        .iter()
        .find(|ep| ep.name == name)
        .and_then(|ep| ep.number)
}

/// Whether at least one operation in `table` resolved.
pub fn any_resolved(table: &[EntryPoint]) -> bool {
    table.iter().any(EntryPoint::is_resolved)
}
