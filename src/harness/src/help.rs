//! Help text for the options this benchmark exposes.

use core::fmt;

/// One line of help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    /// Single-letter alias, if any.
    pub short: Option<&'static str>,
    /// Option name and argument placeholder.
    pub option: &'static str,
    /// What the option does.
    pub description: &'static str,
}

/// The selectable operation plus the two numeric limits the host owns.
pub static HELP: [HelpEntry; 3] = [
    HelpEntry {
        short: None,
        option: "x86syscall N",
        description: "start N workers exercising functions using syscall",
    },
    HelpEntry {
        short: None,
        option: "x86syscall-func F",
        description: "use just syscall function F",
    },
    HelpEntry {
        short: None,
        option: "x86syscall-ops N",
        description: "stop after N syscall function calls",
    },
];

/// Writes `entries` as an aligned two-column table.
pub fn write_help(out: &mut impl fmt::Write, entries: &[HelpEntry]) -> fmt::Result {
    let width = entries.iter().map(|e| e.option.len()).max().unwrap_or(0);
    for entry in entries {
        let short = entry.short.unwrap_or("");
        writeln!(
            out,
            " {:>2} --{:<width$}  {}",
            short,
            entry.option,
            entry.description,
            width = width
        )?;
    }
    Ok(())
}
