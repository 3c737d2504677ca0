// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Markdown rendering of a [`Report`].
//!
//! The layout is kept stable so regenerated tables diff cleanly against older
//! ones, down to the odd separator row:
//!
//! ```text
//! # Some system registers
//!
//!
//! ## 0. Register `MAIR_EL1`
//!
//! 0. Environment A
//! 1. Environment B
//!
//! | Field\Env | `0` | `1` |
//! |---|---| ---|
//! | `value` | [00] | [44] |
//! ```

use std::fmt;
use std::io;

use super::{RegisterSection, Report};

impl Report {
    /// Writes the rendered report to `out` and flushes it.
    pub fn write_to(&self, out: &mut dyn io::Write) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# {}\n\n", self.title)?;
        for section in &self.sections {
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RegisterSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n## {}. Register `{}`\n\n", self.index, self.register)?;

        for (i, env) in self.environments.iter().enumerate() {
            writeln!(f, "{i}. {env}")?;
        }
        writeln!(f)?;

        f.write_str("| Field\\Env |")?;
        for i in 0..self.environments.len() {
            write!(f, " `{i}` |")?;
        }
        writeln!(f)?;

        // One "|" per header cell joined by "---", then a trailing " ---|".
        f.write_str("|")?;
        for _ in 0..self.environments.len() {
            f.write_str("---|")?;
        }
        f.write_str(" ---|\n")?;

        for row in &self.rows {
            write!(f, "| `{}` |", row.field)?;
            for cell in &row.cells {
                write!(f, " {cell} |")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
