use std::io;

use crate::names::display_name;
use crate::parser::{OptionDef, Parser};

const SEPARATOR_HELP: &str = "Disable option parsing";

fn format_option_left(def: &OptionDef<'_>) -> String {
    let mut out = def
        .names
        .iter()
        .map(|n| display_name(n))
        .collect::<Vec<_>>()
        .join(", ");
    if def.takes_value() {
        out.push_str(&format!(" <{}>", def.value_name));
    }
    out
}

fn push_row(out: &mut String, left: &str, help: &str, width: usize) {
    out.push_str(&format!("  {left:width$}  {help}\n"));
}

impl Parser<'_> {
    /// Render the usage text for `program_name`.
    ///
    /// Options are listed in declaration order, followed by the `--`
    /// separator. Every row is padded so descriptions of options and
    /// arguments start at one column; descriptions are written as declared.
    pub fn usage_string(&self, program_name: &str) -> String {
        let mut out = format!("Usage: {program_name}");
        if !self.options.is_empty() {
            out.push_str(" [options]");
        }
        for pos in &self.positionals {
            out.push(' ');
            out.push_str(&pos.value_name);
        }
        out.push('\n');

        let mut option_rows: Vec<(String, &str)> = self
            .options
            .iter()
            .map(|def| (format_option_left(def), def.description.as_str()))
            .collect();
        if !option_rows.is_empty() {
            option_rows.push(("--".to_string(), SEPARATOR_HELP));
        }

        let width = option_rows
            .iter()
            .map(|(left, _)| left.chars().count())
            .chain(self.positionals.iter().map(|p| p.value_name.chars().count()))
            .max()
            .unwrap_or(0);

        if !option_rows.is_empty() {
            out.push_str("\nOptions:\n");
            for (left, help) in &option_rows {
                push_row(&mut out, left, help, width);
            }
        }

        if !self.positionals.is_empty() {
            out.push_str("\nArguments:\n");
            for pos in &self.positionals {
                push_row(&mut out, &pos.value_name, &pos.description, width);
            }
        }

        out
    }

    /// Write the usage text for `program_name` to `sink`.
    pub fn usage<W: io::Write + ?Sized>(&self, sink: &mut W, program_name: &str) -> io::Result<()> {
        sink.write_all(self.usage_string(program_name).as_bytes())
    }
}
