//! Members command: lists archive members and the ones picked per stream.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use cs_core::StreamKind;

use crate::archive::{Archive, guess_member};

/// Runs the members command.
pub fn run(archive: &Path) -> Result<()> {
    let names = Archive::open(archive)?.member_names()?;
    print!("{}", format_members(&names));
    Ok(())
}

/// Formats member names one per line, marking the guessed stream members.
pub fn format_members(names: &[String]) -> String {
    let mut output = String::new();

    if names.is_empty() {
        writeln!(output, "Archive has no file members.").unwrap();
        return output;
    }

    let guesses: Vec<(StreamKind, Option<String>)> = StreamKind::ALL
        .iter()
        .map(|&kind| (kind, guess_member(names, kind)))
        .collect();

    for name in names {
        let picked: Vec<&str> = guesses
            .iter()
            .filter(|(_, guess)| guess.as_deref() == Some(name.as_str()))
            .map(|(kind, _)| kind.as_str())
            .collect();
        if picked.is_empty() {
            writeln!(output, "{name}").unwrap();
        } else {
            writeln!(output, "{name}  [{}]", picked.join(", ")).unwrap();
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_format_members_marks_guesses() {
        let names: Vec<String> = [
            "Activity/Watch History.txt",
            "Activity/Like List.txt",
            "Profile/Profile Info.txt",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_snapshot!(format_members(&names), @r"
        Activity/Watch History.txt  [watch]
        Activity/Like List.txt  [like]
        Profile/Profile Info.txt
        ");
    }

    #[test]
    fn test_format_members_empty() {
        assert_eq!(format_members(&[]), "Archive has no file members.\n");
    }
}
