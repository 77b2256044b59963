// src/core/template.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;

lazy_static! {
    // `$1`, `$2`, ... Captures the whole digit run so `$1` never matches inside `$10`.
    static ref POSITIONAL_RE: Regex = Regex::new(r"\$([0-9]+)").unwrap();
}

/// The catch-all marker, replaced by every argument not consumed positionally.
const CATCH_ALL_MARKER: &str = "$@";

/// Builds a final command line from a script template and the raw extra arguments.
///
/// 1. `extra_args` is split on whitespace.
/// 2. `$1`, `$2`, ... are replaced in increasing order, each by the next unconsumed
///    argument (or nothing when none is left). The walk stops at the first index
///    with no marker in the template.
/// 3. `$@` is replaced by all remaining arguments, joined by single spaces.
/// 4. Arguments still unconsumed are appended to the end.
pub fn build_command_line(template: &str, extra_args: &str) -> String {
    let mut remaining: VecDeque<&str> = extra_args.split_whitespace().collect();
    let mut command = template.to_string();

    let mut index = 1usize;
    while let Some(substituted) = replace_positional(&command, index, &mut remaining) {
        command = substituted;
        index += 1;
    }

    if command.contains(CATCH_ALL_MARKER) {
        let rest = remaining.drain(..).collect::<Vec<_>>().join(" ");
        command = command.replace(CATCH_ALL_MARKER, &rest);
    }

    if !remaining.is_empty() {
        let rest = remaining.drain(..).collect::<Vec<_>>().join(" ");
        command.push(' ');
        command.push_str(&rest);
    }

    command
}

/// Replaces every `$<index>` marker with the next argument.
/// Returns `None` when the template has no marker for `index`.
fn replace_positional(
    command: &str,
    index: usize,
    remaining: &mut VecDeque<&str>,
) -> Option<String> {
    let has_marker = POSITIONAL_RE
        .captures_iter(command)
        .any(|caps| marker_index(&caps) == Some(index));
    if !has_marker {
        return None;
    }

    let value = remaining.pop_front().unwrap_or_default();
    let replaced = POSITIONAL_RE.replace_all(command, |caps: &regex::Captures<'_>| {
        if marker_index(caps) == Some(index) {
            value.to_string()
        } else {
            caps.get(0).map_or("", |m| m.as_str()).to_string()
        }
    });
    Some(replaced.into_owned())
}

fn marker_index(caps: &regex::Captures<'_>) -> Option<usize> {
    caps.get(1).and_then(|m| m.as_str().parse().ok())
}
