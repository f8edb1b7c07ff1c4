///! Some utility functions

use std::path::{Path, PathBuf};

use crate::event::Event;
use crate::group::Group;

/// The folder the companion binaries write their files to
pub const EXPORT_FOLDER: &str = "./exports";

/// Turn any name (e.g. a group name or an event heading) into something that can be used as a file name
pub fn sanitize_file_name(name: &str) -> String {
    let options = sanitize_filename::Options {
        truncate: true,
        windows: true,
        replacement: "",
    };
    sanitize_filename::sanitize_with_options(name, options)
        .trim_end()
        .to_string()
}

/// The path of `file_name` in `folder`, creating the folder if needed
pub fn export_path<P: AsRef<Path>>(folder: P, file_name: &str) -> std::io::Result<PathBuf> {
    let folder = folder.as_ref();
    std::fs::create_dir_all(folder)?;
    Ok(folder.join(file_name))
}

/// A debug utility that pretty-prints groups
pub fn print_group_list(groups: &[Group]) {
    for group in groups {
        println!("GROUP {}\t{}", group.id(), group.name());
        for member in group.members() {
            let guardians = if member.guardians().is_empty() { " " } else { "+" };
            println!("    {} {}\t{}", guardians, member.full_name(), member.id());
        }
    }
}

/// A debug utility that pretty-prints events
pub fn print_event(event: &Event) {
    let cancelled = if event.is_cancelled() { "x" } else { " " };
    println!("    {} {}  {}\t{}", cancelled, event.start_time().format("%Y-%m-%d %H:%M"), event.heading(), event.id());
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(sanitize_file_name("Under 12s / Girls"), "Under 12s  Girls");
        assert_eq!(sanitize_file_name("Trailing dots and spaces.  "), "Trailing dots and spaces");
        assert_eq!(sanitize_file_name("plain"), "plain");
        assert_eq!(sanitize_file_name("a:b*c?"), "abc");
    }
}
