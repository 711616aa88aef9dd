/// TI file and volume name rules
///
/// TI names are at most 10 printable ASCII characters. A `.` separates the
/// device, volume and file parts of a TI path, so it never appears in a name,
/// and spaces are reserved for padding. Host path separators are refused so a
/// TI name is always a single host path component.

use crate::format::MAX_NAME_LENGTH;
use std::path::Path;

/// Name used when nothing usable survives cleaning a host file name
pub const DEFAULT_FILE_NAME: &str = "UNNAMED";

/// Name used when nothing usable survives cleaning a directory name
pub const DEFAULT_VOLUME_NAME: &str = "FIAD";

/// Check if a character may appear in a TI name
pub fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '.' | '/' | '\\')
}

/// Uppercase, replace separators, drop unusable characters and truncate
fn clean_name(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '.' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .filter(|&c| is_valid_name_char(c))
        .take(MAX_NAME_LENGTH)
        .collect()
}

/// Convert a host file name to a TI file name
///
/// The last extension is removed (`HELLO.TXT` becomes `HELLO`), the rest is
/// uppercased and truncated to 10 characters.
pub fn to_ti_file_name(host_name: &str) -> String {
    let stem = Path::new(host_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(host_name);

    let name = clean_name(stem);
    if name.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        name
    }
}

/// Convert a host directory name to a TI volume name
pub fn to_ti_volume_name(dir_name: &str) -> String {
    let name = clean_name(dir_name);
    if name.is_empty() {
        DEFAULT_VOLUME_NAME.to_string()
    } else {
        name
    }
}

/// Check if a string is already a valid TI name
pub fn is_valid_ti_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LENGTH && name.chars().all(is_valid_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_removed() {
        assert_eq!(to_ti_file_name("HELLO.TXT"), "HELLO");
        assert_eq!(to_ti_file_name("hello.txt"), "HELLO");
    }

    #[test]
    fn test_only_last_extension_removed() {
        assert_eq!(to_ti_file_name("game.v2.bin"), "GAME_V2");
    }

    #[test]
    fn test_truncated_to_ten() {
        assert_eq!(to_ti_file_name("VERYLONGFILENAME"), "VERYLONGFI");
        assert_eq!(to_ti_file_name("VERYLONGFILENAME.X"), "VERYLONGFI");
    }

    #[test]
    fn test_spaces_replaced() {
        assert_eq!(to_ti_file_name("my game"), "MY_GAME");
    }

    #[test]
    fn test_unusable_names() {
        assert_eq!(to_ti_file_name(".txt"), "_TXT");
        assert_eq!(to_ti_file_name("\u{e9}\u{e8}"), DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_volume_name_keeps_dots_as_underscores() {
        assert_eq!(to_ti_volume_name("games.disk"), "GAMES_DISK");
        assert_eq!(to_ti_volume_name("extended basic"), "EXTENDED_B");
        assert_eq!(to_ti_volume_name(""), DEFAULT_VOLUME_NAME);
    }

    #[test]
    fn test_is_valid_ti_name() {
        assert!(is_valid_ti_name("HELLO"));
        assert!(is_valid_ti_name("TEN_CHARSX"));
        assert!(!is_valid_ti_name("ELEVENCHARS"));
        assert!(!is_valid_ti_name("A.B"));
        assert!(!is_valid_ti_name("A B"));
        assert!(!is_valid_ti_name(""));
        assert!(!is_valid_ti_name("../ESCAPE"));
        assert!(!is_valid_ti_name("/tmp/x"));
        assert!(!is_valid_ti_name("A\\B"));
    }
}
