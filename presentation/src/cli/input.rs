//! Reading items and context from files or stdin

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Read non-blank lines as items, trailing whitespace trimmed.
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let item = line.trim_end();
        if !item.trim_start().is_empty() {
            items.push(item.to_string());
        }
    }
    Ok(items)
}

/// Items from `path`, or from stdin when `None` or `-`.
pub fn read_items(path: Option<&Path>) -> io::Result<Vec<String>> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => read_lines(BufReader::new(File::open(path)?)),
        None => read_lines(io::stdin().lock()),
    }
}

/// Whole text from `path`, or from stdin when `None` or `-`.
pub fn read_text(path: Option<&Path>) -> io::Result<String> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = Cursor::new("Apple\n\n  \nChocolate  \r\nCarrot");
        let items = read_lines(input).unwrap();
        assert_eq!(items, vec!["Apple", "Chocolate", "Carrot"]);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let items = read_lines(Cursor::new("  indented\n")).unwrap();
        assert_eq!(items, vec!["  indented"]);
    }
}
