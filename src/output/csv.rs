use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Quote a field if it contains a comma, quote, or newline.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write a header row plus data rows to `path`. Rows are written in the
/// order given, so identical input always produces identical bytes.
pub fn write_table(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{}", header.join(","))?;
    for row in rows {
        let line = row
            .iter()
            .map(|field| csv_escape(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(w, "{line}")?;
    }

    w.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_escape("Alice"), "Alice");
        assert_eq!(csv_escape(""), "");
        assert_eq!(csv_escape("12/11/2023"), "12/11/2023");
    }

    #[test]
    fn commas_and_newlines_get_quoted() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn writes_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            vec!["A1".to_string(), "Demo, part 2".to_string()],
            vec!["B2".to_string(), "Other".to_string()],
        ];

        write_table(&path, &["id", "title"], &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,title\nA1,\"Demo, part 2\"\nB2,Other\n");
    }

    #[test]
    fn rewriting_identical_rows_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        let rows = vec![vec!["A1".to_string(), "Demo".to_string()]];

        write_table(&first, &["id", "title"], &rows).unwrap();
        write_table(&second, &["id", "title"], &rows).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }
}
