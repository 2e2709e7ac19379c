use crate::error::SessionError;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Files in `dir` ending in `.<extension>`, sorted by name.
pub fn list_candidates(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(SessionError::NoVideoFiles {
            dir: dir.to_owned(),
            extension: extension.to_owned(),
        }
        .into());
    }
    Ok(files)
}

/// Asks for a 1-based choice until a valid one is entered.
pub fn choose<R: BufRead, W: Write>(
    candidates: &[PathBuf],
    mut input: R,
    mut output: W,
) -> Result<PathBuf> {
    writeln!(output, "Available files:")?;
    for (i, path) in candidates.iter().enumerate() {
        let name = path.file_name().unwrap_or(path.as_os_str());
        writeln!(output, "{}: {}", i + 1, name.to_string_lossy())?;
    }
    let mut line = String::new();
    loop {
        write!(output, "Select a file to use (1-{}): ", candidates.len())?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(SessionError::NoChoice.into());
        }
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=candidates.len()).contains(&choice) => {
                return Ok(candidates[choice - 1].clone());
            }
            Ok(_) => writeln!(output, "Invalid selection. Please try again.")?,
            Err(_) => writeln!(output, "Invalid input. Please enter a number.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.MP4", "c.avi", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.mp4")).unwrap();
        let files = list_candidates(dir.path(), "mp4").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["a.MP4", "b.mp4"]);
    }

    #[test]
    fn no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_candidates(dir.path(), "mp4").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::NoVideoFiles { .. })
        ));
    }

    #[test]
    fn reprompts_until_valid() {
        let candidates = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
        let mut output = vec![];
        let choice = choose(&candidates, "x\n0\n3\n 2 \n".as_bytes(), &mut output).unwrap();
        assert_eq!(choice, PathBuf::from("b.mp4"));
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("1: a.mp4\n2: b.mp4\n"));
        assert_eq!(output.matches("Invalid input").count(), 1);
        assert_eq!(output.matches("Invalid selection").count(), 2);
        assert_eq!(output.matches("Select a file to use (1-2): ").count(), 4);
    }

    #[test]
    fn closed_input() {
        let candidates = vec![PathBuf::from("a.mp4")];
        let err = choose(&candidates, "abc\n".as_bytes(), std::io::sink()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::NoChoice)
        ));
    }
}
