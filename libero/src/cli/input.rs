// Where BDDL text comes from: a file, an inline string, or stdin

use clap::{Args, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    File,
    /// Inline text given with `--string`
    String,
    /// Read everything from stdin
    Pipe,
}

/// Shared flags for commands that read one BDDL document.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// BDDL file to read
    pub file: Option<PathBuf>,

    /// Inline BDDL text
    #[arg(long, conflicts_with = "file")]
    pub string: Option<String>,

    /// Input source; inferred from the other flags when omitted
    #[arg(long, value_enum)]
    pub input: Option<InputSource>,
}

impl InputArgs {
    pub fn source(&self) -> InputSource {
        match (self.input, &self.file, &self.string) {
            (Some(source), _, _) => source,
            (None, Some(_), _) => InputSource::File,
            (None, None, Some(_)) => InputSource::String,
            (None, None, None) => InputSource::Pipe,
        }
    }
}

#[derive(Debug)]
pub struct InputContent {
    pub content: String,
    /// Shown in diagnostics: the file path, `<string>` or `<stdin>`
    pub source_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("a file argument is required when using --input file")]
    MissingFileArgument,

    #[error("--string is required when using --input string")]
    MissingStringArgument,

    #[error("error reading file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading stdin: {0}")]
    StdinRead(#[source] std::io::Error),
}

pub fn read_input_content(args: &InputArgs) -> Result<InputContent, InputError> {
    match args.source() {
        InputSource::File => {
            let path = args.file.as_ref().ok_or(InputError::MissingFileArgument)?;
            let content = std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), bytes = content.len(), "read BDDL file");
            Ok(InputContent {
                content,
                source_name: path.display().to_string(),
            })
        }
        InputSource::String => {
            let content = args.string.clone().ok_or(InputError::MissingStringArgument)?;
            Ok(InputContent {
                content,
                source_name: "<string>".to_string(),
            })
        }
        InputSource::Pipe => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(InputError::StdinRead)?;
            debug!(bytes = content.len(), "read BDDL from stdin");
            Ok(InputContent {
                content,
                source_name: "<stdin>".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: Option<&str>, string: Option<&str>, input: Option<InputSource>) -> InputArgs {
        InputArgs {
            file: file.map(PathBuf::from),
            string: string.map(str::to_string),
            input,
        }
    }

    #[test]
    fn test_source_is_inferred() {
        assert_eq!(args(Some("a.bddl"), None, None).source(), InputSource::File);
        assert_eq!(args(None, Some("(define)"), None).source(), InputSource::String);
        assert_eq!(args(None, None, None).source(), InputSource::Pipe);
        assert_eq!(args(Some("a.bddl"), None, Some(InputSource::Pipe)).source(), InputSource::Pipe);
    }

    #[test]
    fn test_explicit_source_needs_its_argument() {
        assert!(matches!(
            read_input_content(&args(None, None, Some(InputSource::File))),
            Err(InputError::MissingFileArgument)
        ));
        let content = read_input_content(&args(None, Some("(and)"), None)).unwrap();
        assert_eq!(content.source_name, "<string>");
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = read_input_content(&args(Some("/nonexistent/task.bddl"), None, None)).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/task.bddl"));
    }
}
