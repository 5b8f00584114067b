//! Ask command handler.
//!
//! Answers one question against the course catalog. Sessions live in
//! server memory, so a one-shot question carries no conversation history.

use clap::Args;
use coursemate_core::{config::AppConfig, AppError, AppResult};
use coursemate_rag::RagSystem;
use std::path::PathBuf;

/// Ask a question about the course materials
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .get_question()?
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let rag = RagSystem::from_config(config).await?;
        let (answer, sources) = rag.query(&question, None).await?;

        if self.json {
            let output = serde_json::json!({
                "answer": answer,
                "sources": sources,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{}", answer);
        if !sources.is_empty() {
            println!();
            println!("Sources:");
            for source in &sources {
                match &source.url {
                    Some(url) => println!("  - {} ({})", source.label, url),
                    None => println!("  - {}", source.label),
                }
            }
        }

        Ok(())
    }

    fn get_question(&self) -> AppResult<Option<String>> {
        if let Some(question) = &self.question {
            return Ok(Some(question.clone()));
        }

        match &self.file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("Failed to read question file {:?}: {}", path, e))
                })?;
                Ok(Some(text.trim().to_string()).filter(|q| !q.is_empty()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn command(question: Option<&str>, file: Option<PathBuf>) -> AskCommand {
        AskCommand {
            question: question.map(str::to_string),
            file,
            json: false,
        }
    }

    #[test]
    fn test_question_from_argument() {
        let cmd = command(Some("What is Python?"), None);
        assert_eq!(cmd.get_question().unwrap().as_deref(), Some("What is Python?"));
    }

    #[test]
    fn test_question_from_file_is_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  What is a variable?  ").unwrap();

        let cmd = command(None, Some(file.path().to_path_buf()));
        assert_eq!(
            cmd.get_question().unwrap().as_deref(),
            Some("What is a variable?")
        );
    }

    #[test]
    fn test_missing_question_file_is_an_error() {
        let cmd = command(None, Some(PathBuf::from("/nonexistent/question.txt")));
        assert!(matches!(cmd.get_question(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_no_question() {
        assert_eq!(command(None, None).get_question().unwrap(), None);
    }

    #[tokio::test]
    async fn test_execute_with_mock_provider() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            provider: "mock".to_string(),
            ..AppConfig::default()
        };

        let cmd = AskCommand {
            question: Some("What is Python?".to_string()),
            file: None,
            json: true,
        };
        assert!(cmd.execute(&config).await.is_ok());
    }
}
