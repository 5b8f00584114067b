//! Courses command handler.

use clap::Args;
use coursemate_core::{config::AppConfig, AppResult};
use coursemate_rag::RagSystem;

/// List the courses in the catalog
#[derive(Args, Debug)]
pub struct CoursesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CoursesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let rag = RagSystem::from_config(config).await?;
        let analytics = rag.course_analytics().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&analytics)?);
            return Ok(());
        }

        println!("{} courses", analytics.total_courses);
        for title in &analytics.course_titles {
            println!("  {}", title);
        }

        Ok(())
    }
}
