//! Question answering over the course catalog.

use crate::generator::AiGenerator;
use crate::session::SessionManager;
use crate::tools::{CourseOutlineTool, CourseSearchTool, Source, ToolManager};
use coursemate_core::{AppConfig, AppError, AppResult, ToolErrorPolicy};
use coursemate_knowledge::{create_provider, Catalog, InMemoryVectorStore, VectorStore};
use coursemate_llm::create_client;
use coursemate_prompt::PromptSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary of the courses available to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// Wires the store, tools, generator and sessions together.
///
/// Shareable across concurrent requests: per-question tool state lives in a
/// fresh [`crate::tools::ToolRun`] for every call to [`RagSystem::query`].
pub struct RagSystem {
    store: Arc<dyn VectorStore>,
    tools: ToolManager,
    generator: AiGenerator,
    sessions: SessionManager,
    prompts: PromptSet,
}

impl RagSystem {
    /// Assemble a system and register the search and outline tools.
    pub fn new(
        store: Arc<dyn VectorStore>,
        generator: AiGenerator,
        sessions: SessionManager,
        prompts: PromptSet,
        tool_errors: ToolErrorPolicy,
    ) -> Self {
        let mut tools = ToolManager::with_error_policy(tool_errors);
        tools.register_tool(Arc::new(CourseSearchTool::new(store.clone())));
        tools.register_tool(Arc::new(CourseOutlineTool::new(store.clone())));

        Self {
            store,
            tools,
            generator,
            sessions,
            prompts,
        }
    }

    /// Build everything from configuration.
    ///
    /// A missing catalog file is not fatal; the system starts with no
    /// courses.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )
        .map_err(AppError::Llm)?;

        let catalog_path = config.catalog_path();
        let catalog = if catalog_path.exists() {
            Catalog::load(&catalog_path)?
        } else {
            tracing::warn!(
                "No course catalog at {:?}; starting with an empty catalog",
                catalog_path
            );
            Catalog::default()
        };

        let embedder = create_provider("trigram", config.embedding_dimensions)?;
        let store = InMemoryVectorStore::build(catalog, embedder, config.max_results).await?;

        let prompts = PromptSet::load(&config.workspace)?;
        let generator = AiGenerator::new(client, &config.model, prompts.system())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature);

        tracing::info!(
            "RAG system ready: provider={}, model={}, tool errors={:?}",
            config.provider,
            config.model,
            config.tool_errors
        );

        Ok(Self::new(
            Arc::new(store),
            generator,
            SessionManager::new(config.max_history).with_max_sessions(config.max_sessions),
            prompts,
            config.tool_errors,
        ))
    }

    /// Answer a question, returning the answer and the sources it drew on.
    ///
    /// History is read and the exchange recorded only when `session_id` is
    /// given. On error nothing is recorded.
    pub async fn query(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> AppResult<(String, Vec<Source>)> {
        tracing::info!("Query (session: {:?}): {}", session_id, question);

        let prompt = self.prompts.course_query(question)?;
        let history = session_id.and_then(|id| self.sessions.get_conversation_history(id));
        let definitions = self.tools.get_tool_definitions();

        let mut run = self.tools.start_run();
        let answer = self
            .generator
            .generate_response(&prompt, history.as_deref(), Some(definitions.as_slice()), Some(&mut run))
            .await?;

        let sources = run.get_last_sources();
        run.reset_sources();

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, question, &answer);
        }

        tracing::info!("Answered with {} sources", sources.len());

        Ok((answer, sources))
    }

    pub async fn course_analytics(&self) -> CourseAnalytics {
        let course_titles = self.store.course_titles().await;
        CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn tool_manager(&self) -> &ToolManager {
        &self.tools
    }
}
