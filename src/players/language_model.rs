//! Language-model player: streams a completion and parses the final answer.

use super::parser::CoordinateParser;
use super::prompt::PromptBuilder;
use super::stream::ResponseStream;
use super::{MoveProvider, ProviderError, ProviderKind, Reply};
use crate::games::gomoku::{BoardSnapshot, Color};
use crate::llm_client::LlmClient;
use futures::StreamExt;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Player backed by a streamed LLM completion.
///
/// Each request runs on a background task; fragments reach the coordinator
/// through a [`ResponseStream`] so the caller never blocks on the network.
pub struct LanguageModelProvider {
    name: String,
    client: LlmClient,
    prompts: PromptBuilder,
    parser: CoordinateParser,
}

impl LanguageModelProvider {
    /// Creates a language-model player.
    pub fn new(
        name: impl Into<String>,
        client: LlmClient,
        prompts: PromptBuilder,
        parser: CoordinateParser,
    ) -> Self {
        let name = name.into();
        info!(agent = %name, model = %client.config().model(), "Creating language-model player");
        Self {
            name,
            client,
            prompts,
            parser,
        }
    }
}

#[async_trait::async_trait]
impl MoveProvider for LanguageModelProvider {
    #[instrument(skip(self, board), fields(agent = %self.name))]
    async fn produce_move(
        &mut self,
        board: &BoardSnapshot,
        color: Color,
    ) -> Result<Reply, ProviderError> {
        let system_prompt = self.prompts.system_prompt();
        let prompt = self.prompts.user_prompt(board, color);
        let (sender, stream) = ResponseStream::channel(prompt.clone(), self.parser.clone());
        let client = self.client.clone();

        let span = info_span!("llm_response", agent = %self.name, ?color);
        tokio::spawn(
            async move {
                let mut fragments = match client.stream(&system_prompt, &prompt).await {
                    Ok(fragments) => fragments,
                    Err(e) => {
                        sender.fail(e);
                        return;
                    }
                };
                while let Some(fragment) = fragments.next().await {
                    match fragment {
                        Ok(text) => {
                            if !sender.fragment(text) {
                                // Nobody is listening; the call still runs to completion.
                                debug!("Fragment dropped, receiver gone");
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Stream failed mid-response");
                            sender.fail(e);
                            return;
                        }
                    }
                }
                sender.finish();
            }
            .instrument(span),
        );

        debug!("Streamed request started");
        Ok(Reply::Streaming(stream))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::LanguageModel
    }
}
