//! ChatController - orchestrates prompts, conversations and assistant calls.
//!
//! The repositories own the canonical records. The controller keeps only a
//! cached copy of the active conversation and writes it through on every
//! mutation.

use std::collections::HashSet;
use std::sync::Arc;

use promptchat_core::assistant::{ApiResponse, AssistantClient, AssistantRequest, ImageUpload};
use promptchat_core::conversation::{Conversation, ConversationRepository, Message, MessageDraft};
use promptchat_core::error::{ChatError, Result, ValidationError};
use promptchat_core::prompt::{DEFAULT_PROMPTS, Prompt, PromptRepository};

/// Fallback reply when a failed text call carries no error text.
pub const TEXT_FALLBACK_ERROR: &str = "An error occurred.";

/// Fallback reply when a failed image call carries no error text.
pub const IMAGE_FALLBACK_ERROR: &str = "An error occurred while analyzing the image.";

/// Lifecycle of the active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// `startup` has not run yet.
    Uninitialized,
    /// An active conversation is resolved and cached.
    Loaded,
}

/// User input for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Text(String),
    /// Image mode; `None` when no file has been picked.
    Image(Option<ImageUpload>),
}

/// A user turn that has been recorded and awaits the assistant's reply.
///
/// Carries the id of the conversation that initiated the call, so the reply
/// lands there even if the user switches away in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending send must be completed to release the conversation"]
pub struct PendingSend {
    conversation_id: String,
    request: AssistantRequest,
}

impl PendingSend {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn request(&self) -> &AssistantRequest {
        &self.request
    }
}

/// Application controller over the prompt and conversation repositories.
pub struct ChatController {
    prompts: Arc<dyn PromptRepository>,
    conversations: Arc<dyn ConversationRepository>,
    state: ControllerState,
    active: Option<Conversation>,
    selected_prompt_id: Option<String>,
    /// Conversations with an outstanding assistant call
    pending: HashSet<String>,
}

impl ChatController {
    pub fn new(
        prompts: Arc<dyn PromptRepository>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            prompts,
            conversations,
            state: ControllerState::Uninitialized,
            active: None,
            selected_prompt_id: None,
            pending: HashSet::new(),
        }
    }

    // ============================================================================
    // Startup
    // ============================================================================

    /// Seeds default prompts if none exist, resolves the active conversation
    /// and moves to [`ControllerState::Loaded`].
    ///
    /// The active conversation is the stored current one if it still exists,
    /// else the first stored conversation, else a newly created one. Calling
    /// this again once loaded only returns the active conversation.
    pub fn startup(&mut self) -> Conversation {
        if let (ControllerState::Loaded, Some(active)) = (self.state, &self.active) {
            return active.clone();
        }

        self.seed_default_prompts();

        let active = self.resolve_active();
        self.active = Some(active.clone());
        self.state = ControllerState::Loaded;
        active
    }

    fn seed_default_prompts(&self) {
        if !self.prompts.list().is_empty() {
            return;
        }

        for preset in DEFAULT_PROMPTS {
            self.prompts.add(preset.name, preset.content);
        }
        tracing::info!(count = DEFAULT_PROMPTS.len(), "Seeded default prompts");
    }

    /// Exactly one of: stored current, first stored, newly created.
    fn resolve_active(&self) -> Conversation {
        let conversations = self.conversations.list();
        let current_id = self.conversations.current_id();

        if let Some(id) = current_id.as_deref()
            && let Some(current) = conversations.iter().find(|c| c.id == id)
        {
            tracing::info!(id, "Restored current conversation");
            return current.clone();
        }

        if let Some(first) = conversations.into_iter().next() {
            if let Some(id) = current_id {
                tracing::warn!(dangling = %id, fallback = %first.id, "Current conversation missing; using first");
            } else {
                tracing::info!(id = %first.id, "No current conversation; using first");
            }
            return first;
        }

        let created = self.conversations.create_new();
        tracing::info!(id = %created.id, "No conversations; created a new one");
        created
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active.as_ref()
    }

    /// All stored conversations, most recent first.
    pub fn conversations(&self) -> Vec<Conversation> {
        self.conversations.list()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.list()
    }

    /// The selected prompt as currently stored.
    ///
    /// Returns `None` if nothing was selected or the selection has since been
    /// deleted.
    pub fn selected_prompt(&self) -> Option<Prompt> {
        self.selected_prompt_id
            .as_deref()
            .and_then(|id| self.prompts.find_by_id(id))
    }

    /// Returns true while an assistant call for `conversation_id` is outstanding.
    pub fn is_pending(&self, conversation_id: &str) -> bool {
        self.pending.contains(conversation_id)
    }

    // ============================================================================
    // Prompt selection
    // ============================================================================

    pub fn select_prompt(&mut self, id: &str) -> Result<Prompt> {
        let prompt = self
            .prompts
            .find_by_id(id)
            .ok_or_else(|| ChatError::not_found("Prompt", id))?;

        tracing::debug!(id, name = %prompt.name, "Selected prompt");
        self.selected_prompt_id = Some(prompt.id.clone());
        Ok(prompt)
    }

    // ============================================================================
    // Messages
    // ============================================================================

    /// Appends a message to the active conversation and writes it through.
    ///
    /// Ignored when no conversation is loaded.
    pub fn append_message(&mut self, draft: MessageDraft) -> Option<Message> {
        let active = match (self.state, self.active.as_mut()) {
            (ControllerState::Loaded, Some(active)) => active,
            _ => {
                tracing::warn!("No active conversation; message ignored");
                return None;
            }
        };

        let message = active.append(draft).clone();
        self.conversations.save(active);
        Some(message)
    }

    /// Appends a message to the conversation with `conversation_id`.
    ///
    /// The active conversation goes through [`Self::append_message`]; any other
    /// conversation is updated in storage only. The message is dropped if
    /// the conversation no longer exists.
    pub fn append_to(&mut self, conversation_id: &str, draft: MessageDraft) -> Option<Message> {
        if self.active.as_ref().is_some_and(|c| c.id == conversation_id) {
            return self.append_message(draft);
        }

        let Some(mut conversation) = self.conversations.find_by_id(conversation_id) else {
            tracing::warn!(id = conversation_id, "Conversation no longer exists; message dropped");
            return None;
        };

        let message = conversation.append(draft).clone();
        self.conversations.save(&conversation);
        tracing::debug!(id = conversation_id, "Appended to background conversation");
        Some(message)
    }

    // ============================================================================
    // Conversation management
    // ============================================================================

    /// Creates a conversation and makes it active.
    pub fn new_conversation(&mut self) -> Result<Conversation> {
        self.ensure_loaded()?;

        let conversation = self.conversations.create_new();
        self.active = Some(conversation.clone());
        Ok(conversation)
    }

    /// Makes the conversation with `id` active and current.
    pub fn switch_conversation(&mut self, id: &str) -> Result<Conversation> {
        self.ensure_loaded()?;

        let conversation = self
            .conversations
            .find_by_id(id)
            .ok_or_else(|| ChatError::not_found("Conversation", id))?;

        self.conversations.set_current_id(&conversation.id);
        self.active = Some(conversation.clone());
        tracing::debug!(id, "Switched conversation");
        Ok(conversation)
    }

    /// Deletes the conversation with `id`. Unknown ids are ignored.
    ///
    /// When the active conversation is deleted, the new active one is
    /// resolved like at startup, creating a conversation if none remain.
    pub fn delete_conversation(&mut self, id: &str) -> Result<()> {
        self.ensure_loaded()?;

        self.conversations.delete(id);

        if self.active.as_ref().is_some_and(|c| c.id == id) {
            let next = self.resolve_active();
            tracing::debug!(deleted = id, active = %next.id, "Active conversation replaced");
            self.active = Some(next);
        }
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<()> {
        match self.state {
            ControllerState::Loaded => Ok(()),
            ControllerState::Uninitialized => {
                Err(ChatError::invalid_state("controller has not been started"))
            }
        }
    }

    // ============================================================================
    // Send pipeline
    // ============================================================================

    /// Validates `input`, records the user message and marks the active
    /// conversation as pending.
    ///
    /// Nothing is recorded when validation fails.
    pub fn begin_send(&mut self, input: ChatInput) -> Result<PendingSend> {
        self.ensure_loaded()?;

        let prompt = self
            .selected_prompt()
            .ok_or(ValidationError::NoPromptSelected)?;

        let conversation_id = self
            .active
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or_else(|| ChatError::invalid_state("no active conversation"))?;

        if self.pending.contains(&conversation_id) {
            return Err(ValidationError::RequestInFlight { conversation_id }.into());
        }

        let (draft, request) = match input {
            ChatInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ValidationError::EmptyText.into());
                }
                let draft = MessageDraft::user_text(text.clone(), prompt.name.clone());
                let request = AssistantRequest::Text {
                    text,
                    instruction: prompt.content,
                };
                (draft, request)
            }
            ChatInput::Image(None) => return Err(ValidationError::NoImageSelected.into()),
            ChatInput::Image(Some(image)) => {
                if !image.is_image() {
                    return Err(ValidationError::NotAnImage {
                        mime_type: image.mime_type,
                    }
                    .into());
                }
                let draft = MessageDraft::user_image(
                    format!("Image upload: {}", image.file_name),
                    prompt.name.clone(),
                    image.preview_url(),
                );
                let request = AssistantRequest::Image {
                    image,
                    instruction: prompt.content,
                };
                (draft, request)
            }
        };

        self.append_message(draft);
        self.pending.insert(conversation_id.clone());
        tracing::debug!(id = %conversation_id, image = request.is_image(), "Send started");

        Ok(PendingSend {
            conversation_id,
            request,
        })
    }

    /// Releases the pending mark and records the assistant's reply in the
    /// conversation that started the call.
    ///
    /// Failures become ordinary assistant messages carrying the error text.
    pub fn complete_send(&mut self, pending: PendingSend, response: ApiResponse) -> Option<Message> {
        self.pending.remove(&pending.conversation_id);

        let content = match response.reply() {
            Some(reply) => reply.to_string(),
            None => {
                let fallback = if pending.request.is_image() {
                    IMAGE_FALLBACK_ERROR
                } else {
                    TEXT_FALLBACK_ERROR
                };
                let error = response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                tracing::warn!(id = %pending.conversation_id, error = %error, "Assistant call failed");
                error
            }
        };

        self.append_to(&pending.conversation_id, MessageDraft::assistant_text(content))
    }

    /// Runs a full turn: validate, record, call the assistant, record the reply.
    pub async fn send(
        &mut self,
        input: ChatInput,
        client: &dyn AssistantClient,
    ) -> Result<Option<Message>> {
        let pending = self.begin_send(input)?;
        let response = client.send(pending.request()).await;
        Ok(self.complete_send(pending, response))
    }
}
