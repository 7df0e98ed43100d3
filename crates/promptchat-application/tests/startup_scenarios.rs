//! End-to-end scenarios over the real store, repositories and assistant.

use std::sync::Arc;

use chrono::Duration;
use promptchat_application::{ChatController, ChatInput, ControllerState, PromptService};
use promptchat_core::assistant::{AssistantClient, ImageUpload};
use promptchat_core::conversation::{ConversationRepository, MessageKind, Sender};
use promptchat_core::prompt::PromptRepository;
use promptchat_core::storage::KeyValueStore;
use promptchat_infrastructure::{
    FileKeyValueStore, MemoryKeyValueStore, RecordStore, StoredConversationRepository,
    StoredPromptRepository,
};
use promptchat_interaction::SimulatedAssistant;

struct Harness {
    prompts: Arc<StoredPromptRepository>,
    conversations: Arc<StoredConversationRepository>,
}

impl Harness {
    fn over(backend: Arc<dyn KeyValueStore>) -> Self {
        let store = RecordStore::new(backend);
        Self {
            prompts: Arc::new(StoredPromptRepository::new(store.clone())),
            conversations: Arc::new(StoredConversationRepository::new(store)),
        }
    }

    fn in_memory() -> Self {
        Self::over(Arc::new(MemoryKeyValueStore::new()))
    }

    fn controller(&self) -> ChatController {
        ChatController::new(self.prompts.clone(), self.conversations.clone())
    }
}

#[test]
fn fresh_storage_startup_seeds_three_prompts_and_one_current_conversation() {
    let harness = Harness::in_memory();
    let mut controller = harness.controller();

    let active = controller.startup();

    let names: Vec<_> = harness.prompts.list().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["General Conversation", "Image Analysis", "Translation"]);

    let conversations = harness.conversations.list();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id, active.id);
    assert_eq!(harness.conversations.current_id(), Some(active.id));
    assert_eq!(controller.state(), ControllerState::Loaded);
}

#[test]
fn deleting_current_second_conversation_points_to_first() {
    let harness = Harness::in_memory();
    let second = harness.conversations.create_new();
    let first = harness.conversations.create_new();
    harness.conversations.set_current_id(&second.id);

    harness.conversations.delete(&second.id);

    assert_eq!(harness.conversations.current_id(), Some(first.id));
}

#[test]
fn restart_reseeds_after_all_prompts_deleted() {
    let harness = Harness::in_memory();
    harness.controller().startup();

    let service = PromptService::new(harness.prompts.clone());
    for prompt in service.list() {
        service.delete(&prompt.id);
    }
    assert!(service.list().is_empty());

    harness.controller().startup();
    assert_eq!(service.list().len(), 3);
}

#[test]
fn restart_restores_current_conversation_from_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let open = || Harness::over(Arc::new(FileKeyValueStore::new(temp_dir.path())));

    let mut controller = open().controller();
    controller.startup();
    let chosen = controller.new_conversation().unwrap();
    controller.new_conversation().unwrap();
    controller.switch_conversation(&chosen.id).unwrap();

    let mut restarted = open().controller();
    assert_eq!(restarted.startup().id, chosen.id);
}

#[tokio::test]
async fn full_turn_persists_transcript_with_chronological_timestamps() {
    let harness = Harness::in_memory();
    let mut controller = harness.controller();
    let active = controller.startup();
    let prompt = controller.prompts()[1].clone();
    controller.select_prompt(&prompt.id).unwrap();
    let assistant = SimulatedAssistant::instant();

    let content = "Describe the weather in this picture for me please";
    controller
        .send(ChatInput::Text(content.to_string()), &assistant)
        .await
        .unwrap();
    controller
        .send(
            ChatInput::Image(Some(ImageUpload::new("sky.png", "image/png", vec![0; 4096]))),
            &assistant,
        )
        .await
        .unwrap();

    let stored = harness.conversations.find_by_id(&active.id).unwrap();
    assert_eq!(stored.title, format!("{}...", &content[..30]));
    assert_eq!(stored.messages.len(), 4);

    let senders: Vec<_> = stored.messages.iter().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Sender::User, Sender::Assistant, Sender::User, Sender::Assistant]);
    assert_eq!(stored.messages[2].kind, MessageKind::Image);
    assert_eq!(stored.messages[2].prompt_used.as_deref(), Some("Image Analysis"));
    assert!(stored.messages[3].content.contains("- File size: 4.0KB"));

    for pair in stored.messages.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
        assert!(pair[1].timestamp - pair[0].timestamp < Duration::minutes(1));
    }
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn reply_after_switch_stays_in_originating_conversation() {
    let harness = Harness::in_memory();
    let mut controller = harness.controller();
    let origin = controller.startup();
    let prompt_id = controller.prompts()[0].id.clone();
    controller.select_prompt(&prompt_id).unwrap();
    let assistant = SimulatedAssistant::instant();

    let pending = controller
        .begin_send(ChatInput::Text("hello".to_string()))
        .unwrap();
    let switched = controller.new_conversation().unwrap();
    let response = assistant.send(pending.request()).await;
    controller.complete_send(pending, response);

    assert_eq!(harness.conversations.find_by_id(&origin.id).unwrap().messages.len(), 2);
    assert!(harness.conversations.find_by_id(&switched.id).unwrap().messages.is_empty());
    assert_eq!(controller.active_conversation().unwrap().id, switched.id);
}
