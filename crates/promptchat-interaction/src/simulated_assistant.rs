//! SimulatedAssistant - a stand-in backend with randomized latency.
//!
//! Replies echo the instruction and the user input followed by one canned
//! sentence. No network traffic is involved.

use async_trait::async_trait;
use promptchat_core::assistant::{ApiResponse, AssistantClient, ImageUpload};
use promptchat_infrastructure::config_service::{AssistantConfig, DelayWindow};
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Characters of the instruction echoed back in a reply.
const INSTRUCTION_PREVIEW_CHARS: usize = 50;

const CANNED_REPLIES: [&str; 6] = [
    "Hello! How can I help you?",
    "Good question. Let me analyze it.",
    "Interesting. Let me explain in more detail.",
    "Looking at the image, it contains some very interesting content.",
    "Based on the information you provided, here is my answer.",
    "Let's discuss this topic in more depth.",
];

const TEXT_FAILURE: &str = "An error occurred while generating a response.";
const IMAGE_FAILURE: &str = "An error occurred while analyzing the image.";

/// Assistant that answers every call locally after an artificial delay.
#[derive(Debug, Clone)]
pub struct SimulatedAssistant {
    config: AssistantConfig,
}

/// Random choices for one call, drawn up front so no RNG handle is held
/// across an await point.
struct Roll {
    delay: Duration,
    fail: bool,
    reply: &'static str,
}

impl SimulatedAssistant {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// An assistant that answers immediately and never fails.
    pub fn instant() -> Self {
        Self::new(&AssistantConfig::instant())
    }

    fn roll(&self, window: DelayWindow) -> Roll {
        let mut rng = rand::thread_rng();

        let delay_ms = if window.max > window.min {
            rng.gen_range(window.min..window.max)
        } else {
            window.min
        };
        let fail = rng.gen_bool(self.config.failure_rate.clamp(0.0, 1.0));
        let reply = CANNED_REPLIES.choose(&mut rng).copied().unwrap_or(CANNED_REPLIES[0]);

        Roll {
            delay: Duration::from_millis(delay_ms),
            fail,
            reply,
        }
    }

    async fn wait(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AssistantClient for SimulatedAssistant {
    async fn send_text(&self, text: &str, instruction: &str) -> ApiResponse {
        let roll = self.roll(self.config.text_delay_ms);
        tracing::debug!(delay_ms = roll.delay.as_millis() as u64, "Simulating text reply");
        Self::wait(roll.delay).await;

        if roll.fail {
            tracing::warn!("Simulated text call failed");
            return ApiResponse::err(TEXT_FAILURE);
        }

        ApiResponse::ok(format!(
            "{}\n\nYou wrote: \"{}\"\n\n{}",
            instruction_preview(instruction),
            text,
            roll.reply
        ))
    }

    async fn send_image(&self, image: &ImageUpload, instruction: &str) -> ApiResponse {
        let roll = self.roll(self.config.image_delay_ms);
        tracing::debug!(
            delay_ms = roll.delay.as_millis() as u64,
            file = %image.file_name,
            "Simulating image reply"
        );
        Self::wait(roll.delay).await;

        if roll.fail {
            tracing::warn!(file = %image.file_name, "Simulated image call failed");
            return ApiResponse::err(IMAGE_FAILURE);
        }

        ApiResponse::ok(format!(
            "{}\n\nAnalyzed your uploaded {} image.\n\n\
             The image shows the following:\n\
             - File size: {:.1}KB\n\
             - File type: {}\n\n{}",
            instruction_preview(instruction),
            image.subtype(),
            image.size() as f64 / 1024.0,
            image.mime_type,
            roll.reply
        ))
    }
}

/// `Prompt: "<first 50 chars>"`, with `...` when the instruction is longer.
fn instruction_preview(instruction: &str) -> String {
    let mut chars = instruction.chars();
    let head: String = chars.by_ref().take(INSTRUCTION_PREVIEW_CHARS).collect();
    let ellipsis = if chars.next().is_some() { "..." } else { "" };
    format!("Prompt: \"{head}{ellipsis}\"")
}
