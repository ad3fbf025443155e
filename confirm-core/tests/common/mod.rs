//! Recording in-memory gateway shared by the prompt integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use confirm_core::gateway::{
    GatewayError, InteractionHub, InteractionSubscription, MessagingGateway,
};
use confirm_core::models::{
    ApplicationId, ChannelId, ComponentInteraction, InteractionContext, InteractionId,
    MessageId, MessagePayload, MessageRef, User, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FIRST_MESSAGE_ID: u64 = 1000;
pub const ORIGINAL_RESPONSE_ID: u64 = 2000;

/// Gateway call as seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        channel_id: ChannelId,
        payload: MessagePayload,
    },
    Edit {
        message: MessageRef,
        payload: MessagePayload,
    },
    Respond {
        payload: MessagePayload,
    },
    OriginalResponse,
    EditOriginal {
        payload: MessagePayload,
    },
    Acknowledge {
        custom_id: String,
    },
}

/// Mock gateway that records calls and tracks how many controls each message carries.
#[derive(Default)]
pub struct MockGateway {
    hub: InteractionHub,
    calls: Mutex<Vec<Call>>,
    controls: Mutex<HashMap<MessageId, usize>>,
    rendered: Mutex<Option<MessageRef>>,
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
    fail_original: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        let gateway = Self::default();
        gateway.next_id.store(FIRST_MESSAGE_ID, Ordering::SeqCst);
        Arc::new(gateway)
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn fail_original_response(&self) {
        self.fail_original.store(true, Ordering::SeqCst);
    }

    pub fn hub(&self) -> &InteractionHub {
        &self.hub
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn acknowledgements(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Acknowledge { .. }))
            .count()
    }

    /// Controls currently attached to a message (0 when never rendered)
    pub fn controls_on(&self, message_id: MessageId) -> usize {
        self.controls
            .lock()
            .unwrap()
            .get(&message_id)
            .copied()
            .unwrap_or(0)
    }

    /// Wait until a prompt has been rendered, then return its message.
    pub async fn rendered(&self) -> MessageRef {
        loop {
            let current = *self.rendered.lock().unwrap();
            if let Some(message) = current {
                return message;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Press a button on the rendered prompt after `delay`.
    pub fn click_after(self: &Arc<Self>, delay: Duration, user_id: u64, custom_id: &str) {
        let gateway = Arc::clone(self);
        let custom_id = custom_id.to_string();
        tokio::spawn(async move {
            let message = gateway.rendered().await;
            tokio::time::sleep(delay).await;
            gateway
                .hub
                .publish(press(message.message_id.get(), user_id, &custom_id));
        });
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn apply(&self, message: MessageRef, payload: &MessagePayload) {
        if let Some(count) = payload.control_count() {
            self.controls
                .lock()
                .unwrap()
                .insert(message.message_id, count);
        }
    }

    fn api_error() -> GatewayError {
        GatewayError::Api {
            status: 500,
            body: "mock failure".to_string(),
        }
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        payload: &MessagePayload,
    ) -> Result<MessageRef, GatewayError> {
        self.record(Call::Send {
            channel_id,
            payload: payload.clone(),
        });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Self::api_error());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let message = MessageRef::new(channel_id, MessageId(id));
        self.apply(message, payload);
        *self.rendered.lock().unwrap() = Some(message);
        Ok(message)
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        self.record(Call::Edit {
            message: *message,
            payload: payload.clone(),
        });
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Self::api_error());
        }
        self.apply(*message, payload);
        if payload.control_count().unwrap_or(0) > 0 {
            *self.rendered.lock().unwrap() = Some(*message);
        }
        Ok(())
    }

    async fn respond_to_interaction(
        &self,
        _ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        self.record(Call::Respond {
            payload: payload.clone(),
        });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Self::api_error());
        }
        let message = original_message();
        self.apply(message, payload);
        Ok(())
    }

    async fn original_response(
        &self,
        _ctx: &InteractionContext,
    ) -> Result<MessageRef, GatewayError> {
        self.record(Call::OriginalResponse);
        if self.fail_original.load(Ordering::SeqCst) {
            return Err(Self::api_error());
        }
        let message = original_message();
        *self.rendered.lock().unwrap() = Some(message);
        Ok(message)
    }

    async fn edit_original_response(
        &self,
        _ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        self.record(Call::EditOriginal {
            payload: payload.clone(),
        });
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Self::api_error());
        }
        self.apply(original_message(), payload);
        Ok(())
    }

    async fn acknowledge(&self, event: &ComponentInteraction) -> Result<(), GatewayError> {
        self.record(Call::Acknowledge {
            custom_id: event.custom_id.clone(),
        });
        Ok(())
    }

    fn subscribe(&self) -> InteractionSubscription {
        self.hub.subscribe()
    }
}

pub fn original_message() -> MessageRef {
    MessageRef::new(ChannelId(55), MessageId(ORIGINAL_RESPONSE_ID))
}

pub fn press(message_id: u64, user_id: u64, custom_id: &str) -> ComponentInteraction {
    ComponentInteraction {
        id: InteractionId(900),
        token: "button-token".to_string(),
        application_id: ApplicationId(10),
        message_id: MessageId(message_id),
        channel_id: Some(ChannelId(55)),
        user_id: UserId(user_id),
        custom_id: custom_id.to_string(),
    }
}

pub fn interaction(user: User) -> InteractionContext {
    InteractionContext {
        id: InteractionId(500),
        token: "command-token".to_string(),
        application_id: ApplicationId(10),
        user,
        channel_id: Some(ChannelId(55)),
    }
}
