//! Inbound message routing
//!
//! Classifies every decoded envelope and hands it to the presence set, the
//! typing debouncer or the renderer. The router never rejects an envelope:
//! types it does not know are rendered as they are.

use crate::protocol::Channel;
use crate::render::Renderer;
use crate::timer::Scheduler;
use crate::typing::TypingDebouncer;
use chat_common::ClientResult;
use chat_core::{ChatEnvelope, MessageType, PresenceSet};

/// A decoded message together with the channel it arrived on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: Channel,
    pub envelope: ChatEnvelope,
}

impl InboundMessage {
    pub fn new(channel: Channel, envelope: ChatEnvelope) -> Self {
        Self { channel, envelope }
    }

    /// Decode a JSON message body
    ///
    /// # Errors
    /// Returns `ClientError::Protocol` for malformed JSON.
    pub fn decode(channel: Channel, body: &str) -> ClientResult<Self> {
        let envelope = ChatEnvelope::from_json(body)?;
        Ok(Self { channel, envelope })
    }

    /// Private styling applies to PRIVATE envelopes and anything on the private queue
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.envelope.is_private() || self.channel == Channel::PrivateQueue
    }
}

/// What routing did with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// JOIN or LEAVE updated the presence set
    PresenceChanged,
    /// Shown as a chat line without other effects
    Rendered,
    /// A remote typing notice is now shown
    TypingNoted,
    /// Typing notice from the local user
    Ignored,
    /// User count status updated
    UserCount,
}

/// State the router may touch for one message
pub struct RouteContext<'a, S: Scheduler, R: Renderer> {
    pub local_username: Option<&'a str>,
    pub presence: &'a mut PresenceSet,
    pub typing: &'a mut TypingDebouncer<S>,
    pub renderer: &'a mut R,
}

/// Dispatches inbound messages by channel and envelope type
pub struct MessageRouter;

impl MessageRouter {
    /// Route one inbound message
    pub fn route<S: Scheduler, R: Renderer>(
        ctx: RouteContext<'_, S, R>,
        inbound: &InboundMessage,
    ) -> RouteOutcome {
        let envelope = &inbound.envelope;

        if inbound.channel == Channel::UserCount {
            if envelope.content.trim().parse::<u64>().is_err() {
                tracing::warn!(content = %envelope.content, "Non-numeric user count");
            }
            ctx.renderer.render_user_count(&envelope.content);
            return RouteOutcome::UserCount;
        }

        tracing::trace!(
            channel = %inbound.channel,
            message_type = %envelope.message_type,
            sender = %envelope.sender,
            "Routing message"
        );

        match &envelope.message_type {
            MessageType::Join | MessageType::Leave => Self::route_presence(ctx, inbound),
            MessageType::Private => {
                ctx.renderer.render_message(envelope, true);
                RouteOutcome::Rendered
            }
            MessageType::Typing => {
                if ctx
                    .typing
                    .note_remote_typing(&envelope.sender, ctx.local_username, ctx.renderer)
                {
                    RouteOutcome::TypingNoted
                } else {
                    RouteOutcome::Ignored
                }
            }
            MessageType::Chat | MessageType::System | MessageType::Other(_) => {
                if !envelope.message_type.is_known() {
                    tracing::debug!(message_type = %envelope.message_type, "Rendering unknown message type");
                }
                ctx.renderer.render_message(envelope, inbound.is_private());
                RouteOutcome::Rendered
            }
        }
    }

    fn route_presence<S: Scheduler, R: Renderer>(
        ctx: RouteContext<'_, S, R>,
        inbound: &InboundMessage,
    ) -> RouteOutcome {
        let envelope = &inbound.envelope;
        let sender = envelope.sender.trim();

        if sender.is_empty() {
            tracing::warn!(message_type = %envelope.message_type, "Presence message without sender");
            ctx.renderer.render_message(envelope, inbound.is_private());
            return RouteOutcome::Rendered;
        }

        let changed = if envelope.message_type == MessageType::Join {
            ctx.presence.add(sender)
        } else {
            ctx.presence.remove(sender)
        };
        tracing::debug!(
            user = %sender,
            message_type = %envelope.message_type,
            changed,
            online = ctx.presence.len(),
            "Presence updated"
        );

        ctx.renderer
            .render_presence_list(ctx.presence, ctx.local_username);
        ctx.renderer.render_message(envelope, inbound.is_private());
        RouteOutcome::PresenceChanged
    }
}
