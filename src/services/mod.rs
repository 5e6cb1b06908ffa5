// PageKeeper services
// Services implement the agent's behaviour: extraction, scheduling, dispatch, remote calls, chat context and settings.

pub mod chat_context;
pub mod clock;
pub mod content_extractor;
pub mod deadline_scheduler;
pub mod document;
pub mod enrichment_client;
pub mod notification_dispatcher;
pub mod settings_engine;
