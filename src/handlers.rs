/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler extracts its inputs, delegates to a single engine
/// operation, and returns the outcome as JSON. No business logic lives
/// here; in particular the partial-failure semantics of the engines are
/// what they are regardless of which route triggered them.
mod group_handlers;
mod ledger_handlers;
mod progression_handlers;
mod task_handlers;

// Re-export all handlers
pub use group_handlers::*;
pub use ledger_handlers::*;
pub use progression_handlers::*;
pub use task_handlers::*;
