mod create;
mod media;
mod service;
mod update;

pub use create::{CreatePastryCommand, LocationInput};
pub use media::MAX_MEDIA_PER_PASTRY;
pub use service::PastryCommandService;
pub use update::UpdatePastryCommand;
