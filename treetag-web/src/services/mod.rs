//! Remote-service clients
//!
//! Every collaborator outside this process sits behind one of these clients:
//! the document store, the media host, the AI text generator, the
//! plant-identification API, the identity provider, and the SMTP relay. Each
//! is constructed once at startup and injected through `AppState`.

pub mod botanist;
pub mod identity;
pub mod mailer;
pub mod media;
pub mod plant_id;
pub mod store;

pub use botanist::Botanist;
pub use identity::Identity;
pub use mailer::Mailer;
pub use media::MediaStore;
pub use plant_id::PlantId;
pub use store::DocumentStore;
