pub mod create;
pub mod domain;
pub mod inspect;
pub mod publish;
pub mod resolve;
pub mod restore;
pub mod retire;
pub mod rotate;

pub use create::Create;
pub use domain::Domain;
pub use inspect::Inspect;
pub use publish::Publish;
pub use resolve::Resolve;
pub use restore::Restore;
pub use retire::Retire;
pub use rotate::Rotate;
