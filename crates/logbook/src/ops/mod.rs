pub mod health;
pub mod keygen;
pub mod serve;
pub mod share;
pub mod version;

pub use health::Health;
pub use keygen::Keygen;
pub use serve::Serve;
pub use share::Share;
pub use version::Version;
