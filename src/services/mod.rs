pub mod mailer;
pub mod spotify;
pub mod tokens;
pub mod vision;

pub use mailer::Mailer;
pub use spotify::{PlaylistSummary, SpotifyService};
pub use tokens::TokenService;
pub use vision::{FaceAnnotation, VisionService};
