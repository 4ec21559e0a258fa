pub use difficulty::*;
pub use error::*;
pub use grid::*;
pub use hints::*;
pub use powerups::*;
pub use probability::*;
pub use score::*;
pub use session::*;
pub use stats::*;
pub use types::*;

mod difficulty;
mod error;
mod grid;
mod hints;
mod powerups;
mod probability;
mod score;
mod session;
mod stats;
mod types;
