//! In-memory Typst world for contract compilation

pub mod contract_world;
pub mod fonts;

pub use contract_world::ContractWorld;
pub use fonts::{global_font_cache, FontCache};
