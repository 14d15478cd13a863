pub mod arena;
pub mod gate;
pub mod gate_kind;
pub mod node;
pub mod progress;
