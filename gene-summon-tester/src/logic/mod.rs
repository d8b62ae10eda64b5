pub mod checks;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use checks::CheckKind;
pub use seeds::resolve_seed_inputs;
pub use tester::*;
