mod physical_type;
pub use physical_type::*;

mod converted_type;
pub use converted_type::*;
