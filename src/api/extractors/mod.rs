mod claims;

pub use claims::Claims;
