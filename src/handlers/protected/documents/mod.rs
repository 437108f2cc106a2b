pub mod validate;

pub use validate::validate as documents_validate;
