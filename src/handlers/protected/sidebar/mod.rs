pub mod navigation;

pub use navigation::sidebar as sidebar_get;
