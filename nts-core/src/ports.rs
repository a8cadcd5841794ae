mod translator;

pub use translator::{Application, Translator};
