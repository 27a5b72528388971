mod paste;

pub use paste::EnigoPasteInjector;
