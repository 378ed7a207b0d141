pub mod clipboard;
pub mod definition;
pub mod environment;
pub mod panel;
pub mod translation;

pub use clipboard::{Clipboard, ClipboardMode};
pub use definition::{DataDefinition, DataProviderInformation};
pub use environment::Environment;
pub use panel::PanelContainer;
pub use translation::{StaticTranslationManager, TranslationManager};
