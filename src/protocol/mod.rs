//! Console protocol driver.
//!
//! Everything that turns an unframed byte stream into a conversation with a
//! switch: response framing, command transmission, device discovery, prompt
//! normalization, script playback, built-in recipes and the operator relay.
//!
//! # Flow
//!
//! `PortEnumerator` → `PromptProbe` (selects one `Session`) →
//! `WizardNavigator` (normalizes the prompt) → one of `ScriptPlayer`,
//! `RecipeRunner` or `PassThrough`.

pub mod error;
pub mod interactive;
pub mod navigator;
pub mod player;
pub mod probe;
pub mod reader;
pub mod recipe;
pub mod script;
pub mod transmit;
pub mod vocabulary;

pub use error::{ProtocolError, ProtocolResult};
pub use interactive::{InteractiveExit, OperatorConsole, PassThrough, StdinConsole};
pub use navigator::{NavState, NavigationReport, WizardNavigator};
pub use player::{PlaybackReport, ScriptPlayer};
pub use probe::{ProbeOutcome, PromptProbe};
pub use reader::{ReadPolicy, Response};
pub use recipe::{Recipe, RecipeReport, RecipeRunner, RecipeStep};
pub use script::{CommandScript, ScriptError, ScriptLine, ScriptStep};
pub use vocabulary::{DeviceMode, DeviceVocabulary};
